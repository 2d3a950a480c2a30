//! Stowage planning engine for fixed-size cargo containers.
//!
//! Five planners operate over an immutable [`stowage_core::Snapshot`] and
//! return decisions as plan artifacts plus typed updates; nothing mutates
//! until a [`store::Store`] applies the updates.
//!
//! - [`allocator::Allocator`] ranks feasible placements for an item.
//! - [`access::AccessPlanner`] plans line-of-sight retrieval.
//! - [`rearrange::RearrangementPlanner`] finds priority evictions when
//!   nothing fits.
//! - [`waste::WastePlanner`] selects waste for a weight-budgeted return.
//! - [`clock::SimulationClock`] advances time day by day.
//!
//! # Example
//!
//! ```
//! use stowage_core::{Container, Item};
//! use stowage_planner::{Allocator, MemoryStore, Store};
//!
//! let mut store = MemoryStore::new();
//! store.add_container(Container::new("C1", "Storage", 100.0, 85.0, 200.0))?;
//!
//! let item = Item::new("I1", "Food Package", 10.0, 10.0, 20.0, 5.0, 8);
//! let options = Allocator::default_config().allocate(&item, &store.snapshot())?;
//! assert!(!options.is_empty());
//! # Ok::<(), stowage_core::Error>(())
//! ```

pub mod access;
pub mod allocator;
pub mod clock;
pub mod plan;
pub mod rearrange;
pub mod store;
pub mod waste;

pub use access::{AccessPlanner, StagingConfig};
pub use allocator::{Allocator, AllocatorConfig, CandidateScan};
pub use clock::{SimulationClock, SimulationSpan};
pub use plan::{
    DeltaReport, EvictionStep, ExpiringItem, ItemChange, ItemUsed, ManifestEntry, PlacementOption,
    RearrangementPlan, RetrievalAction, RetrievalPlan, RetrievalStep, ReturnAction, ReturnManifest,
    ReturnPlan, ReturnStep, StatusReport, UsageEvent, WasteRecord,
};
pub use rearrange::RearrangementPlanner;
pub use store::{MemoryStore, Store};
pub use waste::WastePlanner;
