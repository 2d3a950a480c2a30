//! # Stowage Core
//!
//! Entity model and geometry kernel for the stowage planning engine.
//!
//! This crate provides the types shared by every planner: cargo items,
//! storage containers, the axis-aligned geometry kernel, typed write-back
//! updates and the immutable snapshot the planners consume.
//!
//! ## Core Components
//!
//! - **Geometry kernel**: `Aabb`, `Orientation` — overlap tests and the six
//!   box orientations
//! - **Entities**: `Item`, `Container` — plain records with derived state
//! - **Updates**: `ItemUpdate` — the only way planner decisions mutate
//!   entities
//! - **Snapshot**: `Snapshot` — deterministic, ordered view of the
//!   inventory
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod container;
pub mod error;
pub mod geometry;
pub mod item;
pub mod snapshot;
pub mod update;

// Re-exports
pub use container::{Container, ContainerId};
pub use error::{Error, Result};
pub use geometry::{fits, Aabb, Orientation};
pub use item::{Item, ItemId, ItemStatus, StowedAt, WasteReason};
pub use snapshot::Snapshot;
pub use update::ItemUpdate;
