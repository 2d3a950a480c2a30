//! Transient plan artifacts returned by the planners.
//!
//! None of these are persisted entities: each is produced within a single
//! planner call and handed to the caller for execution and logging.

use chrono::NaiveDate;
use nalgebra::Vector3;
use std::collections::BTreeMap;
use stowage_core::{ContainerId, ItemId, ItemUpdate, Orientation, WasteReason};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A candidate placement with its component and overall scores.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementOption {
    /// Target container.
    pub container_id: ContainerId,
    /// Min corner of the item's AABB.
    pub position: Vector3<f64>,
    /// Orientation applied to the raw dimensions.
    pub orientation: Orientation,
    /// Closeness to the open face, discounted per obstruction.
    pub accessibility_score: f64,
    /// Fraction of axis-pairs where the candidate touches a wall.
    pub space_efficiency_score: f64,
    /// Item priority mapped to [0.1, 1.0].
    pub priority_score: f64,
    /// Zone preference match.
    pub zone_preference_score: f64,
    /// Weighted sum of the four component scores.
    pub overall_score: f64,
}

/// Action within a retrieval plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RetrievalAction {
    /// Move a blocking item to its staging position.
    Remove,
    /// Take the target item out of the container.
    Retrieve,
    /// Return a removed item to its original position.
    PlaceBack,
}

/// One step of a retrieval plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RetrievalStep {
    /// 1-based step number.
    pub step_number: usize,
    /// What to do.
    pub action: RetrievalAction,
    /// Item the step applies to.
    pub item_id: ItemId,
    /// Staging position for `Remove`, original position for `PlaceBack`.
    pub position: Option<Vector3<f64>>,
}

/// Ordered remove / retrieve / place-back sequence for one item.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RetrievalPlan {
    /// The item being retrieved.
    pub item_id: ItemId,
    /// Container it is retrieved from.
    pub container_id: ContainerId,
    /// Number of items that must be moved out of the way.
    pub blocking_count: usize,
    /// The full step sequence (2·k + 1 steps for k blocking items).
    pub steps: Vec<RetrievalStep>,
    /// Usage-count and status updates to persist after executing the plan.
    pub updates: Vec<ItemUpdate>,
}

/// One eviction within a rearrangement plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvictionStep {
    /// 1-based step number.
    pub step_number: usize,
    /// Item to evict.
    pub item_id: ItemId,
    /// Container it is evicted from.
    pub from_container: ContainerId,
    /// Volume the eviction frees.
    pub volume_freed: f64,
}

/// Evictions plus the placement they make feasible.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RearrangementPlan {
    /// Ordered evictions, lowest priority first.
    pub evictions: Vec<EvictionStep>,
    /// Where the incoming item goes once the evictions are executed.
    pub option: PlacementOption,
}

/// Action within a waste-return plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReturnAction {
    /// Take the item out of its container.
    Remove,
    /// Hand the item over for undocking.
    Retrieve,
}

/// One step of a waste-return plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReturnStep {
    /// 1-based step number.
    pub step_number: usize,
    /// What to do.
    pub action: ReturnAction,
    /// Item the step applies to.
    pub item_id: ItemId,
    /// Item name, for the crew-facing manifest.
    pub item_name: String,
}

/// An accepted item on the return manifest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ManifestEntry {
    /// Item id.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Mass in kilograms.
    pub mass: f64,
    /// Why the item is waste, when derivable.
    pub reason: Option<WasteReason>,
}

/// Summary of a waste-return selection.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReturnManifest {
    /// Accepted items in selection order.
    pub items: Vec<ManifestEntry>,
    /// Total mass of accepted items.
    pub total_mass: f64,
    /// Budget left over: `max_weight - total_mass`.
    pub remaining_capacity: f64,
    /// Volume reclaimed per container the accepted items came from.
    pub reclaimed_volume: BTreeMap<ContainerId, f64>,
}

/// Ordered return steps plus the manifest.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReturnPlan {
    /// Two interleaved steps per accepted item.
    pub steps: Vec<ReturnStep>,
    /// The manifest.
    pub manifest: ReturnManifest,
}

/// An item flagged or flaggable as waste, with the reason.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WasteRecord {
    /// Item id.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Why the item is waste.
    pub reason: WasteReason,
    /// Container holding the item, if stowed.
    pub container_id: Option<ContainerId>,
}

/// A scheduled per-day consumption event.
///
/// Lookup is by id when given, otherwise by the first item whose name
/// matches exactly.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsageEvent {
    /// Item id, preferred.
    pub item_id: Option<ItemId>,
    /// Item name, fallback.
    pub name: Option<String>,
}

impl UsageEvent {
    /// Event addressed by item id.
    pub fn by_id(id: impl Into<ItemId>) -> Self {
        Self {
            item_id: Some(id.into()),
            name: None,
        }
    }

    /// Event addressed by item name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            item_id: None,
            name: Some(name.into()),
        }
    }
}

/// A recorded use of an item during simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemUsed {
    /// Item id.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Uses left after this one; `None` for unlimited items.
    pub remaining_uses: Option<u32>,
}

/// An item that changed lifecycle state during simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemChange {
    /// Item id.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
}

/// Everything that changed over a simulated span of days.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeltaReport {
    /// The date after the last simulated day.
    pub new_date: NaiveDate,
    /// Days simulated.
    pub days_simulated: u32,
    /// Every use applied, one record per item per day.
    pub items_used: Vec<ItemUsed>,
    /// Items that crossed their expiry date, recorded once.
    pub items_expired: Vec<ItemChange>,
    /// Items that ran out of uses, recorded once.
    pub items_depleted: Vec<ItemChange>,
    /// Usage-count and status updates to persist.
    pub updates: Vec<ItemUpdate>,
}

/// An item expiring within the status-report horizon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExpiringItem {
    /// Item id.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// When it expires.
    pub expiry_date: NaiveDate,
}

/// Inventory statistics at a point in simulated time.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusReport {
    /// Date the report was taken at.
    pub current_date: NaiveDate,
    /// Total tracked items.
    pub total_items: usize,
    /// Total containers.
    pub total_containers: usize,
    /// Items currently stowed in a container.
    pub items_stowed: usize,
    /// Items flagged as waste.
    pub waste_items: usize,
    /// Items expiring within the requested horizon.
    pub expiring_soon: Vec<ExpiringItem>,
}
