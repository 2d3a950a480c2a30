//! Typed write-back updates.
//!
//! Planners never mutate entities; they return values from this module and
//! the caller persists them through its store. Each variant enumerates
//! exactly the fields the operation is permitted to change, so there is no
//! generic key/value patching anywhere.

use crate::geometry::Orientation;
use crate::item::{ItemId, ItemStatus};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single permitted mutation of an item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ItemUpdate {
    /// Place the item in a container at a position with an orientation.
    Stow {
        /// Item to place.
        item_id: ItemId,
        /// Target container.
        container_id: String,
        /// Min corner of the item's AABB.
        position: Vector3<f64>,
        /// Orientation applied to the raw dimensions.
        orientation: Orientation,
    },
    /// Take the item out of its container.
    Unstow {
        /// Item to remove.
        item_id: ItemId,
    },
    /// Set the lifecycle status.
    SetStatus {
        /// Item to change.
        item_id: ItemId,
        /// New status.
        status: ItemStatus,
    },
    /// Set the usage count.
    SetUsageCount {
        /// Item to change.
        item_id: ItemId,
        /// New count.
        usage_count: u32,
    },
    /// Permanently remove the item from the inventory (undocking).
    Remove {
        /// Item to delete.
        item_id: ItemId,
    },
}

impl ItemUpdate {
    /// The item this update targets.
    pub fn item_id(&self) -> &str {
        match self {
            ItemUpdate::Stow { item_id, .. }
            | ItemUpdate::Unstow { item_id }
            | ItemUpdate::SetStatus { item_id, .. }
            | ItemUpdate::SetUsageCount { item_id, .. }
            | ItemUpdate::Remove { item_id } => item_id,
        }
    }
}
