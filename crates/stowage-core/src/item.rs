//! Cargo item entity.

use crate::geometry::{Aabb, Orientation};
use crate::{Error, Result};
use chrono::NaiveDate;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for an item.
pub type ItemId = String;

/// Lifecycle status of an item.
///
/// `Waste` is derived: an item is waste iff its expiry date has passed or
/// its usage limit is exhausted. Callers must re-derive after mutating the
/// usage count or advancing the simulation date rather than trusting a
/// cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ItemStatus {
    /// In service.
    #[default]
    Active,
    /// Expired or usage-exhausted; candidate for disposal.
    Waste,
}

/// Why an item counts as waste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WasteReason {
    /// The expiry date has passed.
    Expired,
    /// The usage count reached the usage limit.
    OutOfUses,
}

/// Where a placed item sits: container, min-corner position, orientation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StowedAt {
    /// Non-owning back-reference to the container.
    pub container_id: String,
    /// Min corner of the item's AABB in container coordinates.
    pub position: Vector3<f64>,
    /// Orientation applied to the raw dimensions.
    pub orientation: Orientation,
}

/// A cargo item.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// Human-readable name.
    pub name: String,
    /// Raw dimensions (width, depth, height).
    pub dimensions: Vector3<f64>,
    /// Mass in kilograms.
    pub mass: f64,
    /// Priority 1–10, higher is more important.
    pub priority: u8,
    /// Optional expiry date.
    pub expiry_date: Option<NaiveDate>,
    /// Optional number of uses before the item is spent.
    pub usage_limit: Option<u32>,
    /// Uses so far.
    pub usage_count: u32,
    /// Zone the item prefers to be stored in.
    pub preferred_zone: Option<String>,
    /// Lifecycle status; kept consistent with [`Item::derived_status`].
    pub status: ItemStatus,
    /// Placement, once the item is stowed in a container.
    pub stowed: Option<StowedAt>,
}

impl Item {
    /// Creates a new active, unplaced item.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        width: f64,
        depth: f64,
        height: f64,
        mass: f64,
        priority: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dimensions: Vector3::new(width, depth, height),
            mass,
            priority,
            expiry_date: None,
            usage_limit: None,
            usage_count: 0,
            preferred_zone: None,
            status: ItemStatus::Active,
            stowed: None,
        }
    }

    /// Sets the expiry date.
    pub fn with_expiry(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    /// Sets the usage limit.
    pub fn with_usage_limit(mut self, limit: u32) -> Self {
        self.usage_limit = Some(limit);
        self
    }

    /// Sets the preferred zone.
    pub fn with_preferred_zone(mut self, zone: impl Into<String>) -> Self {
        self.preferred_zone = Some(zone.into());
        self
    }

    /// Places the item at a position with an orientation.
    pub fn stowed_at(
        mut self,
        container_id: impl Into<String>,
        position: Vector3<f64>,
        orientation: Orientation,
    ) -> Self {
        self.stowed = Some(StowedAt {
            container_id: container_id.into(),
            position,
            orientation,
        });
        self
    }

    /// Raw volume; identical for every orientation.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Effective dimensions under the stowed orientation, or the raw
    /// dimensions when the item is loose.
    pub fn effective_dimensions(&self) -> Vector3<f64> {
        match &self.stowed {
            Some(s) => s.orientation.apply(self.dimensions),
            None => self.dimensions,
        }
    }

    /// The AABB the item occupies, if placed.
    pub fn aabb(&self) -> Option<Aabb> {
        self.stowed
            .as_ref()
            .map(|s| Aabb::from_position(s.position, s.orientation.apply(self.dimensions)))
    }

    /// True if the expiry date has passed at `current_date`.
    pub fn is_expired(&self, current_date: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d <= current_date)
    }

    /// True if the usage limit is set and reached.
    pub fn is_depleted(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.usage_count >= limit)
    }

    /// Re-derives the lifecycle status from expiry and usage state. An
    /// explicit Waste flag is sticky and never derives back to Active.
    pub fn derived_status(&self, current_date: NaiveDate) -> ItemStatus {
        if self.status == ItemStatus::Waste || self.is_expired(current_date) || self.is_depleted() {
            ItemStatus::Waste
        } else {
            ItemStatus::Active
        }
    }

    /// Why the item counts as waste at `current_date`, if it does.
    /// Expiry takes precedence when both conditions hold.
    pub fn waste_reason(&self, current_date: NaiveDate) -> Option<WasteReason> {
        if self.is_expired(current_date) {
            Some(WasteReason::Expired)
        } else if self.is_depleted() {
            Some(WasteReason::OutOfUses)
        } else {
            None
        }
    }

    /// Remaining uses, or `None` when the item has no usage limit.
    pub fn remaining_uses(&self) -> Option<u32> {
        self.usage_limit
            .map(|limit| limit.saturating_sub(self.usage_count))
    }

    /// Validates dimensions, mass and priority.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0 || self.dimensions.z <= 0.0 {
            return Err(Error::InvalidItem(format!(
                "all dimensions for '{}' must be positive",
                self.id
            )));
        }
        if self.mass < 0.0 {
            return Err(Error::InvalidItem(format!(
                "mass for '{}' cannot be negative",
                self.id
            )));
        }
        if !(1..=10).contains(&self.priority) {
            return Err(Error::InvalidItem(format!(
                "priority for '{}' must be in 1..=10",
                self.id
            )));
        }
        Ok(())
    }
}
