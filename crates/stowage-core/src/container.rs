//! Storage container entity.

use crate::geometry;
use crate::item::ItemId;
use crate::{Error, Result};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a container.
pub type ContainerId = String;

/// A fixed-size storage container with one open face at y = 0.
///
/// The container owns the set of item ids stored in it; items carry only a
/// non-owning back-reference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container {
    /// Unique identifier.
    pub id: ContainerId,
    /// Zone label (e.g. "Storage", "Lab").
    pub zone: String,
    /// Dimensions (width, depth, height).
    pub dimensions: Vector3<f64>,
    /// Sum of stored items' volumes.
    pub occupied_volume: f64,
    /// Ids of items currently stored, in insertion order.
    pub items: Vec<ItemId>,
}

impl Container {
    /// Creates a new empty container.
    pub fn new(
        id: impl Into<ContainerId>,
        zone: impl Into<String>,
        width: f64,
        depth: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            zone: zone.into(),
            dimensions: Vector3::new(width, depth, height),
            occupied_volume: 0.0,
            items: Vec::new(),
        }
    }

    /// Returns the width (x extent).
    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the depth (y extent; the open face is at y = 0).
    pub fn depth(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the height (z extent).
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Total volume.
    pub fn total_volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Volume not yet occupied by stored items.
    pub fn remaining_volume(&self) -> f64 {
        self.total_volume() - self.occupied_volume
    }

    /// Raw-bounds fit test for effective dimensions.
    pub fn fits(&self, dims: Vector3<f64>) -> bool {
        geometry::fits(self.dimensions, dims)
    }

    /// Records an item's arrival, updating the occupancy bookkeeping.
    pub fn stow(&mut self, item_id: ItemId, volume: f64) {
        self.occupied_volume += volume;
        self.items.push(item_id);
    }

    /// Records an item's departure, releasing its volume.
    pub fn release(&mut self, item_id: &str, volume: f64) {
        self.occupied_volume = (self.occupied_volume - volume).max(0.0);
        self.items.retain(|id| id != item_id);
    }

    /// Validates dimensions and the occupancy invariant.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0 || self.dimensions.z <= 0.0 {
            return Err(Error::InvalidContainer(format!(
                "all dimensions for '{}' must be positive",
                self.id
            )));
        }
        // Tolerance absorbs float drift from repeated stow/release cycles.
        if self.occupied_volume > self.total_volume() + 1e-6 {
            return Err(Error::InvalidContainer(format!(
                "occupied volume {} exceeds total volume {} in '{}'",
                self.occupied_volume,
                self.total_volume(),
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_volumes() {
        let container = Container::new("C1", "Storage", 100.0, 80.0, 50.0);
        assert_relative_eq!(container.total_volume(), 400_000.0);
        assert_relative_eq!(container.remaining_volume(), 400_000.0);
    }

    #[test]
    fn test_stow_and_release() {
        let mut container = Container::new("C1", "Storage", 100.0, 100.0, 100.0);
        container.stow("I1".to_string(), 1000.0);
        container.stow("I2".to_string(), 500.0);
        assert_relative_eq!(container.occupied_volume, 1500.0);
        assert_eq!(container.items, vec!["I1", "I2"]);

        container.release("I1", 1000.0);
        assert_relative_eq!(container.occupied_volume, 500.0);
        assert_eq!(container.items, vec!["I2"]);
    }

    #[test]
    fn test_fits() {
        let container = Container::new("C1", "Storage", 50.0, 40.0, 30.0);
        assert!(container.fits(Vector3::new(50.0, 40.0, 30.0)));
        assert!(!container.fits(Vector3::new(60.0, 10.0, 10.0)));
    }

    #[test]
    fn test_validation() {
        assert!(Container::new("C1", "Storage", 10.0, 10.0, 10.0)
            .validate()
            .is_ok());
        assert!(Container::new("C2", "Storage", 0.0, 10.0, 10.0)
            .validate()
            .is_err());

        let mut overfull = Container::new("C3", "Storage", 10.0, 10.0, 10.0);
        overfull.occupied_volume = 2000.0;
        assert!(overfull.validate().is_err());
    }
}
