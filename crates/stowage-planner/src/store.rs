//! Store seam: where planner decisions get persisted.
//!
//! Planners are pure; they return typed updates and never touch storage.
//! The `Store` trait is the boundary a persistence backend implements, and
//! `MemoryStore` is the map-backed implementation used in tests and by
//! embedders that do not need durability. Occupancy bookkeeping lives
//! here: applying a stow or unstow keeps container volume consistent.

use std::collections::BTreeMap;
use stowage_core::{Container, Error, Item, ItemUpdate, Result, Snapshot, StowedAt};

/// Persistence boundary for items and containers.
pub trait Store {
    /// Fetches an item by id.
    fn get_item(&self, item_id: &str) -> Result<Item>;
    /// Fetches a container by id.
    fn get_container(&self, container_id: &str) -> Result<Container>;
    /// All containers, in id order.
    fn list_containers(&self) -> Vec<Container>;
    /// Items stored in a container, in storage order.
    fn list_items_in(&self, container_id: &str) -> Result<Vec<Item>>;
    /// The read-only view planners consume.
    fn snapshot(&self) -> Snapshot;
    /// Applies one typed update.
    fn apply(&mut self, update: &ItemUpdate) -> Result<()>;

    /// Applies a batch of updates in order, stopping at the first error.
    fn apply_all(&mut self, updates: &[ItemUpdate]) -> Result<()> {
        for update in updates {
            if let Err(err) = self.apply(update) {
                log::warn!("update for item '{}' not applied: {err}", update.item_id());
                return Err(err);
            }
        }
        Ok(())
    }
}

/// In-memory store backed by ordered maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, Item>,
    containers: BTreeMap<String, Container>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item after validation.
    pub fn add_item(&mut self, item: Item) -> Result<()> {
        item.validate()?;
        if let Some(stowed) = item.stowed.clone() {
            let container = self
                .containers
                .get_mut(&stowed.container_id)
                .ok_or_else(|| Error::ContainerNotFound(stowed.container_id.clone()))?;
            container.stow(item.id.clone(), item.volume());
        }
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Adds a container after validation.
    pub fn add_container(&mut self, container: Container) -> Result<()> {
        container.validate()?;
        self.containers.insert(container.id.clone(), container);
        Ok(())
    }

    fn item_mut(&mut self, item_id: &str) -> Result<&mut Item> {
        self.items
            .get_mut(item_id)
            .ok_or_else(|| Error::ItemNotFound(item_id.to_string()))
    }

    fn release_from_container(&mut self, item_id: &str) -> Result<()> {
        let Some(item) = self.items.get(item_id) else {
            return Err(Error::ItemNotFound(item_id.to_string()));
        };
        let volume = item.volume();
        if let Some(stowed) = &item.stowed {
            let container_id = stowed.container_id.clone();
            let container = self
                .containers
                .get_mut(&container_id)
                .ok_or(Error::ContainerNotFound(container_id))?;
            container.release(item_id, volume);
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn get_item(&self, item_id: &str) -> Result<Item> {
        self.items
            .get(item_id)
            .cloned()
            .ok_or_else(|| Error::ItemNotFound(item_id.to_string()))
    }

    fn get_container(&self, container_id: &str) -> Result<Container> {
        self.containers
            .get(container_id)
            .cloned()
            .ok_or_else(|| Error::ContainerNotFound(container_id.to_string()))
    }

    fn list_containers(&self) -> Vec<Container> {
        self.containers.values().cloned().collect()
    }

    fn list_items_in(&self, container_id: &str) -> Result<Vec<Item>> {
        let container = self
            .containers
            .get(container_id)
            .ok_or_else(|| Error::ContainerNotFound(container_id.to_string()))?;
        Ok(container
            .items
            .iter()
            .filter_map(|id| self.items.get(id).cloned())
            .collect())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            items: self.items.clone(),
            containers: self.containers.clone(),
        }
    }

    fn apply(&mut self, update: &ItemUpdate) -> Result<()> {
        match update {
            ItemUpdate::Stow {
                item_id,
                container_id,
                position,
                orientation,
            } => {
                if !self.containers.contains_key(container_id) {
                    return Err(Error::ContainerNotFound(container_id.clone()));
                }
                // Moving out of a previous container releases its volume.
                self.release_from_container(item_id)?;
                let item = self.item_mut(item_id)?;
                let volume = item.volume();
                item.stowed = Some(StowedAt {
                    container_id: container_id.clone(),
                    position: *position,
                    orientation: *orientation,
                });
                if let Some(container) = self.containers.get_mut(container_id) {
                    container.stow(item_id.clone(), volume);
                }
                Ok(())
            }
            ItemUpdate::Unstow { item_id } => {
                self.release_from_container(item_id)?;
                self.item_mut(item_id)?.stowed = None;
                Ok(())
            }
            ItemUpdate::SetStatus { item_id, status } => {
                self.item_mut(item_id)?.status = *status;
                Ok(())
            }
            ItemUpdate::SetUsageCount {
                item_id,
                usage_count,
            } => {
                self.item_mut(item_id)?.usage_count = *usage_count;
                Ok(())
            }
            ItemUpdate::Remove { item_id } => {
                self.release_from_container(item_id)?;
                self.items
                    .remove(item_id)
                    .map(|_| ())
                    .ok_or_else(|| Error::ItemNotFound(item_id.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use stowage_core::Orientation;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .add_container(Container::new("C1", "Storage", 100.0, 100.0, 100.0))
            .unwrap();
        store
            .add_item(Item::new("I1", "Food Package", 10.0, 10.0, 10.0, 5.0, 5))
            .unwrap();
        store
    }

    #[test]
    fn test_stow_and_unstow_keep_volume_consistent() {
        let mut store = seeded();
        store
            .apply(&ItemUpdate::Stow {
                item_id: "I1".into(),
                container_id: "C1".into(),
                position: Vector3::zeros(),
                orientation: Orientation::Xyz,
            })
            .unwrap();
        assert_relative_eq!(store.get_container("C1").unwrap().occupied_volume, 1000.0);
        assert_eq!(store.list_items_in("C1").unwrap().len(), 1);

        store.apply(&ItemUpdate::Unstow { item_id: "I1".into() }).unwrap();
        assert_relative_eq!(store.get_container("C1").unwrap().occupied_volume, 0.0);
        assert!(store.list_items_in("C1").unwrap().is_empty());
        assert!(store.get_item("I1").unwrap().stowed.is_none());
    }

    #[test]
    fn test_restow_moves_between_containers() {
        let mut store = seeded();
        store
            .add_container(Container::new("C2", "Lab", 100.0, 100.0, 100.0))
            .unwrap();
        store
            .apply(&ItemUpdate::Stow {
                item_id: "I1".into(),
                container_id: "C1".into(),
                position: Vector3::zeros(),
                orientation: Orientation::Xyz,
            })
            .unwrap();
        store
            .apply(&ItemUpdate::Stow {
                item_id: "I1".into(),
                container_id: "C2".into(),
                position: Vector3::zeros(),
                orientation: Orientation::Xyz,
            })
            .unwrap();
        assert_relative_eq!(store.get_container("C1").unwrap().occupied_volume, 0.0);
        assert_relative_eq!(store.get_container("C2").unwrap().occupied_volume, 1000.0);
    }

    #[test]
    fn test_remove_releases_and_deletes() {
        let mut store = seeded();
        store
            .apply(&ItemUpdate::Stow {
                item_id: "I1".into(),
                container_id: "C1".into(),
                position: Vector3::zeros(),
                orientation: Orientation::Xyz,
            })
            .unwrap();
        store.apply(&ItemUpdate::Remove { item_id: "I1".into() }).unwrap();
        assert!(matches!(store.get_item("I1"), Err(Error::ItemNotFound(_))));
        assert_relative_eq!(store.get_container("C1").unwrap().occupied_volume, 0.0);
    }

    #[test]
    fn test_unknown_targets_are_typed_errors() {
        let mut store = seeded();
        assert!(matches!(
            store.apply(&ItemUpdate::Unstow { item_id: "NOPE".into() }),
            Err(Error::ItemNotFound(_))
        ));
        assert!(matches!(
            store.apply(&ItemUpdate::Stow {
                item_id: "I1".into(),
                container_id: "NOPE".into(),
                position: Vector3::zeros(),
                orientation: Orientation::Xyz,
            }),
            Err(Error::ContainerNotFound(_))
        ));
    }

    #[test]
    fn test_apply_all_stops_at_first_error() {
        let mut store = seeded();
        let updates = vec![
            ItemUpdate::SetUsageCount {
                item_id: "I1".into(),
                usage_count: 2,
            },
            ItemUpdate::Unstow {
                item_id: "NOPE".into(),
            },
        ];
        assert!(store.apply_all(&updates).is_err());
        assert_eq!(store.get_item("I1").unwrap().usage_count, 2);
    }
}
