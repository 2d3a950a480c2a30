//! Entity snapshot consumed by the planners.

use crate::container::{Container, ContainerId};
use crate::item::{Item, ItemId};
use crate::{Error, Result};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An immutable view of the inventory at one point in time.
///
/// Every planner call receives its own snapshot and never mutates it; the
/// maps are keyed by id in a `BTreeMap` so iteration order — and with it
/// every tie-break in the planners — is deterministic.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// All known items, keyed by id.
    pub items: BTreeMap<ItemId, Item>,
    /// All known containers, keyed by id.
    pub containers: BTreeMap<ContainerId, Container>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item. When the item is stowed, the owning container's
    /// bookkeeping is updated as well.
    pub fn with_item(mut self, item: Item) -> Self {
        if let Some(stowed) = &item.stowed {
            if let Some(container) = self.containers.get_mut(&stowed.container_id) {
                container.stow(item.id.clone(), item.volume());
            }
        }
        self.items.insert(item.id.clone(), item);
        self
    }

    /// Adds a container.
    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.insert(container.id.clone(), container);
        self
    }

    /// Looks up an item by id.
    pub fn item(&self, id: &str) -> Result<&Item> {
        self.items
            .get(id)
            .ok_or_else(|| Error::ItemNotFound(id.to_string()))
    }

    /// Looks up a container by id.
    pub fn container(&self, id: &str) -> Result<&Container> {
        self.containers
            .get(id)
            .ok_or_else(|| Error::ContainerNotFound(id.to_string()))
    }

    /// Finds the first item whose name matches exactly.
    pub fn item_by_name(&self, name: &str) -> Option<&Item> {
        self.items.values().find(|item| item.name == name)
    }

    /// The items stored in a container, in the container's insertion order.
    pub fn items_in(&self, container_id: &str) -> Result<Vec<&Item>> {
        let container = self.container(container_id)?;
        Ok(container
            .items
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect())
    }
}
