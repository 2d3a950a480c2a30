//! Access planner: line-of-sight retrieval along the depth axis.
//!
//! Containers open on the y = 0 face. An item B blocks an item A when B
//! sits entirely between A and the open face (`B.max_y <= A.min_y`) and
//! their x-z footprints overlap. A retrieval plan removes every blocker to
//! a staging position, retrieves the target, then places the blockers back
//! at their original positions in reverse removal order.

use crate::plan::{RetrievalAction, RetrievalPlan, RetrievalStep};
use nalgebra::Vector3;
use stowage_core::{Aabb, Error, Item, ItemStatus, ItemUpdate, Result, Snapshot};

const EPS: f64 = 1e-9;

/// Parameters of the staging-area shelf scan.
#[derive(Debug, Clone)]
pub struct StagingConfig {
    /// Spacing between staged items, in length units.
    pub gap: f64,
    /// Distance between the open face and the first staging row.
    pub clearance: f64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            gap: 5.0,
            clearance: 10.0,
        }
    }
}

impl StagingConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spacing between staged items.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Sets the clearance between the open face and the staging area.
    pub fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }
}

/// Left-to-right shelf scan over the staging floor in front of the open
/// face. Rows run across the container width and wrap away from the face.
struct StagingShelf {
    width: f64,
    gap: f64,
    cursor_x: f64,
    row_y: f64,
    row_depth: f64,
}

impl StagingShelf {
    fn new(width: f64, config: &StagingConfig) -> Self {
        Self {
            width,
            gap: config.gap,
            cursor_x: 0.0,
            row_y: -config.clearance,
            row_depth: 0.0,
        }
    }

    fn place(&mut self, dims: Vector3<f64>) -> Vector3<f64> {
        if self.cursor_x > 0.0 && self.cursor_x + dims.x > self.width + EPS {
            // Wrap to the next row, further from the face.
            self.row_y -= self.row_depth + self.gap;
            self.cursor_x = 0.0;
            self.row_depth = 0.0;
        }
        let position = Vector3::new(self.cursor_x, self.row_y - dims.y, 0.0);
        self.cursor_x += dims.x + self.gap;
        self.row_depth = self.row_depth.max(dims.y);
        position
    }
}

/// The access planner.
#[derive(Debug, Clone, Default)]
pub struct AccessPlanner {
    config: StagingConfig,
}

impl AccessPlanner {
    /// Creates a planner with the given staging configuration.
    pub fn new(config: StagingConfig) -> Self {
        Self { config }
    }

    /// Returns the staging configuration.
    pub fn config(&self) -> &StagingConfig {
        &self.config
    }

    /// Plans retrieval of a stowed item. The returned plan lists the
    /// manipulation steps and the typed updates the caller applies on
    /// completion: the usage count increments, and an item that reaches
    /// its usage limit becomes waste and leaves its container.
    pub fn plan_retrieval(&self, item_id: &str, snapshot: &Snapshot) -> Result<RetrievalPlan> {
        let item = snapshot.item(item_id)?;
        let stowed = item
            .stowed
            .as_ref()
            .ok_or_else(|| Error::ItemNotPlaced(item_id.to_string()))?;
        let target_aabb = item
            .aabb()
            .ok_or_else(|| Error::ItemNotPlaced(item_id.to_string()))?;

        let container = snapshot.container(&stowed.container_id)?;
        let blockers = self.blockers_of(item, &target_aabb, snapshot)?;

        let mut shelf = StagingShelf::new(container.width(), &self.config);
        let mut steps = Vec::with_capacity(blockers.len() * 2 + 1);
        let mut step_number = 1usize;

        for blocker in &blockers {
            let staging = shelf.place(blocker.effective_dimensions());
            steps.push(RetrievalStep {
                step_number,
                action: RetrievalAction::Remove,
                item_id: blocker.id.clone(),
                position: Some(staging),
            });
            step_number += 1;
        }

        steps.push(RetrievalStep {
            step_number,
            action: RetrievalAction::Retrieve,
            item_id: item.id.clone(),
            position: None,
        });
        step_number += 1;

        // Blockers go back last-removed first, at their original positions.
        for blocker in blockers.iter().rev() {
            let original = blocker.stowed.as_ref().map(|s| s.position);
            steps.push(RetrievalStep {
                step_number,
                action: RetrievalAction::PlaceBack,
                item_id: blocker.id.clone(),
                position: original,
            });
            step_number += 1;
        }

        let new_count = item.usage_count + 1;
        let mut updates = vec![ItemUpdate::SetUsageCount {
            item_id: item.id.clone(),
            usage_count: new_count,
        }];
        if item.usage_limit.is_some_and(|limit| new_count >= limit) {
            log::debug!("item '{}' reaches its usage limit on retrieval", item.id);
            updates.push(ItemUpdate::SetStatus {
                item_id: item.id.clone(),
                status: ItemStatus::Waste,
            });
            updates.push(ItemUpdate::Unstow {
                item_id: item.id.clone(),
            });
        }

        Ok(RetrievalPlan {
            item_id: item.id.clone(),
            container_id: stowed.container_id.clone(),
            blocking_count: blockers.len(),
            steps,
            updates,
        })
    }

    /// Number of items that must move before this item can be retrieved.
    /// Zero means direct line of sight to the open face.
    pub fn retrieval_difficulty(&self, item_id: &str, snapshot: &Snapshot) -> Result<usize> {
        let item = snapshot.item(item_id)?;
        let target_aabb = item
            .aabb()
            .ok_or_else(|| Error::ItemNotPlaced(item_id.to_string()))?;
        Ok(self.blockers_of(item, &target_aabb, snapshot)?.len())
    }

    /// Blockers of `item`, sorted ascending by their gap to the target
    /// (nearest first); ties keep container storage order.
    fn blockers_of<'a>(
        &self,
        item: &Item,
        target_aabb: &Aabb,
        snapshot: &'a Snapshot,
    ) -> Result<Vec<&'a Item>> {
        let stowed = item
            .stowed
            .as_ref()
            .ok_or_else(|| Error::ItemNotPlaced(item.id.clone()))?;

        let mut blockers: Vec<&Item> = snapshot
            .items_in(&stowed.container_id)?
            .into_iter()
            .filter(|other| other.id != item.id)
            .filter(|other| {
                other.aabb().is_some_and(|aabb| {
                    aabb.max_y <= target_aabb.min_y + EPS && aabb.footprint_overlaps(target_aabb)
                })
            })
            .collect();

        blockers.sort_by(|a, b| {
            let gap = |i: &Item| i.aabb().map_or(f64::MAX, |aabb| target_aabb.min_y - aabb.max_y);
            gap(a)
                .partial_cmp(&gap(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(blockers)
    }
}
