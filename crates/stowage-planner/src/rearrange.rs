//! Rearrangement planner: priority-driven eviction when nothing fits.
//!
//! When the allocator finds no feasible placement, this planner looks for
//! a set of strictly lower-priority items whose removal would open a slot.
//! Candidates are tried lowest priority first, one container at a time,
//! re-running the feasibility scan after each tentative removal. The first
//! feasible (container, removal set) pair wins; the plan is advisory and
//! nothing is mutated until the caller applies it.

use crate::allocator::Allocator;
use crate::plan::{EvictionStep, RearrangementPlan};
use stowage_core::{Aabb, Item, Result, Snapshot};

/// The rearrangement planner. Wraps an allocator so the feasibility scan
/// and the final scored placement use the same grid and weights.
#[derive(Debug, Clone, Default)]
pub struct RearrangementPlanner {
    allocator: Allocator,
}

impl RearrangementPlanner {
    /// Creates a planner sharing the given allocator's configuration.
    pub fn new(allocator: Allocator) -> Self {
        Self { allocator }
    }

    /// Searches for evictions that make room for `item`. Returns `None`
    /// when no set of lower-priority removals opens a slot in any
    /// container; the snapshot is never modified either way.
    pub fn plan(&self, item: &Item, snapshot: &Snapshot) -> Result<Option<RearrangementPlan>> {
        item.validate()?;

        for container in snapshot.containers.values() {
            if let Some(plan) = self.plan_in_container(item, snapshot, &container.id)? {
                return Ok(Some(plan));
            }
        }
        log::warn!(
            "no eviction set opens a slot for item '{}' (priority {})",
            item.id,
            item.priority
        );
        Ok(None)
    }

    fn plan_in_container(
        &self,
        item: &Item,
        snapshot: &Snapshot,
        container_id: &str,
    ) -> Result<Option<RearrangementPlan>> {
        let container = snapshot.container(container_id)?;
        let stored = snapshot.items_in(container_id)?;

        // Strictly lower priority only; equals are never displaced.
        let mut candidates: Vec<&Item> = stored
            .iter()
            .copied()
            .filter(|other| other.priority < item.priority && other.aabb().is_some())
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        candidates.sort_by_key(|other| other.priority);

        let mut remaining: Vec<(&str, Aabb)> = stored
            .iter()
            .filter(|other| other.id != item.id)
            .filter_map(|other| other.aabb().map(|aabb| (other.id.as_str(), aabb)))
            .collect();
        let mut evicted: Vec<&Item> = Vec::new();

        for candidate in candidates {
            remaining.retain(|(id, _)| *id != candidate.id);
            evicted.push(candidate);

            let aabbs: Vec<Aabb> = remaining.iter().map(|(_, aabb)| *aabb).collect();
            if let Some((orientation, position)) = self.allocator.first_fit(item, container, &aabbs)
            {
                log::debug!(
                    "evicting {} item(s) from '{}' to place '{}'",
                    evicted.len(),
                    container.id,
                    item.id
                );
                let evictions = evicted
                    .iter()
                    .enumerate()
                    .map(|(i, e)| EvictionStep {
                        step_number: i + 1,
                        item_id: e.id.clone(),
                        from_container: container.id.clone(),
                        volume_freed: e.volume(),
                    })
                    .collect();
                let option =
                    self.allocator
                        .score(item, container, &aabbs, position, orientation, false);
                return Ok(Some(RearrangementPlan { evictions, option }));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use stowage_core::{Container, Orientation};

    fn full_container(priorities: [u8; 2]) -> Snapshot {
        // Two 10x10x10 bricks filling a 20x10x10 container completely.
        Snapshot::new()
            .with_container(Container::new("C1", "Storage", 20.0, 10.0, 10.0))
            .with_item(
                Item::new("A", "Brick A", 10.0, 10.0, 10.0, 1.0, priorities[0]).stowed_at(
                    "C1",
                    Vector3::zeros(),
                    Orientation::Xyz,
                ),
            )
            .with_item(
                Item::new("B", "Brick B", 10.0, 10.0, 10.0, 1.0, priorities[1]).stowed_at(
                    "C1",
                    Vector3::new(10.0, 0.0, 0.0),
                    Orientation::Xyz,
                ),
            )
    }

    #[test]
    fn test_evicts_lowest_priority_first() {
        let snapshot = full_container([4, 2]);
        let incoming = Item::new("NEW", "Urgent Kit", 10.0, 10.0, 10.0, 1.0, 8);

        let plan = RearrangementPlanner::default()
            .plan(&incoming, &snapshot)
            .unwrap()
            .unwrap();
        assert_eq!(plan.evictions.len(), 1);
        assert_eq!(plan.evictions[0].item_id, "B");
        assert_eq!(plan.evictions[0].from_container, "C1");
        assert_eq!(plan.evictions[0].volume_freed, 1000.0);
        // The slot the eviction opened.
        assert_eq!(plan.option.container_id, "C1");
        assert_eq!(plan.option.position, Vector3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_equal_priority_is_never_displaced() {
        let snapshot = full_container([5, 5]);
        let incoming = Item::new("NEW", "Kit", 10.0, 10.0, 10.0, 1.0, 5);
        let plan = RearrangementPlanner::default().plan(&incoming, &snapshot).unwrap();
        assert!(plan.is_none());
    }

    #[test]
    fn test_multiple_evictions_accumulate() {
        // Incoming spans the whole container; both bricks must go.
        let snapshot = full_container([3, 2]);
        let incoming = Item::new("NEW", "Rack", 20.0, 10.0, 10.0, 1.0, 9);

        let plan = RearrangementPlanner::default()
            .plan(&incoming, &snapshot)
            .unwrap()
            .unwrap();
        assert_eq!(plan.evictions.len(), 2);
        // Lowest priority evicted first.
        assert_eq!(plan.evictions[0].item_id, "B");
        assert_eq!(plan.evictions[1].item_id, "A");
        assert_eq!(plan.option.position, Vector3::zeros());
    }

    #[test]
    fn test_snapshot_is_untouched_on_failure() {
        let snapshot = full_container([5, 5]);
        let incoming = Item::new("NEW", "Kit", 10.0, 10.0, 10.0, 1.0, 5);
        let before: Vec<_> = snapshot.items.keys().cloned().collect();
        let _ = RearrangementPlanner::default().plan(&incoming, &snapshot).unwrap();
        let after: Vec<_> = snapshot.items.keys().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(snapshot.container("C1").unwrap().occupied_volume, 2000.0);
    }

    #[test]
    fn test_first_feasible_container_wins() {
        let snapshot = full_container([2, 2]).with_container(Container::new(
            "C2",
            "Storage",
            20.0,
            10.0,
            10.0,
        ));
        // C2 is empty, but it holds nothing evictable; C1 still wins since
        // the planner is a fallback for when direct allocation failed.
        let incoming = Item::new("NEW", "Kit", 10.0, 10.0, 10.0, 1.0, 8);
        let plan = RearrangementPlanner::default()
            .plan(&incoming, &snapshot)
            .unwrap()
            .unwrap();
        assert_eq!(plan.option.container_id, "C1");
    }
}
