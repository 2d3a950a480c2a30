//! Waste-return planner: weight-budgeted selection for the return vehicle.
//!
//! Waste items are whatever the snapshot's derived status says is waste at
//! the given date: explicitly flagged items, items past their expiry date,
//! and items out of uses. Selection for return is greedy by descending
//! priority under a hard mass budget; an item over the remaining budget is
//! skipped and never reconsidered, but scanning continues.

use crate::plan::{ManifestEntry, ReturnAction, ReturnManifest, ReturnPlan, ReturnStep, WasteRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use stowage_core::{Error, Item, ItemStatus, ItemUpdate, Result, Snapshot};

/// The waste-return planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct WastePlanner;

impl WastePlanner {
    /// Creates a planner.
    pub fn new() -> Self {
        Self
    }

    /// Everything that counts as waste at `current_date`, with the reason
    /// where one is derivable. Pure inventory sweep, no budget involved.
    pub fn identify_waste(&self, snapshot: &Snapshot, current_date: NaiveDate) -> Vec<WasteRecord> {
        snapshot
            .items
            .values()
            .filter(|item| item.derived_status(current_date) == ItemStatus::Waste)
            .filter_map(|item| {
                item.waste_reason(current_date).map(|reason| WasteRecord {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    reason,
                    container_id: item.stowed.as_ref().map(|s| s.container_id.clone()),
                })
            })
            .collect()
    }

    /// Selects waste items for a return vehicle with capacity `max_weight`
    /// and lays out the loading steps. Higher-priority waste goes first;
    /// the budget is a hard limit, never exceeded.
    pub fn plan_return(
        &self,
        snapshot: &Snapshot,
        current_date: NaiveDate,
        max_weight: f64,
    ) -> Result<ReturnPlan> {
        if max_weight <= 0.0 {
            return Err(Error::InvalidWeightLimit(max_weight));
        }

        let mut candidates: Vec<&Item> = snapshot
            .items
            .values()
            .filter(|item| item.derived_status(current_date) == ItemStatus::Waste)
            .collect();
        // Stable: equal priorities keep snapshot (id) order.
        candidates.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut accepted: Vec<&Item> = Vec::new();
        let mut total_mass = 0.0;
        for item in candidates {
            if total_mass + item.mass > max_weight {
                log::debug!(
                    "skipping waste item '{}' ({} kg) over remaining budget",
                    item.id,
                    item.mass
                );
                continue;
            }
            total_mass += item.mass;
            accepted.push(item);
        }

        let mut steps = Vec::with_capacity(accepted.len() * 2);
        let mut reclaimed_volume: BTreeMap<String, f64> = BTreeMap::new();
        let mut step_number = 1usize;
        for item in &accepted {
            steps.push(ReturnStep {
                step_number,
                action: ReturnAction::Remove,
                item_id: item.id.clone(),
                item_name: item.name.clone(),
            });
            step_number += 1;
            if let Some(stowed) = &item.stowed {
                *reclaimed_volume.entry(stowed.container_id.clone()).or_default() +=
                    item.volume();
            }
            steps.push(ReturnStep {
                step_number,
                action: ReturnAction::Retrieve,
                item_id: item.id.clone(),
                item_name: item.name.clone(),
            });
            step_number += 1;
        }

        let items = accepted
            .iter()
            .map(|item| ManifestEntry {
                item_id: item.id.clone(),
                name: item.name.clone(),
                mass: item.mass,
                reason: item.waste_reason(current_date),
            })
            .collect();

        Ok(ReturnPlan {
            steps,
            manifest: ReturnManifest {
                items,
                total_mass,
                remaining_capacity: max_weight - total_mass,
                reclaimed_volume,
            },
        })
    }

    /// Updates that clear every waste item off the vessel once the return
    /// vehicle undocks: unstow whatever is still in a container, then drop
    /// the item from the inventory. Applying the unstows releases the
    /// occupied volume.
    pub fn complete_undocking(
        &self,
        snapshot: &Snapshot,
        current_date: NaiveDate,
    ) -> Vec<ItemUpdate> {
        let mut updates = Vec::new();
        for item in snapshot.items.values() {
            if item.derived_status(current_date) != ItemStatus::Waste {
                continue;
            }
            if item.stowed.is_some() {
                updates.push(ItemUpdate::Unstow {
                    item_id: item.id.clone(),
                });
            }
            updates.push(ItemUpdate::Remove {
                item_id: item.id.clone(),
            });
        }
        if !updates.is_empty() {
            log::debug!("undocking clears {} update(s)", updates.len());
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use stowage_core::{Container, Orientation, WasteReason};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn waste_snapshot() -> Snapshot {
        Snapshot::new()
            .with_container(Container::new("C1", "Storage", 100.0, 100.0, 100.0))
            .with_item(
                Item::new("EXP", "Old Rations", 10.0, 10.0, 10.0, 4.0, 3)
                    .with_expiry(date(2026, 1, 1))
                    .stowed_at("C1", Vector3::zeros(), Orientation::Xyz),
            )
            .with_item({
                let mut item = Item::new("DEP", "Filter Pack", 10.0, 10.0, 10.0, 3.0, 7)
                    .with_usage_limit(5)
                    .stowed_at("C1", Vector3::new(20.0, 0.0, 0.0), Orientation::Xyz);
                item.usage_count = 5;
                item
            })
            .with_item(
                Item::new("OK", "Fresh Rations", 10.0, 10.0, 10.0, 4.0, 5)
                    .with_expiry(date(2027, 1, 1))
                    .stowed_at("C1", Vector3::new(40.0, 0.0, 0.0), Orientation::Xyz),
            )
    }

    #[test]
    fn test_identify_waste_reports_reasons() {
        let records = WastePlanner::new().identify_waste(&waste_snapshot(), date(2026, 6, 1));
        assert_eq!(records.len(), 2);
        let expired = records.iter().find(|r| r.item_id == "EXP").unwrap();
        assert_eq!(expired.reason, WasteReason::Expired);
        assert_eq!(expired.container_id.as_deref(), Some("C1"));
        let depleted = records.iter().find(|r| r.item_id == "DEP").unwrap();
        assert_eq!(depleted.reason, WasteReason::OutOfUses);
    }

    #[test]
    fn test_return_selection_is_priority_descending() {
        let plan = WastePlanner::new()
            .plan_return(&waste_snapshot(), date(2026, 6, 1), 100.0)
            .unwrap();
        let ids: Vec<&str> = plan.manifest.items.iter().map(|e| e.item_id.as_str()).collect();
        // DEP (priority 7) outranks EXP (priority 3); OK is not waste.
        assert_eq!(ids, vec!["DEP", "EXP"]);
        assert_relative_eq!(plan.manifest.total_mass, 7.0);
        assert_relative_eq!(plan.manifest.remaining_capacity, 93.0);
    }

    #[test]
    fn test_budget_skip_does_not_stop_scanning() {
        let plan = WastePlanner::new()
            .plan_return(&waste_snapshot(), date(2026, 6, 1), 3.5)
            .unwrap();
        // DEP (3 kg) fits; EXP (4 kg) over the remaining 0.5 kg is skipped.
        let ids: Vec<&str> = plan.manifest.items.iter().map(|e| e.item_id.as_str()).collect();
        assert_eq!(ids, vec!["DEP"]);
        assert_relative_eq!(plan.manifest.total_mass, 3.0);
    }

    #[test]
    fn test_return_steps_interleave_remove_and_retrieve() {
        let plan = WastePlanner::new()
            .plan_return(&waste_snapshot(), date(2026, 6, 1), 100.0)
            .unwrap();
        assert_eq!(plan.steps.len(), 4);
        assert_eq!(plan.steps[0].action, ReturnAction::Remove);
        assert_eq!(plan.steps[0].item_id, "DEP");
        assert_eq!(plan.steps[1].action, ReturnAction::Retrieve);
        assert_eq!(plan.steps[1].item_id, "DEP");
        assert_eq!(plan.steps[2].action, ReturnAction::Remove);
        assert_eq!(plan.steps[2].item_id, "EXP");
        assert_eq!(plan.steps[3].action, ReturnAction::Retrieve);
        let numbers: Vec<usize> = plan.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_loose_waste_item_still_gets_both_steps() {
        // Already out of its container, but the loading sequence keeps the
        // same two-step shape; it just reclaims no volume.
        let snapshot = Snapshot::new().with_item(
            Item::new("LOOSE", "Dead Battery", 5.0, 5.0, 5.0, 2.0, 5)
                .with_expiry(date(2026, 1, 1)),
        );
        let plan = WastePlanner::new()
            .plan_return(&snapshot, date(2026, 6, 1), 100.0)
            .unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].action, ReturnAction::Remove);
        assert_eq!(plan.steps[1].action, ReturnAction::Retrieve);
        assert!(plan.manifest.reclaimed_volume.is_empty());
    }

    #[test]
    fn test_reclaimed_volume_per_container() {
        let plan = WastePlanner::new()
            .plan_return(&waste_snapshot(), date(2026, 6, 1), 100.0)
            .unwrap();
        assert_eq!(plan.manifest.reclaimed_volume.len(), 1);
        assert_relative_eq!(plan.manifest.reclaimed_volume["C1"], 2000.0);
    }

    #[test]
    fn test_invalid_weight_limit() {
        let result = WastePlanner::new().plan_return(&waste_snapshot(), date(2026, 6, 1), 0.0);
        assert!(matches!(result, Err(Error::InvalidWeightLimit(w)) if w == 0.0));
    }

    #[test]
    fn test_complete_undocking_clears_waste() {
        let updates =
            WastePlanner::new().complete_undocking(&waste_snapshot(), date(2026, 6, 1));
        // Two waste items, each unstowed then removed.
        assert_eq!(updates.len(), 4);
        assert!(matches!(&updates[0], ItemUpdate::Unstow { item_id } if item_id == "DEP"));
        assert!(matches!(&updates[1], ItemUpdate::Remove { item_id } if item_id == "DEP"));
        assert!(matches!(&updates[2], ItemUpdate::Unstow { item_id } if item_id == "EXP"));
        assert!(matches!(&updates[3], ItemUpdate::Remove { item_id } if item_id == "EXP"));
    }
}
