//! Simulation clock: day-by-day time advancement over the inventory.
//!
//! The clock never holds state; callers pass the current date explicitly
//! and receive a delta report plus the typed updates to persist. Days are
//! simulated strictly in sequence. Each day first sweeps expiry dates,
//! then re-applies the caller's per-day usage events, so an item consumed
//! daily loses one use per simulated day.

use crate::plan::{DeltaReport, ExpiringItem, ItemChange, ItemUsed, StatusReport, UsageEvent};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use stowage_core::{Error, Item, ItemStatus, ItemUpdate, Result, Snapshot};

/// How far to advance the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationSpan {
    /// A fixed number of whole days.
    Days(u32),
    /// Up to and including the given date.
    Until(NaiveDate),
}

/// The simulation clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationClock;

impl SimulationClock {
    /// Creates a clock.
    pub fn new() -> Self {
        Self
    }

    /// Advances time from `current_date` over `span`, re-applying `events`
    /// once per simulated day. The snapshot is read-only; all effects come
    /// back in the report's update list.
    pub fn simulate(
        &self,
        snapshot: &Snapshot,
        current_date: NaiveDate,
        span: SimulationSpan,
        events: &[UsageEvent],
    ) -> Result<DeltaReport> {
        let target = self.target_date(current_date, span)?;
        if target <= current_date {
            return Err(Error::InvalidSimulationTarget {
                current: current_date,
                target,
            });
        }

        let mut working: BTreeMap<String, Item> = snapshot.items.clone();
        let mut items_used = Vec::new();
        let mut items_expired = Vec::new();
        let mut items_depleted = Vec::new();

        let mut date = current_date;
        let mut days_simulated = 0u32;
        while date < target {
            date = date
                .checked_add_days(Days::new(1))
                .ok_or(Error::InvalidSimulationTarget {
                    current: current_date,
                    target,
                })?;
            days_simulated += 1;

            // Expiry sweep first, so the transition is dated to the day
            // the expiry is crossed.
            for item in working.values_mut() {
                if item.status == ItemStatus::Active && item.is_expired(date) {
                    log::debug!("item '{}' expires on {}", item.id, date);
                    item.status = ItemStatus::Waste;
                    items_expired.push(ItemChange {
                        item_id: item.id.clone(),
                        name: item.name.clone(),
                    });
                }
            }

            for event in events {
                let Some(id) = resolve_event(&working, event) else {
                    log::warn!("usage event matches no item, skipping");
                    continue;
                };
                // resolve_event only returns ids present in the map.
                let Some(item) = working.get_mut(&id) else {
                    continue;
                };
                // Usage applies regardless of lifecycle status; crews draw
                // on an item until it is physically gone.
                item.usage_count += 1;
                items_used.push(ItemUsed {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    remaining_uses: item.remaining_uses(),
                });
                // Depletion is recorded on the crossing only, not on every
                // use past the limit.
                if item.usage_limit.is_some_and(|limit| item.usage_count == limit) {
                    log::debug!("item '{}' runs out of uses on {}", item.id, date);
                    item.status = ItemStatus::Waste;
                    items_depleted.push(ItemChange {
                        item_id: item.id.clone(),
                        name: item.name.clone(),
                    });
                }
            }
        }

        // Collapse the working state into per-item updates.
        let mut updates = Vec::new();
        for (id, after) in &working {
            let before = snapshot.item(id)?;
            if after.usage_count != before.usage_count {
                updates.push(ItemUpdate::SetUsageCount {
                    item_id: id.clone(),
                    usage_count: after.usage_count,
                });
            }
            if after.status != before.status {
                updates.push(ItemUpdate::SetStatus {
                    item_id: id.clone(),
                    status: after.status,
                });
            }
        }

        Ok(DeltaReport {
            new_date: target,
            days_simulated,
            items_used,
            items_expired,
            items_depleted,
            updates,
        })
    }

    /// Inventory statistics at `current_date`, with items expiring within
    /// the next `horizon_days` days listed soonest first.
    pub fn status_report(
        &self,
        snapshot: &Snapshot,
        current_date: NaiveDate,
        horizon_days: u32,
    ) -> StatusReport {
        let horizon = current_date
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);

        let mut expiring_soon: Vec<ExpiringItem> = snapshot
            .items
            .values()
            .filter(|item| item.derived_status(current_date) == ItemStatus::Active)
            .filter_map(|item| {
                let expiry = item.expiry_date?;
                (expiry > current_date && expiry <= horizon).then(|| ExpiringItem {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    expiry_date: expiry,
                })
            })
            .collect();
        expiring_soon.sort_by_key(|e| e.expiry_date);

        StatusReport {
            current_date,
            total_items: snapshot.items.len(),
            total_containers: snapshot.containers.len(),
            items_stowed: snapshot.items.values().filter(|i| i.stowed.is_some()).count(),
            waste_items: snapshot
                .items
                .values()
                .filter(|i| i.derived_status(current_date) == ItemStatus::Waste)
                .count(),
            expiring_soon,
        }
    }

    fn target_date(&self, current_date: NaiveDate, span: SimulationSpan) -> Result<NaiveDate> {
        match span {
            SimulationSpan::Days(days) => current_date
                .checked_add_days(Days::new(u64::from(days)))
                .ok_or(Error::InvalidSimulationTarget {
                    current: current_date,
                    target: NaiveDate::MAX,
                }),
            SimulationSpan::Until(target) => Ok(target),
        }
    }
}

/// Resolves a usage event to an item id: by id when present, otherwise the
/// first item (in id order) whose name matches exactly.
fn resolve_event(items: &BTreeMap<String, Item>, event: &UsageEvent) -> Option<String> {
    if let Some(id) = &event.item_id {
        return items.contains_key(id).then(|| id.clone());
    }
    let name = event.name.as_deref()?;
    items
        .values()
        .find(|item| item.name == name)
        .map(|item| item.id.clone())
}
