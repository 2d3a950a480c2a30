//! Spatial allocator: grid-scan placement search over candidate containers.
//!
//! The search is an explicit iterator over (orientation, grid cell) pairs
//! per container, scanned in a fixed order: containers in the order the
//! caller supplies them, the six orientations in enumeration order, grid
//! cells ascending by (x, y, z). Ties in the overall score keep that scan
//! order, so the ranked result is fully deterministic. Containers are
//! scored independently and can therefore be scanned in parallel without
//! disturbing the tie-break.

use crate::plan::PlacementOption;
use nalgebra::Vector3;
use rayon::prelude::*;
use stowage_core::{Aabb, Container, Error, Item, Orientation, Result, Snapshot};

const EPS: f64 = 1e-9;

/// Tunable parameters of the placement search.
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Grid quantization step in length units.
    pub grid_resolution: f64,
    /// Weight of the accessibility score in the overall score.
    pub accessibility_weight: f64,
    /// Weight of the space-efficiency score.
    pub efficiency_weight: f64,
    /// Weight of the priority score.
    pub priority_weight: f64,
    /// Weight of the zone-preference score.
    pub zone_weight: f64,
    /// Multiplicative accessibility penalty per item nearer the open face.
    pub blocking_penalty: f64,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 5.0,
            accessibility_weight: 0.4,
            efficiency_weight: 0.2,
            priority_weight: 0.3,
            zone_weight: 0.1,
            blocking_penalty: 0.8,
        }
    }
}

impl AllocatorConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid quantization step.
    pub fn with_grid_resolution(mut self, resolution: f64) -> Self {
        self.grid_resolution = resolution;
        self
    }

    /// Sets the accessibility penalty applied per obstructing item.
    pub fn with_blocking_penalty(mut self, penalty: f64) -> Self {
        self.blocking_penalty = penalty;
        self
    }
}

/// Lazy scan over feasible (orientation, position) candidates in one
/// container. Yields candidates in the fixed deterministic order; callers
/// that only need feasibility can short-circuit after the first yield.
pub struct CandidateScan<'a> {
    bounds: Vector3<f64>,
    raw_dims: Vector3<f64>,
    placed: &'a [Aabb],
    resolution: f64,
    orientation_idx: usize,
    dims: Vector3<f64>,
    cells: (usize, usize, usize),
    cursor: Option<(usize, usize, usize)>,
}

impl<'a> CandidateScan<'a> {
    /// Creates a scan of `container` for an item with `raw_dims`, avoiding
    /// the already `placed` boxes.
    pub fn new(
        container: &Container,
        raw_dims: Vector3<f64>,
        placed: &'a [Aabb],
        resolution: f64,
    ) -> Self {
        let mut scan = Self {
            bounds: container.dimensions,
            raw_dims,
            placed,
            resolution,
            orientation_idx: 0,
            dims: raw_dims,
            cells: (0, 0, 0),
            cursor: None,
        };
        scan.enter_orientation();
        scan
    }

    /// Prepares cell bounds for the current orientation.
    fn enter_orientation(&mut self) {
        if self.orientation_idx >= Orientation::ALL.len() {
            self.cursor = None;
            return;
        }
        self.dims = Orientation::ALL[self.orientation_idx].apply(self.raw_dims);
        let count = |extent: f64| (extent / self.resolution).floor() as usize + 1;
        self.cells = (
            count(self.bounds.x),
            count(self.bounds.y),
            count(self.bounds.z),
        );
        self.cursor = Some((0, 0, 0));
    }

    fn advance_orientation(&mut self) {
        self.orientation_idx += 1;
        self.enter_orientation();
    }

    /// Steps the cell cursor in ascending (x, y, z) order; x varies
    /// slowest so nearer-the-left, nearer-the-face cells come first.
    fn step_cell(&mut self) {
        if let Some((ix, iy, iz)) = self.cursor {
            let (nx, ny, nz) = self.cells;
            let next = if iz + 1 < nz {
                Some((ix, iy, iz + 1))
            } else if iy + 1 < ny {
                Some((ix, iy + 1, 0))
            } else if ix + 1 < nx {
                Some((ix + 1, 0, 0))
            } else {
                None
            };
            self.cursor = next;
        }
    }
}

impl Iterator for CandidateScan<'_> {
    type Item = (Orientation, Vector3<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.orientation_idx >= Orientation::ALL.len() {
                return None;
            }
            let orientation = Orientation::ALL[self.orientation_idx];

            // Skip orientations that cannot fit the raw bounds at all.
            if !stowage_core::fits(self.bounds, self.dims) {
                self.advance_orientation();
                continue;
            }

            let Some((ix, iy, iz)) = self.cursor else {
                self.advance_orientation();
                continue;
            };
            let position = Vector3::new(
                ix as f64 * self.resolution,
                iy as f64 * self.resolution,
                iz as f64 * self.resolution,
            );
            self.step_cell();

            let aabb = Aabb::from_position(position, self.dims);
            if aabb.max_x > self.bounds.x + EPS
                || aabb.max_y > self.bounds.y + EPS
                || aabb.max_z > self.bounds.z + EPS
            {
                continue;
            }
            if self.placed.iter().any(|p| aabb.overlaps(p)) {
                continue;
            }
            return Some((orientation, position));
        }
    }
}

/// The spatial allocator.
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    config: AllocatorConfig,
}

impl Allocator {
    /// Creates an allocator with the given configuration.
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    /// Creates an allocator with default configuration.
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Searches every container in the snapshot and returns all feasible
    /// placements ranked by descending overall score. The returned list is
    /// empty when nothing fits anywhere; inputs are never mutated.
    pub fn allocate(&self, item: &Item, snapshot: &Snapshot) -> Result<Vec<PlacementOption>> {
        let candidates: Vec<&str> = snapshot.containers.keys().map(String::as_str).collect();
        self.allocate_among(item, snapshot, &candidates, false)
    }

    /// Searches one explicitly requested container. An item with no zone
    /// preference scores full zone preference here, because the caller
    /// asked for this container by name.
    pub fn allocate_in(
        &self,
        item: &Item,
        snapshot: &Snapshot,
        container_id: &str,
    ) -> Result<Vec<PlacementOption>> {
        snapshot.container(container_id)?;
        self.allocate_among(item, snapshot, &[container_id], true)
    }

    fn allocate_among(
        &self,
        item: &Item,
        snapshot: &Snapshot,
        candidates: &[&str],
        explicitly_requested: bool,
    ) -> Result<Vec<PlacementOption>> {
        item.validate()?;

        let mut options: Vec<PlacementOption> = candidates
            .par_iter()
            .map(|container_id| self.scan_container(item, snapshot, container_id, explicitly_requested))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        // Stable sort: ties keep container, orientation and cell scan order.
        options.sort_by(|a, b| {
            b.overall_score
                .partial_cmp(&a.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if options.is_empty() {
            log::debug!("no feasible placement for item '{}'", item.id);
        }
        Ok(options)
    }

    fn scan_container(
        &self,
        item: &Item,
        snapshot: &Snapshot,
        container_id: &str,
        explicitly_requested: bool,
    ) -> Result<Vec<PlacementOption>> {
        let container = snapshot.container(container_id)?;
        container.validate()?;

        let placed_items: Vec<&Item> = snapshot
            .items_in(container_id)?
            .into_iter()
            .filter(|other| other.id != item.id)
            .collect();
        let placed_aabbs: Vec<Aabb> = placed_items.iter().filter_map(|i| i.aabb()).collect();

        let scan = CandidateScan::new(
            container,
            item.dimensions,
            &placed_aabbs,
            self.config.grid_resolution,
        );

        Ok(scan
            .map(|(orientation, position)| {
                self.score(
                    item,
                    container,
                    &placed_aabbs,
                    position,
                    orientation,
                    explicitly_requested,
                )
            })
            .collect())
    }

    /// Scores one feasible candidate.
    pub(crate) fn score(
        &self,
        item: &Item,
        container: &Container,
        placed: &[Aabb],
        position: Vector3<f64>,
        orientation: Orientation,
        explicitly_requested: bool,
    ) -> PlacementOption {
        let dims = orientation.apply(item.dimensions);
        let aabb = Aabb::from_position(position, dims);

        // Closeness to the open face, discounted once per item that sits
        // nearer the face and shadows the candidate's x-z footprint.
        let mut accessibility = 1.0 - position.y / container.depth();
        for other in placed {
            if other.min_y < position.y && other.footprint_overlaps(&aabb) {
                accessibility *= self.config.blocking_penalty;
            }
        }

        // Each of the three axis-pairs where the box touches a wall
        // contributes a third.
        let flush = |lo: f64, hi: f64, extent: f64| {
            lo.abs() < EPS || (hi - extent).abs() < EPS
        };
        let mut flush_axes = 0u32;
        if flush(aabb.min_x, aabb.max_x, container.width()) {
            flush_axes += 1;
        }
        if flush(aabb.min_y, aabb.max_y, container.depth()) {
            flush_axes += 1;
        }
        if flush(aabb.min_z, aabb.max_z, container.height()) {
            flush_axes += 1;
        }
        let space_efficiency = f64::from(flush_axes) / 3.0;

        let priority = (f64::from(item.priority) / 10.0).clamp(0.1, 1.0);

        let zone = match &item.preferred_zone {
            Some(zone) if *zone == container.zone => 1.0,
            Some(_) => 0.5,
            None if explicitly_requested => 1.0,
            None => 0.5,
        };

        let overall = self.config.accessibility_weight * accessibility
            + self.config.efficiency_weight * space_efficiency
            + self.config.priority_weight * priority
            + self.config.zone_weight * zone;

        PlacementOption {
            container_id: container.id.clone(),
            position,
            orientation,
            accessibility_score: accessibility,
            space_efficiency_score: space_efficiency,
            priority_score: priority,
            zone_preference_score: zone,
            overall_score: overall,
        }
    }

    /// Feasibility-only search: the first candidate in scan order, if any.
    /// Used by the rearrangement planner, which does not need full scoring.
    pub fn first_fit(
        &self,
        item: &Item,
        container: &Container,
        placed: &[Aabb],
    ) -> Option<(Orientation, Vector3<f64>)> {
        CandidateScan::new(container, item.dimensions, placed, self.config.grid_resolution).next()
    }

    /// Validates an explicitly requested placement: the oriented box must
    /// lie within the container and overlap no stored item.
    pub fn validate_placement(
        &self,
        item: &Item,
        snapshot: &Snapshot,
        container_id: &str,
        position: Vector3<f64>,
        orientation: Orientation,
    ) -> Result<()> {
        let container = snapshot.container(container_id)?;
        let dims = orientation.apply(item.dimensions);
        let aabb = Aabb::from_position(position, dims);
        if !aabb.within_bounds(container.dimensions + Vector3::repeat(EPS))
            || position.x < 0.0
            || position.y < 0.0
            || position.z < 0.0
        {
            return Err(Error::NoFitAvailable(item.id.clone()));
        }
        for other in snapshot.items_in(container_id)? {
            if other.id == item.id {
                continue;
            }
            if let Some(other_aabb) = other.aabb() {
                if aabb.overlaps(&other_aabb) {
                    return Err(Error::PositionConflict(other.id.clone()));
                }
            }
        }
        Ok(())
    }
}
