//! Error types for stowage planning.

use thiserror::Error;

/// Result type alias for stowage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during planning operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No item with the given id exists in the snapshot.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// No container with the given id exists in the snapshot.
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// The operation requires a placed item but the item is loose.
    #[error("Item '{0}' is not placed in any container")]
    ItemNotPlaced(String),

    /// The allocator exhausted every candidate container without a fit.
    #[error("No feasible placement found for item '{0}'")]
    NoFitAvailable(String),

    /// An explicitly requested position overlaps an already placed item.
    #[error("Position conflicts with item '{0}'")]
    PositionConflict(String),

    /// Unrecognised orientation code.
    #[error("Invalid orientation code: {0}")]
    InvalidOrientation(String),

    /// The waste-return mass budget must be strictly positive.
    #[error("Invalid weight limit: {0} (must be > 0)")]
    InvalidWeightLimit(f64),

    /// The simulation target date does not lie after the current date.
    #[error("Invalid simulation target: {target} is not after {current}")]
    InvalidSimulationTarget {
        /// Date the simulation currently stands at.
        current: chrono::NaiveDate,
        /// Requested target date.
        target: chrono::NaiveDate,
    },

    /// Item failed validation.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Container failed validation.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),
}
