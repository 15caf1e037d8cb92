//! Static board data loading.

/// Data directory discovery and parsing of the board files.
pub mod loader;

pub use loader::{BoardData, DataSource, ResourceLoader};
