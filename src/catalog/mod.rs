#[allow(clippy::module_inception)]
mod catalog;
mod track;

pub use catalog::{InMemoryCatalog, TrackCatalog};
pub use track::{Track, TrackStatus};
