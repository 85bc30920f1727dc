//! Stream catalog accessor

#[allow(clippy::module_inception)]
pub mod catalog;
pub mod label;

pub use catalog::{Stream, StreamCatalog, StreamKind};
pub use label::{bitrate_label, QualityArg, QualityLabel};
