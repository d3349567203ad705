//! On-disk outputs of a scan.

pub mod artifacts;

pub use artifacts::ArtifactWriter;
