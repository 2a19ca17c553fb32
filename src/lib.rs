//! regmirror
//! =========
//!
//! Mirror container images into an offline registry in two batch stages:
//!
//! - export: pull each image listed in a JSON config and save it as a tar
//!   archive whose filename encodes the image reference.
//! - import: load each archive, retag it for the target registry, push it,
//!   and clean up the local image cache.
//!
//! All image operations are delegated to an external container runtime CLI
//! through the [runtime::ContainerRuntime] trait.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod runtime;

mod archive_name;
mod export;
mod image_name;
mod import;

pub use archive_name::{decode, encode, DecodedArchive};
pub use export::export;
pub use image_name::ImageName;
pub use import::import;

/// Per-stage outcome of a batch run.
///
/// `attempted - succeeded` items failed and were logged; per-item failures
/// never abort a stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

impl StageSummary {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}
