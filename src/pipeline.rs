//! Composes the export and import stages into one run.
//!
//! Setup failures (unreadable config, missing archive directory, unreachable
//! runtime) abort the run; per-image failures inside a stage only show up in
//! the summaries. Skipping both stages is a no-op, not an error.

use crate::{config::ImageList, error::*, export, import, runtime::ContainerRuntime, StageSummary};
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone)]
pub struct RunOpts {
    /// JSON file listing the images to export.
    pub config: PathBuf,
    /// Directory archives are written to and read from.
    pub archive_dir: PathBuf,
    /// Target registry, URL or bare `host[:port]`.
    pub registry: String,
    pub skip_export: bool,
    pub skip_import: bool,
}

/// Stage summaries of a completed run; `None` for a skipped stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunReport {
    pub export: Option<StageSummary>,
    pub import: Option<StageSummary>,
}

pub fn run<R: ContainerRuntime>(runtime: &R, opts: &RunOpts) -> Result<RunReport> {
    let mut report = RunReport::default();
    if opts.skip_export && opts.skip_import {
        log::warn!("Both stages skipped, nothing to do");
        return Ok(report);
    }

    runtime.ping()?;

    if !opts.skip_export {
        let references = ImageList::from_path(&opts.config)?.image_names()?;
        report.export = Some(export(runtime, &references, &opts.archive_dir)?);
    }
    if !opts.skip_import {
        let host = registry_host(&opts.registry)?;
        report.import = Some(import(runtime, &opts.archive_dir, &host)?);
    }
    Ok(report)
}

/// `host[:port]` of the target registry, scheme stripped. Accepts bare
/// `host:port` strings as well as full URLs.
pub fn registry_host(registry: &str) -> Result<String> {
    let registry = registry.trim().trim_end_matches('/');
    if !registry.contains("://") {
        return Ok(registry.to_string());
    }
    let url = Url::parse(registry)?;
    let host = url
        .host_str()
        .ok_or(Error::InvalidUrl(url::ParseError::EmptyHost))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
