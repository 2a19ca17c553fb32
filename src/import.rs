use crate::{archive_name, error::*, runtime::ContainerRuntime, StageSummary};
use std::path::{Path, PathBuf};

/// Load every archive in `archive_dir`, retag it as
/// `<registry_host>/<name>:<tag>` and push it, then clean up the local
/// image cache.
///
/// Archives are processed in filename order so runs are deterministic. A
/// failure to load, tag or push one archive is logged and the rest are
/// still processed; only a missing `archive_dir` is fatal. An empty
/// directory is a warning, not an error.
pub fn import<R: ContainerRuntime>(
    runtime: &R,
    archive_dir: &Path,
    registry_host: &str,
) -> Result<StageSummary> {
    if !archive_dir.is_dir() {
        return Err(Error::NotADirectory(archive_dir.to_path_buf()));
    }
    let archives = list_archives(archive_dir)?;
    if archives.is_empty() {
        log::warn!("No archives found in {}", archive_dir.display());
        return Ok(StageSummary::default());
    }

    let mut summary = StageSummary::default();
    for archive in &archives {
        summary.attempted += 1;
        if let Err(e) = import_one(runtime, archive, registry_host) {
            log::error!("Failed to import {}: {}", archive.display(), e);
            continue;
        }
        summary.succeeded += 1;
    }
    Ok(summary)
}

fn import_one<R: ContainerRuntime>(
    runtime: &R,
    archive: &Path,
    registry_host: &str,
) -> Result<()> {
    let file_name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidArchiveName(archive.display().to_string()))?;
    let decoded = archive_name::decode(file_name)?;
    let target = format!("{}/{}:{}", registry_host, decoded.image_name, decoded.tag);

    log::info!("Loading {}", archive.display());
    runtime.load(archive)?;

    log::info!("Tagging {} as {}", decoded.source_image, target);
    runtime.tag(&decoded.source_image, &target)?;

    log::info!("Pushing {}", target);
    runtime.push(&target)?;

    // Pushed: the item succeeded, the rest is best-effort cleanup.
    if let Err(e) = runtime.remove_image(&target) {
        log::warn!("Could not remove {}: {}", target, e);
    }
    match runtime.containers_from(&decoded.source_image) {
        Ok(containers) if containers.is_empty() => {
            if let Err(e) = runtime.remove_image(&decoded.source_image) {
                log::warn!("Could not remove {}: {}", decoded.source_image, e);
            }
        }
        Ok(containers) => {
            log::warn!(
                "Keeping {}: used by {} container(s)",
                decoded.source_image,
                containers.len()
            );
        }
        Err(e) => {
            log::warn!(
                "Could not check containers of {}: {}",
                decoded.source_image,
                e
            );
        }
    }
    Ok(())
}

fn list_archives(archive_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for entry in archive_dir.read_dir()? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "tar") {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}
