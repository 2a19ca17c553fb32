use crate::{archive_name, error::*, runtime::ContainerRuntime, ImageName, StageSummary};
use std::{fs, path::Path};

/// Pull every listed image and save it as a tar archive under `out_dir`.
///
/// Runs strictly in input order. A pull or save failure is logged and the
/// remaining references are still processed; only an unusable `out_dir` is
/// fatal. A partially pulled image is left in the runtime cache when its
/// save fails.
pub fn export<R: ContainerRuntime>(
    runtime: &R,
    references: &[ImageName],
    out_dir: &Path,
) -> Result<StageSummary> {
    fs::create_dir_all(out_dir)?;

    let mut summary = StageSummary::default();
    for name in references {
        summary.attempted += 1;
        let reference = name.to_string();

        log::info!("Pulling {}", reference);
        if let Err(e) = runtime.pull(&reference) {
            log::error!("Failed to pull {}: {}", reference, e);
            continue;
        }

        let output = out_dir.join(archive_name::encode(name));
        log::info!("Saving {} to {}", reference, output.display());
        if let Err(e) = runtime.save(&reference, &output) {
            log::error!("Failed to save {}: {}", reference, e);
            continue;
        }

        summary.succeeded += 1;
    }
    Ok(summary)
}
