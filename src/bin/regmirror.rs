use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use regmirror::{
    pipeline::{self, RunOpts},
    runtime::DockerCli,
    StageSummary,
};
use std::path::PathBuf;

/// Mirror container images into an offline registry through tar archives.
#[derive(Debug, Parser)]
#[clap(version)]
struct Opt {
    /// JSON file listing image references to export
    #[clap(short = 'c', long = "config", default_value = "images.json")]
    config: PathBuf,

    /// Directory where image archives are written and read
    #[clap(short = 'd', long = "archive-dir", default_value = "archives")]
    archive_dir: PathBuf,

    /// Target registry, URL or `host[:port]`
    #[clap(short = 'r', long = "registry", default_value = "http://localhost:5000")]
    registry: String,

    /// Do not pull and save images
    #[clap(long)]
    skip_export: bool,

    /// Do not load, retag and push archives
    #[clap(long)]
    skip_import: bool,

    /// Container runtime CLI to drive
    #[clap(long, default_value = "docker")]
    runtime: String,
}

fn print_summary(stage: &str, summary: StageSummary) {
    let status = format!("{}/{} images", summary.succeeded, summary.attempted);
    if summary.failed() == 0 {
        println!("{:>12} {}", stage.green().bold(), status);
    } else {
        println!(
            "{:>12} {} ({} failed)",
            stage.yellow().bold(),
            status,
            summary.failed()
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();
    let runtime = DockerCli::new(&opt.runtime);
    let report = pipeline::run(
        &runtime,
        &RunOpts {
            config: opt.config,
            archive_dir: opt.archive_dir,
            registry: opt.registry,
            skip_export: opt.skip_export,
            skip_import: opt.skip_import,
        },
    )
    .context("Mirroring aborted")?;

    if let Some(summary) = report.export {
        print_summary("Exported", summary);
    }
    if let Some(summary) = report.import {
        print_summary("Imported", summary);
    }
    Ok(())
}
