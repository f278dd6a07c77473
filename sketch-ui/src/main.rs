use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use sketch_notebook::{load_config, ExportedPage, Sketchpad, SketchpadConfig};
use tracing::info;

mod input;
mod script;

use crate::script::{load_script, replay};

/// Replay a recorded sketchpad session and write its exports.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Session script (JSON) to replay.
    script: PathBuf,
    /// Sketchpad configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory exported pages are written to.
    #[arg(long, default_value = "exports")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchpad=info,sketch_notebook=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SketchpadConfig::default(),
    };
    let script = load_script(&args.script)?;
    info!(
        script = %args.script.display(),
        actions = script.actions.len(),
        "replaying session"
    );

    let mut pad = Sketchpad::new(&config).context("create sketchpad")?;
    let report = replay(&mut pad, &script);

    for page in &report.exports {
        write_export(&args.out, page)?;
    }

    info!(
        strokes = report.strokes,
        applied = report.applied,
        ignored = report.ignored,
        failed = report.failed,
        exports = report.exports.len(),
        page = %pad.page_indicator(),
        can_undo = pad.can_undo(),
        can_redo = pad.can_redo(),
        "session replayed"
    );
    Ok(())
}

fn write_export(out_dir: &Path, page: &ExportedPage) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create export dir: {}", out_dir.display()))?;
    let path = page.output_path(out_dir);
    fs::write(&path, &page.png).with_context(|| format!("write export: {}", path.display()))?;
    info!(path = %path.display(), page = page.page_number, "wrote export");
    Ok(())
}
