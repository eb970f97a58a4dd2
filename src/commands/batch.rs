//! Render a contiguous range of identifiers to files

use colored::*;
use eyre::{Context, Result, bail};
use log::{info, warn};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

use crate::config::Config;
use crate::engine::FrameEngine;
use crate::selector::Identifier;

pub struct BatchOptions {
    pub from: u64,
    pub to: u64,
    pub out_dir: PathBuf,
    pub png: bool,
    pub size: Option<u32>,
    pub jobs: Option<usize>,
}

pub fn run(opts: BatchOptions, config: &Config) -> Result<()> {
    if opts.from > opts.to {
        bail!("Invalid range: {} is greater than {}", opts.from, opts.to);
    }
    if opts.jobs == Some(0) {
        bail!("--jobs must be at least 1");
    }

    let engine = FrameEngine::from_config(config)?;
    fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("Failed to create {}", opts.out_dir.display()))?;

    let jobs = opts
        .jobs
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(jobs)
        .build()
        .context("Failed to create tokio runtime")?;

    info!("Batch rendering {}..={} with {} jobs", opts.from, opts.to, jobs);
    let out_dir = opts.out_dir.clone();
    let (png, size) = (opts.png, opts.size);
    let job = move |fid: u64| render_one(&engine, fid, &out_dir, png, size);

    let mut failures = rt.block_on(run_bounded(opts.from..=opts.to, jobs, job));
    failures.sort_by_key(|(fid, _)| *fid);

    let total = opts.to - opts.from + 1;
    for (fid, reason) in &failures {
        let fid = fid.map(|f| f.to_string()).unwrap_or_else(|| "?".to_string());
        warn!("Frame {} failed: {}", fid, reason);
        eprintln!("{} {}: {}", "✗".red(), fid, reason);
    }

    let written = total - failures.len() as u64;
    println!(
        "{} Rendered {}/{} frames into {}",
        if failures.is_empty() { "✓".green() } else { "⚠".yellow() },
        written,
        total,
        opts.out_dir.display()
    );

    if !failures.is_empty() {
        bail!("{} frame(s) failed", failures.len());
    }
    Ok(())
}

type Failure = (Option<u64>, String);

/// Run `job` on the blocking pool for every fid, keeping at most `jobs`
/// tasks in flight. A panicked task is reported without its fid.
async fn run_bounded<F>(fids: RangeInclusive<u64>, jobs: usize, job: F) -> Vec<Failure>
where
    F: Fn(u64) -> Result<()> + Send + Sync + 'static,
{
    let job = Arc::new(job);
    let mut tasks = JoinSet::new();
    let mut failures = Vec::new();

    for fid in fids {
        if tasks.len() >= jobs
            && let Some(joined) = tasks.join_next().await
        {
            record(joined, &mut failures);
        }
        let job = Arc::clone(&job);
        tasks.spawn_blocking(move || (fid, job(fid)));
    }

    while let Some(joined) = tasks.join_next().await {
        record(joined, &mut failures);
    }
    failures
}

fn record(joined: Result<(u64, Result<()>), JoinError>, failures: &mut Vec<Failure>) {
    match joined {
        Ok((_, Ok(()))) => {}
        Ok((fid, Err(e))) => failures.push((Some(fid), format!("{:#}", e))),
        Err(e) => failures.push((None, e.to_string())),
    }
}

fn render_one(engine: &FrameEngine, fid: u64, out_dir: &Path, png: bool, size: Option<u32>) -> Result<()> {
    let (_, document) = engine.compose(&Identifier::from(fid));

    let svg_path = out_dir.join(format!("{}.svg", fid));
    fs::write(&svg_path, document.as_str()).with_context(|| format!("Failed to write {}", svg_path.display()))?;

    if png {
        let bytes = engine
            .rasterize(&document, size)
            .with_context(|| format!("Failed to rasterize frame {}", fid))?;
        let png_path = out_dir.join(format!("{}.png", fid));
        fs::write(&png_path, bytes).with_context(|| format!("Failed to write {}", png_path.display()))?;
    }

    Ok(())
}
