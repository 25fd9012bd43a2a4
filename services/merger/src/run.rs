//! Read, merge and write for one run configuration.

use anyhow::{Context, Result};
use grid_processor::{merge_sources, AlignConfig, MergeInputs, MergeRequest, MergedSummary};
use netcdf_parser::{read_grid, write_merged};
use ocean_common::{names, Grid};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::MergeConfig;

/// Run the full merge described by `config` and return a summary of what was
/// written.
pub fn run_merge(config: &MergeConfig, align: &AlignConfig) -> Result<MergedSummary> {
    let start = Instant::now();

    if config.has_partial_bbox() {
        warn!("Incomplete bounding box in config; using full native extent");
    }

    let inputs = MergeInputs {
        temperature: read_source(&config.thetao_fn, &[names::THETAO])?,
        salinity: read_source(&config.so_fn, &[names::SO])?,
        currents: read_source(&config.uovo_fn, &[names::UO, names::VO])?,
        sea_level: read_source(&config.ssh_fn, &[config.ssh_variable.as_str()])?,
    };
    let read_ms = start.elapsed().as_millis();

    let request = MergeRequest::new(config.ssh_time as usize, config.bbox())
        .with_sea_level_variable(&config.ssh_variable);
    let merged = merge_sources(inputs, &request, align).context("Failed to merge sources")?;

    write_merged(&config.merged_fn, &merged)
        .with_context(|| format!("Failed to write merged grid to {:?}", config.merged_fn))?;

    let summary = merged.summary();
    info!(
        output = %config.merged_fn.display(),
        hour = config.ssh_time,
        summary = %serde_json::to_string(&summary).unwrap_or_default(),
        read_ms = read_ms,
        total_ms = start.elapsed().as_millis(),
        "Merge complete"
    );

    Ok(summary)
}

fn read_source(path: &Path, variables: &[&str]) -> Result<Grid> {
    let grid = read_grid(path, variables)
        .with_context(|| format!("Failed to read {:?} from {:?}", variables, path))?;
    info!(
        path = %path.display(),
        variables = ?variables,
        time_steps = grid.time.len(),
        latitudes = grid.latitude.len(),
        longitudes = grid.longitude.len(),
        "Loaded source"
    );
    Ok(grid)
}
