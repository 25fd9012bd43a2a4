//! End-to-end runs of the merge service on synthetic NetCDF sources.

use std::path::Path;

use grid_processor::{AlignConfig, MergedGrid};
use merger::config::parse_merge_config;
use merger::{load_merge_config, run_merge};
use netcdf_parser::{read_grid, write_merged};
use ocean_common::{names, Grid};
use test_utils::{temp_test_dir_with_prefix, SourceGridBuilder};

/// Writes a source grid with the merged-grid writer; same layout as a download.
fn write_source(path: &Path, grid: Grid) {
    let merged = MergedGrid {
        time: grid.time,
        depth: grid.depth,
        latitude: grid.latitude,
        longitude: grid.longitude,
        variables: grid.variables,
    };
    write_merged(path, &merged).unwrap();
}

fn write_sources(dir: &Path) {
    let builder = SourceGridBuilder::default();
    write_source(&dir.join("thetao.nc"), builder.temperature());
    write_source(&dir.join("so.nc"), builder.salinity());
    write_source(&dir.join("uovo.nc"), builder.currents());
    write_source(&dir.join("ssh.nc"), builder.sea_level());
}

fn config_yaml(dir: &Path, extra: &str) -> String {
    format!(
        "thetao_fn: {d}/thetao.nc\nso_fn: {d}/so.nc\nuovo_fn: {d}/uovo.nc\nssh_fn: {d}/ssh.nc\nmerged_fn: {d}/out/merged.nc\n{extra}",
        d = dir.display()
    )
}

#[test]
fn test_run_merge_writes_output() {
    let dir = temp_test_dir_with_prefix("run_merge");
    write_sources(dir.path());

    let yaml = config_yaml(
        dir.path(),
        "ssh_time: \"06\"\nmin_lon: -69.8\nmax_lon: -68.4\nmin_lat: 10.3\nmax_lat: 11.6\n",
    );
    let config = parse_merge_config(&yaml).unwrap();
    let summary = run_merge(&config, &AlignConfig::default()).unwrap();

    assert_eq!(summary.latitudes, 3);
    assert_eq!(summary.longitudes, 3);
    assert_eq!(summary.depth_levels, 3);
    assert_eq!(
        summary.variables.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["so", "thetao", "uo", "vo", "zos"]
    );

    let merged = read_grid(dir.path().join("out/merged.nc"), &names::MERGED_ORDER).unwrap();
    assert_eq!(merged.latitude.values(), &[10.5, 11.0, 11.5]);
    assert_eq!(merged.variable(names::ZOS).unwrap().data[0], 46_011.0);
}

#[test]
fn test_run_merge_missing_source_file() {
    let dir = temp_test_dir_with_prefix("run_missing");
    let config = parse_merge_config(&config_yaml(dir.path(), "ssh_time: 0\n")).unwrap();

    let err = run_merge(&config, &AlignConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("thetao.nc"));
    assert!(!dir.path().join("out/merged.nc").exists());
}

#[test]
fn test_run_merge_empty_bbox_fails_without_output() {
    let dir = temp_test_dir_with_prefix("run_empty");
    write_sources(dir.path());

    let yaml = config_yaml(
        dir.path(),
        "ssh_time: 0\nmin_lon: 100\nmax_lon: 110\nmin_lat: 10\nmax_lat: 12\n",
    );
    let config = parse_merge_config(&yaml).unwrap();

    let err = run_merge(&config, &AlignConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("selects no points along longitude"));
    assert!(!dir.path().join("out/merged.nc").exists());
}

#[test]
fn test_load_config_from_file() {
    let dir = temp_test_dir_with_prefix("load_config");
    let path = dir.path().join("merge.yaml");
    std::fs::write(&path, config_yaml(dir.path(), "ssh_time: 23\n")).unwrap();

    let config = load_merge_config(&path).unwrap();
    assert_eq!(config.ssh_time, 23);
    assert!(config.bbox().is_none());
}

#[test]
fn test_example_config_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("merge.example.yaml");
    let config = load_merge_config(path).unwrap();
    assert_eq!(config.ssh_time, 6);
    assert!(config.bbox().is_some());
}
