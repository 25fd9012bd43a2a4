//! Run configuration for glorys-merge.
//!
//! Loaded from a YAML file. Supports environment variable substitution using
//! ${VAR} and ${VAR:-default} syntax.

use anyhow::{Context, Result};
use grid_processor::AlignConfig;
use ocean_common::{names, GeoBoundingBox};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Merge Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Potential temperature source; defines the reference grid.
    pub thetao_fn: PathBuf,
    pub so_fn: PathBuf,
    /// Currents source holding both `uo` and `vo`.
    pub uovo_fn: PathBuf,
    /// Hourly sea-level source for the whole day.
    pub ssh_fn: PathBuf,
    pub merged_fn: PathBuf,

    /// Hour of day, written as `6` or `"06"`.
    #[serde(deserialize_with = "deserialize_hour")]
    pub ssh_time: u32,

    #[serde(default)]
    pub min_lon: Option<f64>,
    #[serde(default)]
    pub max_lon: Option<f64>,
    #[serde(default)]
    pub min_lat: Option<f64>,
    #[serde(default)]
    pub max_lat: Option<f64>,

    #[serde(default = "default_ssh_variable")]
    pub ssh_variable: String,

    /// Overrides `GLORYS_COORD_TOLERANCE` when set.
    #[serde(default)]
    pub coordinate_tolerance: Option<f64>,
}

fn default_ssh_variable() -> String {
    names::SEA_SURFACE_HEIGHT.to_string()
}

impl MergeConfig {
    /// The requested region, or `None` unless all four bounds are set.
    pub fn bbox(&self) -> Option<GeoBoundingBox> {
        GeoBoundingBox::from_parts(self.min_lon, self.max_lon, self.min_lat, self.max_lat)
    }

    /// True when some but not all bbox keys are given.
    pub fn has_partial_bbox(&self) -> bool {
        let given = [self.min_lon, self.max_lon, self.min_lat, self.max_lat]
            .iter()
            .filter(|b| b.is_some())
            .count();
        given > 0 && given < 4
    }

    /// Alignment settings: environment first, then this file's overrides.
    pub fn align_config(&self) -> Result<AlignConfig> {
        let mut config = AlignConfig::from_env();
        if let Some(tolerance) = self.coordinate_tolerance {
            config = config.with_tolerance(tolerance);
        }
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid alignment config: {}", e))?;
        Ok(config)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HourValue {
    Number(i64),
    Text(String),
}

fn deserialize_hour<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let hour = match HourValue::deserialize(deserializer)? {
        HourValue::Number(n) => n,
        HourValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("ssh_time '{}' is not an hour", s)))?,
    };
    u32::try_from(hour).map_err(|_| D::Error::custom(format!("ssh_time {} is negative", hour)))
}

// ============================================================================
// Loading Functions
// ============================================================================

/// Load and parse a run configuration with environment variable substitution
pub fn load_merge_config<P: AsRef<Path>>(path: P) -> Result<MergeConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read merge config from {:?}", path.as_ref()))?;

    parse_merge_config(&content)
        .with_context(|| format!("Invalid merge config {:?}", path.as_ref()))
}

/// Parse and validate a run configuration from YAML text.
pub fn parse_merge_config(content: &str) -> Result<MergeConfig> {
    let expanded = expand_env_vars(content)?;

    let config: MergeConfig =
        serde_yaml::from_str(&expanded).with_context(|| "Failed to parse merge config YAML")?;

    validate_merge_config(&config)?;

    Ok(config)
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in YAML content
/// Supports ${VAR} and ${VAR:-default} syntax. Comments are copied unchanged.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        let (body, comment) = line.split_at(comment_start(line).unwrap_or(line.len()));
        expand_line(body, &mut result)?;
        result.push_str(comment);
    }

    Ok(result)
}

/// Byte offset of a YAML comment: `#` at line start or after whitespace.
fn comment_start(line: &str) -> Option<usize> {
    let mut prev: Option<char> = None;
    for (i, ch) in line.char_indices() {
        if ch == '#' && prev.map_or(true, char::is_whitespace) {
            return Some(i);
        }
        prev = Some(ch);
    }
    None
}

fn expand_line(line: &str, result: &mut String) -> Result<()> {
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(())
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_merge_config(config: &MergeConfig) -> Result<()> {
    for (key, path) in [
        ("thetao_fn", &config.thetao_fn),
        ("so_fn", &config.so_fn),
        ("uovo_fn", &config.uovo_fn),
        ("ssh_fn", &config.ssh_fn),
        ("merged_fn", &config.merged_fn),
    ] {
        anyhow::ensure!(!path.as_os_str().is_empty(), "{} cannot be empty", key);
    }

    anyhow::ensure!(
        config.ssh_time < grid_processor::HOURS_PER_DAY as u32,
        "ssh_time must be between 0 and 23, got {}",
        config.ssh_time
    );

    anyhow::ensure!(!config.ssh_variable.is_empty(), "ssh_variable cannot be empty");

    for (key, value) in [
        ("min_lon", config.min_lon),
        ("max_lon", config.max_lon),
        ("min_lat", config.min_lat),
        ("max_lat", config.max_lat),
    ] {
        if let Some(v) = value {
            anyhow::ensure!(v.is_finite(), "{} must be a finite number, got {}", key, v);
        }
    }

    Ok(())
}
