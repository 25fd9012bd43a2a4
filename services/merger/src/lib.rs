//! GLORYS merge service.
//!
//! Reads the four daily source files named in a YAML run configuration, aligns
//! them onto the temperature grid for one hour and bounding box, and writes
//! the merged result.

pub mod config;
pub mod run;

pub use config::{load_merge_config, MergeConfig};
pub use run::run_merge;
