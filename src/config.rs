//! JSON runtime configuration for the `pixel-mesh` binary.
//!
//! ```json
//! {
//!   "params": { "upsample_factor": 2, "palette": { "num_colors": 24 } },
//!   "output": { "intermediates_dir": "debug", "report_json": "report.json" }
//! }
//! ```
//! Every field is optional; omitted ones take their defaults.
use crate::error::{Error, Result};
use crate::params::PipelineParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write edge/line/mesh images per input under this directory.
    pub intermediates_dir: Option<PathBuf>,
    /// Write a JSON report (one entry per input) to this path.
    pub report_json: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub params: PipelineParams,
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}
