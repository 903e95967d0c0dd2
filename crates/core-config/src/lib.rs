//! Configuration loading and parsing.
//!
//! Parses `alignvis.toml` (or an override path provided by the binary):
//! the initial view extent under `[view]`, ranges to hide on startup under
//! `[hidden]`, and display toggles under `[markers]`. Every key is optional.
//! Unknown fields are ignored so older binaries accept newer files.
//!
//! Configured ranges are raw user input. `Config::apply_width` /
//! `Config::apply_height` clamp them against the actual extent of the loaded
//! view and keep the raw values so a later resize can re-clamp.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, io, path::Path, path::PathBuf};
use tracing::{debug, info, warn};

/// An inclusive `[start, end]` pair as written in TOML.
pub type RangePair = [i64; 2];

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Absolute column count; 0 leaves columns unbounded.
    #[serde(default)]
    pub width: i64,
    /// Absolute row count; 0 leaves rows unbounded.
    #[serde(default)]
    pub height: i64,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct HiddenConfig {
    #[serde(default)]
    pub columns: Vec<RangePair>,
    #[serde(default)]
    pub rows: Vec<RangePair>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MarkersConfig {
    #[serde(default = "MarkersConfig::default_show_hidden")]
    pub show_hidden: bool,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            show_hidden: Self::default_show_hidden(),
        }
    }
}

impl MarkersConfig {
    const fn default_show_hidden() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub hidden: HiddenConfig,
    #[serde(default)]
    pub markers: MarkersConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
    pub source: Option<PathBuf>,
    /// Column ranges after the last `apply_width`.
    pub effective_columns: Vec<(i64, i64)>,
    /// Row ranges after the last `apply_height`.
    pub effective_rows: Vec<(i64, i64)>,
}

/// Config path following platform conventions (XDG / AppData Roaming), with a
/// file in the working directory taking precedence.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("alignvis.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("alignvis").join("alignvis.toml");
    }
    PathBuf::from("alignvis.toml")
}

/// Load from `path`, or the discovered location. A missing or malformed file
/// yields defaults; only the reason is logged.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(target: "config", path = %path.display(), "config_missing_using_defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_unreadable_using_defaults"
            );
            return Ok(Config::default());
        }
    };
    match parse(&content, &path) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                hidden_columns = file.hidden.columns.len(),
                hidden_rows = file.hidden.rows.len(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
                ..Config::default()
            })
        }
        Err(e) => {
            warn!(
                target: "config",
                error = %format!("{e:#}"),
                "config_parse_failed_using_defaults"
            );
            Ok(Config::default())
        }
    }
}

fn parse(content: &str, path: &Path) -> Result<ConfigFile> {
    toml::from_str::<ConfigFile>(content).with_context(|| format!("parsing {}", path.display()))
}

impl Config {
    /// Clamp configured column ranges to `[0, width)` (unbounded when `width`
    /// is 0). Returns the effective ranges.
    pub fn apply_width(&mut self, width: i64) -> &[(i64, i64)] {
        self.effective_columns = clamp_ranges("columns", &self.file.hidden.columns, width);
        &self.effective_columns
    }

    /// Row counterpart of [`Config::apply_width`].
    pub fn apply_height(&mut self, height: i64) -> &[(i64, i64)] {
        self.effective_rows = clamp_ranges("rows", &self.file.hidden.rows, height);
        &self.effective_rows
    }

    /// Re-clamp columns after the view width changes. Returns the new ranges
    /// when they differ from the previous ones.
    pub fn recompute_after_resize(&mut self, width: i64) -> Option<Vec<(i64, i64)>> {
        let prev = self.effective_columns.clone();
        let current = self.apply_width(width);
        if current != prev.as_slice() {
            Some(current.to_vec())
        } else {
            None
        }
    }
}

fn clamp_ranges(axis: &'static str, ranges: &[RangePair], limit: i64) -> Vec<(i64, i64)> {
    let upper = if limit > 0 { limit - 1 } else { i64::MAX };
    let mut out = Vec::with_capacity(ranges.len());
    for &[start, end] in ranges {
        if start > end {
            info!(target: "config", axis, start, end, "hidden_range_inverted_dropped");
            continue;
        }
        if end < 0 || start > upper {
            info!(target: "config", axis, start, end, limit, "hidden_range_outside_dropped");
            continue;
        }
        let clamped = (start.max(0), end.min(upper));
        if clamped != (start, end) {
            info!(
                target: "config",
                axis,
                start,
                end,
                clamped_start = clamped.0,
                clamped_end = clamped.1,
                limit,
                "hidden_range_clamped"
            );
        }
        out.push(clamped);
    }
    out
}
