//! Project configuration module.
//!
//! Handles loading, validating, and merging `docimg.toml`. Stock defaults are
//! overridden by an optional `docimg.toml` in the project root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! docs_dir = "docs"            # Authored documents (encoding root)
//! public_dir = "public"        # Served static root
//! site_dir = "dist"            # Generated HTML pages
//! asset_prefix = "/mdx-images" # URL prefix of the flat image directory
//!
//! [collect]
//! image_dir_name = "img"       # Directories bulk-copied as image folders
//! bulk_prefix = "img-"         # File name prefix for bulk-copied images
//! extensions = ["png", "jpg", "jpeg", "gif"]
//!
//! [documents]
//! extensions = ["mdx", "md"]
//!
//! [processing]
//! max_processes = 4            # Parallel page workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::encoding::normalize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "docimg.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to serialize defaults: {0}")]
    Defaults(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `docimg.toml`.
///
/// All fields have defaults matching the conventional `docs/` and
/// `public/mdx-images/` layout. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Root of the authored documents; encoded names are relative to it.
    pub docs_dir: String,
    /// Served static root; public-rooted references resolve against it.
    pub public_dir: String,
    /// Output directory for generated HTML pages.
    pub site_dir: String,
    /// URL prefix for collected images, also their directory under `public_dir`.
    pub asset_prefix: String,
    pub collect: CollectConfig,
    pub documents: DocumentsConfig,
    pub processing: ProcessingConfig,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            docs_dir: "docs".to_string(),
            public_dir: "public".to_string(),
            site_dir: "dist".to_string(),
            asset_prefix: "/mdx-images".to_string(),
            collect: CollectConfig::default(),
            documents: DocumentsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl DocsConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.asset_prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "asset_prefix must start with '/'".into(),
            ));
        }
        if self.asset_prefix.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "asset_prefix must name a directory".into(),
            ));
        }
        if self.collect.image_dir_name.is_empty() {
            return Err(ConfigError::Validation(
                "collect.image_dir_name must not be empty".into(),
            ));
        }
        if self.collect.bulk_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "collect.bulk_prefix must not be empty".into(),
            ));
        }
        if self.collect.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "collect.extensions must not be empty".into(),
            ));
        }
        if self.documents.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "documents.extensions must not be empty".into(),
            ));
        }
        if site_inside_public(Path::new(&self.public_dir), Path::new(&self.site_dir)) {
            return Err(ConfigError::Validation(format!(
                "site_dir \"{}\" must not be public_dir \"{}\" or inside it",
                self.site_dir, self.public_dir
            )));
        }
        Ok(())
    }

    /// Resolve all directories against the project root.
    pub fn paths(&self, root: &Path) -> ProjectPaths {
        let public_dir = root.join(&self.public_dir);
        ProjectPaths {
            docs_dir: root.join(&self.docs_dir),
            assets_dir: public_dir.join(self.asset_prefix.trim_matches('/')),
            public_dir,
            site_dir: root.join(&self.site_dir),
        }
    }
}

/// True when `site` is `public` or nested under it, compared lexically.
///
/// `public_dir` is copied into `site_dir` after pages are generated, so an
/// overlap would copy files onto themselves or into the copy's own output.
pub fn site_inside_public(public: &Path, site: &Path) -> bool {
    normalize(site).starts_with(normalize(public))
}

/// Concrete directories for one project, resolved from [`DocsConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub docs_dir: PathBuf,
    pub public_dir: PathBuf,
    /// `public_dir` + `asset_prefix`: where collected images land.
    pub assets_dir: PathBuf,
    pub site_dir: PathBuf,
}

/// Asset collector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectConfig {
    /// Directories with exactly this name are bulk-copied.
    pub image_dir_name: String,
    /// Prefix for bulk-copied file names (`img-` + `diagram.png`).
    pub bulk_prefix: String,
    /// Raster extensions picked up from image directories, case-insensitive.
    pub extensions: Vec<String>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            image_dir_name: "img".to_string(),
            bulk_prefix: "img-".to_string(),
            extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "gif".to_string(),
            ],
        }
    }
}

impl CollectConfig {
    pub fn is_image_file(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }
}

/// Which files count as documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentsConfig {
    pub extensions: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["mdx".to_string(), "md".to_string()],
        }
    }
}

impl DocumentsConfig {
    pub fn is_document(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading
// =============================================================================

/// Stock defaults as a TOML table: the base layer `docimg.toml` lands on.
pub fn stock_defaults() -> Result<toml::Table, ConfigError> {
    match toml::Value::try_from(DocsConfig::default())? {
        toml::Value::Table(table) => Ok(table),
        other => Err(ConfigError::Validation(format!(
            "stock defaults serialized to a {}, not a table",
            other.type_str()
        ))),
    }
}

/// Layer `overlay` onto `base` in place.
///
/// Sections such as `[collect]` merge key by key, so a file that sets only
/// `collect.bulk_prefix` keeps the default `image_dir_name`. Any other value
/// replaces what `base` held.
pub fn overlay_table(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(section) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => overlay_table(existing, section),
                _ => {
                    base.insert(key, toml::Value::Table(section));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Read `docimg.toml` from the project root. A missing file is not an error.
pub fn read_overlay(root: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let path = root.join(CONFIG_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::Read(path, e)),
    };
    Ok(Some(content.parse::<toml::Table>()?))
}

/// Apply an optional overlay to the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Table>) -> Result<DocsConfig, ConfigError> {
    let mut table = stock_defaults()?;
    if let Some(overlay) = overlay {
        overlay_table(&mut table, overlay);
    }
    let config: DocsConfig = toml::Value::Table(table).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `docimg.toml` in the project root.
pub fn load_config(root: &Path) -> Result<DocsConfig, ConfigError> {
    resolve_config(read_overlay(root)?)
}

/// Returns a fully-commented stock `docimg.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docimg configuration
# ====================
# All settings are optional. Values shown below are the defaults.
# Paths are relative to the directory holding this file.
# Unknown keys will cause an error.

# Authored documents. Encoded image names are relative to this directory.
docs_dir = "docs"

# Served static root. References starting with "/" resolve against it.
public_dir = "public"

# Generated HTML pages.
site_dir = "dist"

# URL prefix of the flat image directory. Images are collected into
# <public_dir><asset_prefix>/ and local references are rewritten to it.
asset_prefix = "/mdx-images"

# ---------------------------------------------------------------------------
# Asset collection
# ---------------------------------------------------------------------------
[collect]
# Every directory with this exact name is copied wholesale.
image_dir_name = "img"

# Bulk-copied files are named <bulk_prefix><file name>.
bulk_prefix = "img-"

# Raster extensions picked up from image directories (case-insensitive).
extensions = ["png", "jpg", "jpeg", "gif"]

# ---------------------------------------------------------------------------
# Documents
# ---------------------------------------------------------------------------
[documents]
extensions = ["mdx", "md"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
