//! Heap manager configuration.
//!
//! A [`MemConfig`] says which [`PictureFormat`] the manager allocates and how
//! much room to reserve around each picture. Margins are what make in-place
//! growth possible: a picture allocated with `hprepend: 16` can later be
//! extended up to 16 pixels to the left without a copy.
//!
//! # Example
//!
//! ```rust
//! use picbuf_mem::MemConfig;
//!
//! let yaml = r#"
//! format: yuv420p
//! hprepend: 16
//! happend: 16
//! vprepend: 2
//! vappend: 2
//! align: 32
//! "#;
//! let config = MemConfig::from_yaml_str(yaml).unwrap();
//! assert_eq!(config.format().unwrap().planes().len(), 3);
//! assert_eq!(config.hprepend, 16);
//! ```
//!
//! Custom formats list their planes:
//!
//! ```yaml
//! format:
//!   macropixel: 2
//!   planes:
//!     - { chroma: u8y8v8y8, hsub: 1, vsub: 1, macropixel_size: 4 }
//! ```

use std::path::{Path, PathBuf};

use picbuf_core::PictureFormat;
use serde::Deserialize;
use thiserror::Error;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading a [`MemConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config file not found.
    #[error("config file not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Format preset name not known.
    #[error("unknown format preset: {name}")]
    UnknownPreset {
        /// Name from the config.
        name: String,
    },

    /// Format or margins fail validation.
    #[error("invalid config: {0}")]
    Invalid(#[from] picbuf_core::Error),
}

/// Format entry of a config: a preset name or a full layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FormatSpec {
    /// Name accepted by [`PictureFormat::preset`].
    Preset(String),
    /// Explicit macropixel and planes.
    Custom(PictureFormat),
}

impl FormatSpec {
    /// Resolves to a validated [`PictureFormat`].
    pub fn resolve(&self) -> ConfigResult<PictureFormat> {
        let format = match self {
            Self::Preset(name) => {
                PictureFormat::preset(name).ok_or_else(|| ConfigError::UnknownPreset {
                    name: name.clone(),
                })?
            }
            Self::Custom(format) => format.clone(),
        };
        format.validate()?;
        Ok(format)
    }
}

impl From<PictureFormat> for FormatSpec {
    fn from(format: PictureFormat) -> Self {
        Self::Custom(format)
    }
}

/// Default line alignment in bytes.
pub const DEFAULT_ALIGN: usize = 16;

/// Configuration of a [`MemManager`](crate::MemManager).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemConfig {
    /// Picture format to allocate.
    pub format: FormatSpec,
    /// Extra pixels reserved left of each line.
    #[serde(default)]
    pub hprepend: usize,
    /// Extra pixels reserved right of each line.
    #[serde(default)]
    pub happend: usize,
    /// Extra lines reserved above the picture.
    #[serde(default)]
    pub vprepend: usize,
    /// Extra lines reserved below the picture.
    #[serde(default)]
    pub vappend: usize,
    /// Line stride alignment in bytes (0 or 1 for none).
    #[serde(default = "default_align")]
    pub align: usize,
}

fn default_align() -> usize {
    DEFAULT_ALIGN
}

impl MemConfig {
    /// Config without margins for `format`.
    pub fn new(format: impl Into<FormatSpec>) -> Self {
        Self {
            format: format.into(),
            hprepend: 0,
            happend: 0,
            vprepend: 0,
            vappend: 0,
            align: DEFAULT_ALIGN,
        }
    }

    /// Sets horizontal margins, in pixels.
    pub fn with_hmargins(mut self, prepend: usize, append: usize) -> Self {
        self.hprepend = prepend;
        self.happend = append;
        self
    }

    /// Sets vertical margins, in lines.
    pub fn with_vmargins(mut self, prepend: usize, append: usize) -> Self {
        self.vprepend = prepend;
        self.vappend = append;
        self
    }

    /// Sets the stride alignment.
    pub fn with_align(mut self, align: usize) -> Self {
        self.align = align;
        self
    }

    /// Resolved picture format.
    pub fn format(&self) -> ConfigResult<PictureFormat> {
        self.format.resolve()
    }

    /// Loads a config from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Loads a config from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: MemConfig = serde_yaml::from_str(yaml)?;
        config.format()?;
        Ok(config)
    }
}

impl From<PictureFormat> for MemConfig {
    fn from(format: PictureFormat) -> Self {
        Self::new(format)
    }
}
