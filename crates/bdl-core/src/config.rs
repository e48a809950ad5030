use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Per-transfer curl limits (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Seconds allowed for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for one whole transfer.
    pub timeout_secs: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 300,
        }
    }
}

impl TransferConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/bdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BdlConfig {
    /// Resource URL; `{width}`, `{height}` and `{index}` are substituted per transfer.
    pub url_template: String,
    /// Requested image width in pixels.
    pub width: u32,
    /// Requested image height in pixels.
    pub height: u32,
    /// Extension of saved files, without the dot.
    pub file_extension: String,
    /// Destination used when the job input leaves the save path empty.
    pub default_save_path: String,
    /// Job input file checked before prompting.
    pub input_file: String,
    #[serde(default)]
    pub transfer: TransferConfig,
}

impl Default for BdlConfig {
    fn default() -> Self {
        Self {
            url_template: "https://picsum.photos/{width}/{height}".to_string(),
            width: 200,
            height: 300,
            file_extension: "png".to_string(),
            default_save_path: "./outputs".to_string(),
            input_file: "Input.json".to_string(),
            transfer: TransferConfig::default(),
        }
    }
}

impl BdlConfig {
    /// Reject settings that would make every transfer fail.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("width and height must be positive ({}x{})", self.width, self.height);
        }
        let ext = self.file_extension.trim();
        if ext.is_empty() || ext.contains('.') || ext.contains('/') {
            anyhow::bail!("invalid file_extension {:?}", self.file_extension);
        }
        let sample = self
            .url_template
            .replace("{width}", &self.width.to_string())
            .replace("{height}", &self.height.to_string())
            .replace("{index}", "0");
        url::Url::parse(&sample)
            .with_context(|| format!("invalid url_template {:?}", self.url_template))?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BdlConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<BdlConfig> {
    if !path.exists() {
        let default_cfg = BdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: BdlConfig =
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
