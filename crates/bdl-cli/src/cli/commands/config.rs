//! `bdl config` – show where the config lives and what is in effect.

use anyhow::Result;
use bdl_core::config::{self, BdlConfig};

pub fn show_config(cfg: &BdlConfig) -> Result<()> {
    println!("Config file: {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
