//! Effective-configuration display.

use anyhow::{Context, Result};
use auditboard::config::AppConfig;
use console::style;

pub fn cmd_config(config: &AppConfig) -> Result<()> {
    println!();
    println!("{}", style("Effective configuration").bold());
    println!();
    let rendered =
        toml::to_string_pretty(config).context("Failed to render configuration as TOML")?;
    println!("{}", rendered);
    Ok(())
}
