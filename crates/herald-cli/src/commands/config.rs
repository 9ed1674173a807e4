//! `herald config`: print the resolved configuration.

use anyhow::Result;
use colored::Colorize;
use herald_config::ResolvedConfig;

pub(crate) fn show_config(resolved: &ResolvedConfig) -> Result<()> {
    if resolved.loaded_files.is_empty() {
        println!("{}", "# using embedded defaults".dimmed());
    }
    for path in &resolved.loaded_files {
        println!("{} {path}", "# loaded".dimmed());
    }
    for var in &resolved.env_overrides {
        println!("{} {var}", "# env override".dimmed());
    }
    print!("{}", resolved.config.to_toml_string()?);
    Ok(())
}
