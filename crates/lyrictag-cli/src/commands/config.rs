use anyhow::Result;
use std::path::Path;
use lyrictag_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("lyrictag configuration\n");

    if config.paths.ffmpeg.is_none() {
        println!("# paths.ffmpeg not set, auto-detected from PATH");
    }
    println!("{}", toml::to_string_pretty(&config)?);

    // Show config file locations
    println!("Config file locations (in priority order):");
    println!("  1. Environment variables (LYRICTAG_*, sections split by __)");
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    if let Some(path) = Config::default_path() {
        println!("  3. {}", path.display());
    }

    Ok(())
}
