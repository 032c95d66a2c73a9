use anyhow::Result;
use std::path::Path;
use std::process::Command;

use lyrictag_core::config::Config;
use lyrictag_tagger::TagCapability;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    println!("lyrictag dependency check\n");

    let config = Config::load(config_path)?;
    let mut all_ok = true;

    // Check FFmpeg
    print!("ffmpeg:        ");
    match config.tag_capability() {
        TagCapability::Available { ffmpeg } => {
            let version = Command::new(&ffmpeg).args(["-version"]).output();
            match version {
                Ok(out) => {
                    let first_line = String::from_utf8_lossy(&out.stdout)
                        .lines()
                        .next()
                        .unwrap_or("")
                        .to_string();
                    // Extract just version number
                    let version_part = first_line
                        .split_whitespace()
                        .nth(2)
                        .unwrap_or("unknown");
                    println!("OK ({}, {})", version_part, ffmpeg.display());
                }
                Err(_) => {
                    println!("FOUND but failed to get version");
                    all_ok = false;
                }
            }
        }
        TagCapability::Unavailable { reason } => {
            println!("NOT FOUND ({})", reason);
            println!("           Install with: brew install ffmpeg");
            println!("           Lyrics conversion still works, tagging is skipped");
            all_ok = false;
        }
    }

    // Check config file
    print!("config:        ");
    match Config::default_path() {
        Some(path) if path.exists() => println!("OK ({})", path.display()),
        Some(path) => println!("defaults ({} not present)", path.display()),
        None => println!("defaults (no config directory)"),
    }

    println!();
    if all_ok {
        println!("All dependencies found.");
    } else {
        println!("Some dependencies are missing.");
    }

    Ok(())
}
