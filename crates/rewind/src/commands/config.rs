use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{Config, KEYS};

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("  {}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    for (key, value) in effective_values(&config) {
        println!("  {:<22} {}", key.cyan(), value);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!("{} {key} = {value}", "Saved".green().bold());
    tracing::debug!(path = %path.display(), "config written");
    Ok(())
}

fn switch(on: bool) -> String {
    let value = if on { "on" } else { "off" };
    value.to_string()
}

/// Every key with the value the player will actually use.
fn effective_values(config: &Config) -> Vec<(&'static str, String)> {
    KEYS.iter()
        .map(|&key| {
            let value = match key {
                "defaults.theme" => config.theme().to_string(),
                "defaults.sound" => switch(config.sound_on()),
                "defaults.haptics" => switch(config.haptics_on()),
                "defaults.quiz_timer" => switch(config.quiz_timer_on()),
                _ => config.telemetry_enabled().to_string(),
            };
            (key, value)
        })
        .collect()
}
