use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ratatui::prelude::Color;
use serde::Deserialize;
use tracing::{info, warn};

use super::history::DEFAULT_UNDO_LIMIT;
use super::print::DEFAULT_PRINT_COMMAND;
use super::storage::DEFAULT_SAFE_DIRS;
use super::theme::Theme;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub(crate) theme: String,
    pub(crate) undo_limit: usize,
    pub(crate) tab_width: usize,
    pub(crate) print_command: String,
    pub(crate) safe_dirs: Vec<String>,
    pub(crate) theme_overrides: Option<ThemeOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "nemo".to_string(),
            undo_limit: DEFAULT_UNDO_LIMIT,
            tab_width: 4,
            print_command: DEFAULT_PRINT_COMMAND.to_string(),
            safe_dirs: DEFAULT_SAFE_DIRS.iter().map(|d| d.to_string()).collect(),
            theme_overrides: None,
        }
    }
}

impl Config {
    pub(crate) fn resolve_theme(&self) -> Theme {
        let mut theme = Theme::from_name(&self.theme).unwrap_or_else(|| {
            warn!(target: "config", theme = %self.theme, "unknown_theme");
            Theme::default()
        });
        if let Some(overrides) = &self.theme_overrides {
            apply_theme_overrides(&mut theme, overrides);
        }
        theme
    }
}

pub fn load_config() -> Result<Config> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    candidates.push(PathBuf::from("nemo.toml"));
    candidates.push(PathBuf::from(".nemo.toml"));
    if let Ok(home) = std::env::var("HOME") {
        candidates.push(PathBuf::from(home).join(".config/nemo/config.toml"));
    }

    for path in candidates {
        if !path.exists() {
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg = parse_config(&content).with_context(|| format!("parsing {}", path.display()))?;
        info!(target: "config", path = %path.display(), "loaded");
        return Ok(cfg);
    }
    Ok(Config::default())
}

pub(crate) fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub(crate) struct ThemeOverride {
    pub(crate) text_fg: Option<String>,
    pub(crate) status_fg: Option<String>,
    pub(crate) status_bg: Option<String>,
    pub(crate) help_fg: Option<String>,
    pub(crate) selection_fg: Option<String>,
    pub(crate) selection_bg: Option<String>,
    pub(crate) indicator_fg: Option<String>,
}

pub(crate) fn apply_theme_overrides(theme: &mut Theme, overrides: &ThemeOverride) {
    let slots = [
        (&overrides.text_fg, &mut theme.text_fg),
        (&overrides.status_fg, &mut theme.status_fg),
        (&overrides.status_bg, &mut theme.status_bg),
        (&overrides.help_fg, &mut theme.help_fg),
        (&overrides.selection_fg, &mut theme.selection_fg),
        (&overrides.selection_bg, &mut theme.selection_bg),
        (&overrides.indicator_fg, &mut theme.indicator_fg),
    ];
    for (value, slot) in slots {
        if let Some(color) = value.as_deref().and_then(parse_color) {
            *slot = color;
        }
    }
}

fn parse_color(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
