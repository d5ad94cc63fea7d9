use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::{Path, PathBuf}, str::FromStr};
use thiserror::Error;

use crate::display::protocol::Half;
use crate::display::raster::Circle;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Where the bus traffic goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Software panel, no hardware needed
    #[default]
    Emulator,
    /// Panel wired to Linux GPIO lines
    Gpio,
}

/// Top-level app configuration. Every field is optional so files and CLI layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub backend: Option<Backend>,
    pub frames: Option<u64>,           // absent = run forever
    pub screen: Option<Half>,
    pub circle: Option<CircleConfig>,
    pub dump_pbm: Option<PathBuf>,     // emulator only
    pub gpio: Option<GpioConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CircleConfig {
    pub x: Option<u8>,
    pub y: Option<u8>,
    pub radius: Option<u8>,
}

/// GPIO line offsets on one chip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpioConfig {
    #[serde(default = "default_chip")]
    pub chip: String,   // e.g. "/dev/gpiochip0"
    pub data: [u32; 8], // D0..D7
    pub rs: u32,
    pub rw: u32,
    pub en: u32,
    pub rst: u32,
    pub cs1: u32,
    pub cs2: u32,
}

fn default_chip() -> String {
    "/dev/gpiochip0".to_string()
}

impl GpioConfig {
    fn lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.data
            .iter()
            .copied()
            .chain([self.rs, self.rw, self.en, self.rst, self.cs1, self.cs2])
    }
}

impl Config {
    pub fn backend(&self) -> Backend {
        self.backend.unwrap_or_default()
    }

    pub fn half(&self) -> Half {
        self.screen.unwrap_or_default()
    }

    /// Circle with defaults filled in
    pub fn circle(&self) -> Circle {
        let d = Circle::default();
        match self.circle.as_ref() {
            Some(c) => Circle {
                x: c.x.unwrap_or(d.x),
                y: c.y.unwrap_or(d.y),
                radius: c.radius.unwrap_or(d.radius),
            },
            None => d,
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "glcd64", about = "KS0108 64x64 GLCD demo", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,
    /// stop after this many frames (default: run forever)
    #[arg(long)]
    pub frames: Option<u64>,
    #[arg(long, value_enum)]
    pub screen: Option<Half>,
    #[arg(long)]
    pub center_x: Option<u8>,
    #[arg(long)]
    pub center_y: Option<u8>,
    #[arg(long)]
    pub radius: Option<u8>,
    /// write the emulated panel to a PBM file after the run
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub dump_pbm: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and the given CLI values, then validate.
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/glcd64/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/glcd64/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/glcd64.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["glcd64.yaml", "config.yaml", "config/glcd64.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()  { dst.log_level = src.log_level; }
    if src.backend.is_some()    { dst.backend = src.backend; }
    if src.frames.is_some()     { dst.frames = src.frames; }
    if src.screen.is_some()     { dst.screen = src.screen; }
    if src.dump_pbm.is_some()   { dst.dump_pbm = src.dump_pbm; }
    if src.gpio.is_some()       { dst.gpio = src.gpio; }
    // circle
    match (&mut dst.circle, src.circle) {
        (None, Some(c)) => dst.circle = Some(c),
        (Some(d), Some(s)) => merge_circle(d, s),
        _ => {}
    }
}

fn merge_circle(dst: &mut CircleConfig, src: CircleConfig) {
    if src.x.is_some()       { dst.x = src.x; }
    if src.y.is_some()       { dst.y = src.y; }
    if src.radius.is_some()  { dst.radius = src.radius; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()  { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                { cfg.log_level = Some("debug".to_string()); }
    if cli.backend.is_some()    { cfg.backend = cli.backend; }
    if cli.frames.is_some()     { cfg.frames = cli.frames; }
    if cli.screen.is_some()     { cfg.screen = cli.screen; }
    if cli.dump_pbm.is_some()   { cfg.dump_pbm = cli.dump_pbm.clone(); }

    let any_circle = cli.center_x.is_some() || cli.center_y.is_some() || cli.radius.is_some();
    if any_circle && cfg.circle.is_none() {
        cfg.circle = Some(CircleConfig::default());
    }
    if let Some(circle) = cfg.circle.as_mut() {
        if cli.center_x.is_some()  { circle.x = cli.center_x; }
        if cli.center_y.is_some()  { circle.y = cli.center_y; }
        if cli.radius.is_some()    { circle.radius = cli.radius; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if log::LevelFilter::from_str(cfg.log_level()).is_err() {
        return Err(ConfigError::Validation(format!("unknown log_level '{}'", cfg.log_level())));
    }

    if cfg.frames == Some(0) {
        return Err(ConfigError::Validation("frames must be at least 1".into()));
    }

    let circle = cfg.circle();
    if !circle.fits() {
        return Err(ConfigError::Validation(format!(
            "circle at ({}, {}) radius {} does not fit the 64x64 panel",
            circle.x, circle.y, circle.radius
        )));
    }

    match cfg.backend() {
        Backend::Gpio => {
            let gpio = cfg.gpio.as_ref().ok_or_else(|| {
                ConfigError::Validation("gpio backend needs a gpio section".into())
            })?;
            let mut seen = HashSet::new();
            if let Some(dup) = gpio.lines().find(|line| !seen.insert(*line)) {
                return Err(ConfigError::Validation(format!("GPIO line {} assigned twice", dup)));
            }
            if cfg.dump_pbm.is_some() {
                return Err(ConfigError::Validation("dump_pbm is only available with the emulator backend".into()));
            }
        }
        Backend::Emulator => {
            // the image is written after the last frame
            if cfg.dump_pbm.is_some() && cfg.frames.is_none() {
                return Err(ConfigError::Validation("dump_pbm needs a frame limit".into()));
            }
        }
    }
    Ok(())
}
