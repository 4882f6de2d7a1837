use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use log::warn;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::*;
use crate::params::{ColorMode, RenderParams};

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

/// Top-level driver configuration. Unset fields fall back to the defaults
/// in `constants`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fft_size: Option<usize>,       // power of two, 32..=32768
    pub sample_rate_hz: Option<u32>,   // synthetic tone rate
    pub fps: Option<u32>,
    pub frames: Option<u64>,           // 0 = until ctrl-c
    pub track_secs: Option<f64>,       // looping track length for the progress bar
    pub output: Option<PathBuf>,       // PNG of the last frame
    pub seed: Option<u64>,             // fixed RNG seed for reproducible frames
    /// layer toggles and colors
    pub render: Option<RenderParams>,
}

impl Config {
    pub fn width(&self) -> u32 { self.width.unwrap_or(DEFAULT_WIDTH) }
    pub fn height(&self) -> u32 { self.height.unwrap_or(DEFAULT_HEIGHT) }
    pub fn fft_size(&self) -> usize { self.fft_size.unwrap_or(DEFAULT_FFT_SIZE) }
    pub fn sample_rate_hz(&self) -> u32 { self.sample_rate_hz.unwrap_or(DEFAULT_SAMPLE_RATE_HZ) }
    pub fn fps(&self) -> u32 { self.fps.unwrap_or(DEFAULT_FPS) }
    pub fn frames(&self) -> u64 { self.frames.unwrap_or(0) }
    pub fn track_secs(&self) -> f64 { self.track_secs.unwrap_or(DEFAULT_TRACK_SECS) }
    pub fn render(&self) -> RenderParams { self.render.clone().unwrap_or_default() }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "pulseviz", version, about = "Canvas-style audio visualizer")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(short = 'v', long, alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    #[arg(long)]
    pub fft_size: Option<usize>,
    #[arg(long)]
    pub sample_rate_hz: Option<u32>,
    #[arg(long)]
    pub fps: Option<u32>,
    /// Number of frames to render, 0 runs until ctrl-c
    #[arg(short = 'n', long)]
    pub frames: Option<u64>,
    #[arg(long)]
    pub track_secs: Option<f64>,
    /// Write the final frame to this PNG
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, action = ArgAction::Set)]
    pub show_freq: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_gradient: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_bars: Option<bool>,
    /// CSS color or "fade"
    #[arg(long)]
    pub bar_color: Option<String>,
    #[arg(long, action = ArgAction::Set)]
    pub show_circles: Option<bool>,
    /// CSS color or "fade"
    #[arg(long)]
    pub circle_color: Option<String>,
    #[arg(long, action = ArgAction::Set)]
    pub show_noise: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_monochrome: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_invert: Option<bool>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: read YAML, merge the parsed CLI, validate.
///
/// Call after the logger is up so rejected overrides are reported.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    let cfg = load_with(cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Filter the logger should start with: `--log-level`, then `-v`, then the
/// config file's `log_level`, then "info". The file is read as plain YAML
/// so nothing gets logged (and lost) before the logger exists.
pub fn startup_log_level(cli: &Cli) -> String {
    if let Some(level) = cli.log_level.as_ref() {
        return level.clone();
    }
    if cli.debug {
        return "debug".into();
    }
    cli.config
        .clone()
        .or_else(find_config_file)
        .and_then(|p| fs::read_to_string(p).ok())
        .and_then(|s| serde_yaml::from_str::<serde_yaml::Value>(&s).ok())
        .and_then(|v| v.get("log_level")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| "info".into())
}

/// Layer defaults, YAML and an already parsed CLI.
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
    // XDG-style: ~/.config/pulseviz/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/pulseviz/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/pulseviz.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["pulseviz.yaml", "config/pulseviz.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.width.is_some()          { dst.width = src.width; }
    if src.height.is_some()         { dst.height = src.height; }
    if src.fft_size.is_some()       { dst.fft_size = src.fft_size; }
    if src.sample_rate_hz.is_some() { dst.sample_rate_hz = src.sample_rate_hz; }
    if src.fps.is_some()            { dst.fps = src.fps; }
    if src.frames.is_some()         { dst.frames = src.frames; }
    if src.track_secs.is_some()     { dst.track_secs = src.track_secs; }
    if src.output.is_some()         { dst.output = src.output; }
    if src.seed.is_some()           { dst.seed = src.seed; }
    // render params are a whole record, the file wins if present
    if src.render.is_some()         { dst.render = src.render; }
}

fn color_override(name: &str, value: &Option<String>) -> Option<ColorMode> {
    let s = value.as_ref()?;
    match s.parse::<ColorMode>() {
        Ok(mode) => Some(mode),
        Err(e) => {
            warn!("ignoring --{name}: {e}");
            None
        }
    }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.debug                     { cfg.log_level = Some("debug".into()); }
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.width.is_some()           { cfg.width = cli.width; }
    if cli.height.is_some()          { cfg.height = cli.height; }
    if cli.fft_size.is_some()        { cfg.fft_size = cli.fft_size; }
    if cli.sample_rate_hz.is_some()  { cfg.sample_rate_hz = cli.sample_rate_hz; }
    if cli.fps.is_some()             { cfg.fps = cli.fps; }
    if cli.frames.is_some()          { cfg.frames = cli.frames; }
    if cli.track_secs.is_some()      { cfg.track_secs = cli.track_secs; }
    if cli.output.is_some()          { cfg.output = cli.output.clone(); }
    if cli.seed.is_some()            { cfg.seed = cli.seed; }

    let bar_color = color_override("bar-color", &cli.bar_color);
    let circle_color = color_override("circle-color", &cli.circle_color);
    let any_render = cli.show_freq.is_some()
        || cli.show_gradient.is_some()
        || cli.show_bars.is_some()
        || cli.show_circles.is_some()
        || cli.show_noise.is_some()
        || cli.show_monochrome.is_some()
        || cli.show_invert.is_some()
        || bar_color.is_some()
        || circle_color.is_some();

    if any_render && cfg.render.is_none() {
        cfg.render = Some(RenderParams::default());
    }
    if let Some(render) = cfg.render.as_mut() {
        if let Some(v) = cli.show_freq       { render.show_freq = v; }
        if let Some(v) = cli.show_gradient   { render.show_gradient = v; }
        if let Some(v) = cli.show_bars       { render.show_bars = v; }
        if let Some(v) = cli.show_circles    { render.show_circles = v; }
        if let Some(v) = cli.show_noise      { render.show_noise = v; }
        if let Some(v) = cli.show_monochrome { render.show_monochrome = v; }
        if let Some(v) = cli.show_invert     { render.show_invert = v; }
        if bar_color.is_some()               { render.bar_color = bar_color; }
        if circle_color.is_some()            { render.circle_color = circle_color; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.width() == 0 || cfg.height() == 0 {
        return Err(ConfigError::Validation("width/height must be > 0".into()));
    }
    let n = cfg.fft_size();
    if !n.is_power_of_two() || !(FFT_SIZE_MIN..=FFT_SIZE_MAX).contains(&n) {
        return Err(ConfigError::Validation(format!(
            "fft_size must be a power of two in {FFT_SIZE_MIN}..={FFT_SIZE_MAX}, got {n}"
        )));
    }
    if cfg.fps() == 0 {
        return Err(ConfigError::Validation("fps must be > 0".into()));
    }
    if cfg.sample_rate_hz() == 0 {
        return Err(ConfigError::Validation("sample_rate_hz must be > 0".into()));
    }
    let track = cfg.track_secs();
    if !track.is_finite() || track < 0.0 {
        return Err(ConfigError::Validation("track_secs must be >= 0".into()));
    }
    if let Some(render) = cfg.render.as_ref() {
        if !(render.progress_stroke_width > 0.0) {
            return Err(ConfigError::Validation("progress_stroke_width must be > 0".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let cfg = Config::default();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.width(), DEFAULT_WIDTH);
        assert_eq!(cfg.fft_size(), DEFAULT_FFT_SIZE);
        assert_eq!(cfg.render(), RenderParams::default());
    }

    #[test]
    fn test_validate_rejects() {
        let bad_fft = Config { fft_size: Some(100), ..Default::default() };
        assert!(matches!(validate(&bad_fft), Err(ConfigError::Validation(_))));
        let zero_w = Config { width: Some(0), ..Default::default() };
        assert!(validate(&zero_w).is_err());
        let zero_fps = Config { fps: Some(0), ..Default::default() };
        assert!(validate(&zero_fps).is_err());
    }

    #[test]
    fn test_yaml_merge_and_cli_precedence() {
        let yaml = "width: 320\nheight: 200\nrender:\n  showBars: true\n  barColor: fade\n";
        let file: Config = serde_yaml::from_str(yaml).unwrap();
        let mut cfg = Config { width: Some(640), fps: Some(30), ..Default::default() };
        merge(&mut cfg, file);
        assert_eq!(cfg.width(), 320);
        assert_eq!(cfg.fps(), 30);
        assert!(cfg.render().show_bars);

        let cli = Cli {
            width: Some(100),
            show_bars: Some(false),
            circle_color: Some("blue".into()),
            ..Default::default()
        };
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.width(), 100);
        let render = cfg.render();
        assert!(!render.show_bars);
        assert_eq!(render.bar_color, Some(ColorMode::Fade));
        assert!(matches!(render.circle_color, Some(ColorMode::Fixed(_))));
    }

    #[test]
    fn test_cli_creates_render_section() {
        let mut cfg = Config::default();
        let cli = Cli { show_invert: Some(true), debug: true, ..Default::default() };
        apply_cli_overrides(&mut cfg, &cli);
        assert!(cfg.render().show_invert);
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_bad_cli_color_ignored() {
        let mut cfg = Config::default();
        let cli = Cli { bar_color: Some("nope".into()), ..Default::default() };
        apply_cli_overrides(&mut cfg, &cli);
        assert!(cfg.render.is_none());
    }

    #[test]
    fn test_bad_yaml_color_keeps_rest_of_file() {
        let path = std::env::temp_dir().join(format!("pulseviz-bad-color-{}.yaml", std::process::id()));
        fs::write(&path, "width: 320\nrender:\n  showBars: true\n  barColor: 'grba(0,0,0,0.50)'\n").unwrap();
        let cli = Cli { config: Some(path.clone()), ..Default::default() };
        let cfg = load_with(&cli);
        fs::remove_file(&path).ok();

        let cfg = cfg.unwrap();
        assert_eq!(cfg.width(), 320);
        assert!(cfg.render().show_bars);
        assert_eq!(cfg.render().bar_color, None);
    }

    #[test]
    fn test_startup_log_level_precedence() {
        let path = std::env::temp_dir().join(format!("pulseviz-log-level-{}.yaml", std::process::id()));
        fs::write(&path, "log_level: warn\n").unwrap();
        let from_file = Cli { config: Some(path.clone()), ..Default::default() };
        let debug = Cli { debug: true, ..from_file.clone() };
        let explicit = Cli { log_level: Some("trace".into()), ..debug.clone() };
        let levels = (
            startup_log_level(&from_file),
            startup_log_level(&debug),
            startup_log_level(&explicit),
        );
        let missing = Cli { config: Some(PathBuf::from("/definitely/not/here.yaml")), ..Default::default() };
        let fallback = startup_log_level(&missing);
        fs::remove_file(&path).ok();

        assert_eq!(levels, ("warn".into(), "debug".into(), "trace".into()));
        assert_eq!(fallback, "info");
    }

    #[test]
    fn test_missing_explicit_file() {
        let cli = Cli { config: Some(PathBuf::from("/definitely/not/here.yaml")), ..Default::default() };
        assert!(matches!(load_with(&cli), Err(ConfigError::Validation(_))));
    }
}
