//! Configuration loader plus strongly typed settings structures.
//!
//! The dot attributes keep the external option names (`numCircles`,
//! `animationDuration`, `circleColor`) so a config file reads like the
//! attribute set a layout would carry. Everything coming from outside is
//! validated here; the widget only ever sees a [`DotsConfig`] whose count and
//! duration are positive.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

pub const DEFAULT_DOT_COUNT: usize = 3;
pub const DEFAULT_CYCLE_MS: u64 = 500;
pub const DEFAULT_REST_RADIUS: f32 = 5.0;
pub const DEFAULT_PEAK_RADIUS: f32 = 10.0;
/// Upper bound on `numCircles`; each dot owns a timer and a radius slot
pub const MAX_DOT_COUNT: usize = 64;

/// RGBA color. Alpha 255 is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Format as `#AARRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Parse `#RRGGBB`, `#AARRGGBB` or a handful of color names.
pub fn parse_color(input: &str) -> Option<Rgba> {
    let input = input.trim();
    if let Some(hex) = input.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return match hex.len() {
            6 => Some(Rgba::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Rgba {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        };
    }

    let named = match input.to_ascii_lowercase().as_str() {
        "white" => Rgba::WHITE,
        "black" => Rgba::opaque(0, 0, 0),
        "red" => Rgba::opaque(255, 0, 0),
        "green" => Rgba::opaque(0, 255, 0),
        "blue" => Rgba::opaque(0, 0, 255),
        "yellow" => Rgba::opaque(255, 255, 0),
        "cyan" => Rgba::opaque(0, 255, 255),
        "magenta" => Rgba::opaque(255, 0, 255),
        "gray" | "grey" => Rgba::opaque(136, 136, 136),
        "transparent" => Rgba { r: 0, g: 0, b: 0, a: 0 },
        _ => return None,
    };
    Some(named)
}

/// Easing applied to cycle progress before sampling the rest→peak→rest keyframes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolator {
    /// Plain triangular pulse
    #[default]
    Linear,
    /// Slow at both ends of the cycle, fast through the middle
    AccelerateDecelerate,
}

impl Interpolator {
    /// Map cycle progress in [0, 1] to eased progress in [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::AccelerateDecelerate => ((t + 1.0) * std::f32::consts::PI).cos() / 2.0 + 0.5,
        }
    }
}

/// Raw attribute overrides. Unset fields keep the current value.
///
/// Counts and durations are signed so that bad input can be seen and
/// rejected instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_circles: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolator: Option<Interpolator>,
}

impl DotAttributes {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged(&self, other: &DotAttributes) -> DotAttributes {
        DotAttributes {
            num_circles: other.num_circles.or(self.num_circles),
            animation_duration: other.animation_duration.or(self.animation_duration),
            circle_color: other
                .circle_color
                .clone()
                .or_else(|| self.circle_color.clone()),
            interpolator: other.interpolator.or(self.interpolator),
        }
    }
}

/// Validated widget configuration.
///
/// `dot_count >= 1` and `cycle_duration_ms >= 1` always hold, so the per-dot
/// start delay can never divide by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DotsConfig {
    dot_count: usize,
    cycle_duration_ms: u64,
    dot_color: Rgba,
    rest_radius: f32,
    peak_radius: f32,
    interpolator: Interpolator,
}

impl Default for DotsConfig {
    fn default() -> Self {
        Self {
            dot_count: DEFAULT_DOT_COUNT,
            cycle_duration_ms: DEFAULT_CYCLE_MS,
            dot_color: Rgba::WHITE,
            rest_radius: DEFAULT_REST_RADIUS,
            peak_radius: DEFAULT_PEAK_RADIUS,
            interpolator: Interpolator::Linear,
        }
    }
}

impl DotsConfig {
    /// Apply attribute overrides on top of this configuration.
    ///
    /// Invalid values are logged and ignored; the field keeps its current value.
    pub fn with_attributes(&self, attrs: &DotAttributes) -> DotsConfig {
        let mut next = self.clone();

        if let Some(count) = attrs.num_circles {
            match usize::try_from(count) {
                Ok(count) if (1..=MAX_DOT_COUNT).contains(&count) => next.dot_count = count,
                _ => tracing::warn!(
                    "Ignoring numCircles={} (must be 1..={}), keeping {}",
                    count,
                    MAX_DOT_COUNT,
                    next.dot_count
                ),
            }
        }

        if let Some(duration) = attrs.animation_duration {
            match u64::try_from(duration) {
                Ok(duration) if duration > 0 => next.cycle_duration_ms = duration,
                _ => tracing::warn!(
                    "Ignoring animationDuration={} (must be positive), keeping {}ms",
                    duration,
                    next.cycle_duration_ms
                ),
            }
        }

        if let Some(ref color) = attrs.circle_color {
            match parse_color(color) {
                Some(rgba) => next.dot_color = rgba,
                None => tracing::warn!(
                    "Ignoring circleColor='{}' (unrecognized), keeping {}",
                    color,
                    next.dot_color.to_hex()
                ),
            }
        }

        if let Some(interpolator) = attrs.interpolator {
            next.interpolator = interpolator;
        }

        next
    }

    pub fn dot_count(&self) -> usize {
        self.dot_count
    }

    pub fn cycle_duration_ms(&self) -> u64 {
        self.cycle_duration_ms
    }

    pub fn cycle_duration(&self) -> Duration {
        Duration::from_millis(self.cycle_duration_ms)
    }

    pub fn dot_color(&self) -> Rgba {
        self.dot_color
    }

    pub fn rest_radius(&self) -> f32 {
        self.rest_radius
    }

    pub fn peak_radius(&self) -> f32 {
        self.peak_radius
    }

    pub fn interpolator(&self) -> Interpolator {
        self.interpolator
    }

    /// Delay before dot `index` starts its first cycle (integer milliseconds)
    pub fn start_delay_ms(&self, index: usize) -> u64 {
        index as u64 * (self.cycle_duration_ms / self.dot_count as u64)
    }
}

/// Terminal frontend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Interval between animation samples
    pub frame_interval_ms: u64,
    /// How long the event loop waits for input before redrawing
    pub poll_timeout_ms: u64,
    /// Widget units covered by one terminal column
    pub units_per_column: f32,
    /// Widget units covered by one terminal row (cells are roughly twice as tall as wide)
    pub units_per_row: f32,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            poll_timeout_ms: 16,
            units_per_column: 2.0,
            units_per_row: 4.0,
        }
    }
}

impl TuiConfig {
    /// Replace non-positive values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.frame_interval_ms == 0 {
            tracing::warn!("frame_interval_ms must be positive, using {}", defaults.frame_interval_ms);
            self.frame_interval_ms = defaults.frame_interval_ms;
        }
        if self.poll_timeout_ms == 0 {
            self.poll_timeout_ms = defaults.poll_timeout_ms;
        }
        if !(self.units_per_column > 0.0) {
            tracing::warn!("units_per_column must be positive, using {}", defaults.units_per_column);
            self.units_per_column = defaults.units_per_column;
        }
        if !(self.units_per_row > 0.0) {
            tracing::warn!("units_per_row must be positive, using {}", defaults.units_per_row);
            self.units_per_row = defaults.units_per_row;
        }
        self
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dots: DotAttributes,
    pub tui: TuiConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Lookup order:
    /// 1. `explicit` path (error if it can't be read)
    /// 2. ~/.loading-dots/config.toml (or $LOADING_DOTS_DIR/config.toml)
    /// 3. Embedded default
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(path) = Self::config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
            tracing::debug!("No config file at {:?}, using embedded defaults", path);
        }

        Self::from_toml_str(DEFAULT_CONFIG).context("Failed to parse embedded default config")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        tracing::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(contents)?;
        config.tui = config.tui.sanitized();
        Ok(config)
    }

    /// Validated dot configuration, starting from the documented defaults
    pub fn dots_config(&self) -> DotsConfig {
        DotsConfig::default().with_attributes(&self.dots)
    }

    /// Get the base directory (~/.loading-dots/)
    /// Can be overridden with LOADING_DOTS_DIR environment variable
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var("LOADING_DOTS_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".loading-dots"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#FF0000"), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(
            parse_color("#80112233"),
            Some(Rgba { a: 0x80, r: 0x11, g: 0x22, b: 0x33 })
        );
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#GG0000"), None);
        assert_eq!(parse_color("FF0000"), None);
    }

    #[test]
    fn test_parse_color_names() {
        assert_eq!(parse_color("White"), Some(Rgba::WHITE));
        assert_eq!(parse_color("grey"), parse_color("gray"));
        assert!(parse_color("transparent").unwrap().is_transparent());
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn test_defaults() {
        let config = DotsConfig::default();
        assert_eq!(config.dot_count(), 3);
        assert_eq!(config.cycle_duration_ms(), 500);
        assert_eq!(config.dot_color(), Rgba::WHITE);
        assert_eq!(config.rest_radius(), 5.0);
        assert_eq!(config.peak_radius(), 10.0);
        assert_eq!(config.interpolator(), Interpolator::Linear);
    }

    #[test]
    fn test_start_delays_use_integer_division() {
        let config = DotsConfig::default();
        let delays: Vec<u64> = (0..3).map(|i| config.start_delay_ms(i)).collect();
        assert_eq!(delays, vec![0, 166, 332]);
    }

    #[test]
    fn test_invalid_attributes_keep_previous_values() {
        let base = DotsConfig::default().with_attributes(&DotAttributes {
            num_circles: Some(5),
            animation_duration: Some(900),
            circle_color: Some("#00FF00".into()),
            interpolator: None,
        });

        let next = base.with_attributes(&DotAttributes {
            num_circles: Some(0),
            animation_duration: Some(-10),
            circle_color: Some("not-a-color".into()),
            interpolator: Some(Interpolator::AccelerateDecelerate),
        });

        assert_eq!(next.dot_count(), 5);
        assert_eq!(next.cycle_duration_ms(), 900);
        assert_eq!(next.dot_color(), Rgba::opaque(0, 255, 0));
        assert_eq!(next.interpolator(), Interpolator::AccelerateDecelerate);
    }

    #[test]
    fn test_dot_count_upper_bound() {
        let base = DotsConfig::default().with_attributes(&DotAttributes {
            num_circles: Some(MAX_DOT_COUNT as i64),
            ..Default::default()
        });
        assert_eq!(base.dot_count(), MAX_DOT_COUNT);

        for huge in [MAX_DOT_COUNT as i64 + 1, i64::MAX] {
            let next = base.with_attributes(&DotAttributes {
                num_circles: Some(huge),
                ..Default::default()
            });
            assert_eq!(next.dot_count(), MAX_DOT_COUNT);
        }

        let from_file = AppConfig::from_toml_str("[dots]\nnumCircles = 9223372036854775807\n")
            .expect("large count still parses");
        assert_eq!(from_file.dots_config().dot_count(), DEFAULT_DOT_COUNT);
    }

    #[test]
    fn test_unset_attributes_keep_current_values() {
        let base = DotsConfig::default().with_attributes(&DotAttributes {
            num_circles: Some(4),
            ..Default::default()
        });
        let next = base.with_attributes(&DotAttributes::default());
        assert_eq!(next, base);
    }

    #[test]
    fn test_merged_prefers_other() {
        let file = DotAttributes {
            num_circles: Some(4),
            animation_duration: Some(800),
            ..Default::default()
        };
        let cli = DotAttributes {
            num_circles: Some(7),
            ..Default::default()
        };
        let merged = file.merged(&cli);
        assert_eq!(merged.num_circles, Some(7));
        assert_eq!(merged.animation_duration, Some(800));
    }

    #[test]
    fn test_interpolators_stay_in_unit_range() {
        for step in 0..=100 {
            let t = step as f32 / 100.0;
            for interp in [Interpolator::Linear, Interpolator::AccelerateDecelerate] {
                let v = interp.apply(t);
                assert!((0.0..=1.0).contains(&v), "{:?}({}) = {}", interp, t, v);
            }
        }
        assert!(Interpolator::AccelerateDecelerate.apply(0.0).abs() < 1e-6);
        assert!((Interpolator::AccelerateDecelerate.apply(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config = AppConfig::from_toml_str(DEFAULT_CONFIG).expect("embedded config parses");
        assert_eq!(config.dots_config(), DotsConfig::default());
        assert_eq!(config.tui, TuiConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r##"
[dots]
numCircles = 5
circleColor = "#FF0000"

[tui]
units_per_row = 0.0
"##,
        )
        .expect("partial config parses");

        let dots = config.dots_config();
        assert_eq!(dots.dot_count(), 5);
        assert_eq!(dots.cycle_duration_ms(), 500);
        assert_eq!(dots.dot_color(), Rgba::opaque(255, 0, 0));
        assert_eq!(config.tui.units_per_row, 4.0);
        assert_eq!(config.tui.frame_interval_ms, 16);
    }

    #[test]
    fn test_negative_values_parse_then_fall_back() {
        let config = AppConfig::from_toml_str("[dots]\nnumCircles = -2\nanimationDuration = 0\n")
            .expect("negative values still parse");
        assert_eq!(config.dots_config(), DotsConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "loading-dots-config-test-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[dots]\nanimationDuration = 1200\ninterpolator = \"accelerate_decelerate\"\n")
            .expect("write temp config");

        let config = AppConfig::load(Some(&path)).expect("load explicit config");
        let _ = fs::remove_file(&path);

        let dots = config.dots_config();
        assert_eq!(dots.cycle_duration_ms(), 1200);
        assert_eq!(dots.interpolator(), Interpolator::AccelerateDecelerate);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("loading-dots-definitely-missing.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
