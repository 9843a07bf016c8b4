//! Session settings, read from a TOML file.
//!
//! ```toml
//! [viewport]
//! x_min = -10
//! x_max = 10
//! y_min = -10
//! y_max = 10
//!
//! [sampling]
//! step = 0.5
//!
//! [interaction]
//! drag_speed = 25
//! color_seed = 42        # optional, random colors are reproducible when set
//!
//! [logging]
//! level = "info"         # off, error, warn, info, debug, trace
//! file = "grapher.log"   # optional
//! timestamped = false    # true: write to grapher_<date>_<time>.log
//!
//! [export]
//! path = "chart.png"
//! width = 800
//! height = 600
//! ```
//! Every key is optional; missing keys keep their defaults.
use crate::plotting::viewport::{DEFAULT_DRAG_SPEED, Viewport};
use chrono::Local;
use log::LevelFilter;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use toml::{Table, Value};

pub const DEFAULT_STEP: f64 = 0.5;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid { key: String, expected: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "invalid TOML in config: {}", e),
            ConfigError::Invalid { key, expected } => {
                write!(f, "config key '{}' must be {}", key, expected)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotterConfig {
    pub viewport: Viewport,
    pub step: f64,
    pub drag_speed: f64,
    pub color_seed: Option<u64>,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub timestamped_log: bool,
    pub export_path: PathBuf,
    pub export_size: (u32, u32),
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            step: DEFAULT_STEP,
            drag_speed: DEFAULT_DRAG_SPEED,
            color_seed: None,
            log_level: LevelFilter::Info,
            log_file: None,
            timestamped_log: false,
            export_path: PathBuf::from("chart.png"),
            export_size: (800, 600),
        }
    }
}

fn get<'a>(table: &'a Table, section: &str, key: &str) -> Option<&'a Value> {
    table.get(section)?.as_table()?.get(key)
}

fn invalid(section: &str, key: &str, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key: format!("{}.{}", section, key),
        expected,
    }
}

fn get_f64(table: &Table, section: &str, key: &str) -> Result<Option<f64>, ConfigError> {
    match get(table, section, key) {
        None => Ok(None),
        Some(Value::Float(v)) => Ok(Some(*v)),
        Some(Value::Integer(v)) => Ok(Some(*v as f64)),
        Some(_) => Err(invalid(section, key, "a number")),
    }
}

fn get_u64(table: &Table, section: &str, key: &str) -> Result<Option<u64>, ConfigError> {
    match get(table, section, key) {
        None => Ok(None),
        Some(Value::Integer(v)) if *v >= 0 => Ok(Some(*v as u64)),
        Some(_) => Err(invalid(section, key, "a non-negative integer")),
    }
}

fn get_str<'a>(table: &'a Table, section: &str, key: &str) -> Result<Option<&'a str>, ConfigError> {
    match get(table, section, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(invalid(section, key, "a string")),
    }
}

fn get_bool(table: &Table, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
    match get(table, section, key) {
        None => Ok(None),
        Some(Value::Boolean(b)) => Ok(Some(*b)),
        Some(_) => Err(invalid(section, key, "true or false")),
    }
}

impl PlotterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: Table = toml::from_str(content).map_err(ConfigError::Parse)?;
        let mut config = PlotterConfig::default();

        let mut bounds = [
            config.viewport.x_min,
            config.viewport.x_max,
            config.viewport.y_min,
            config.viewport.y_max,
        ];
        for (bound, key) in bounds.iter_mut().zip(["x_min", "x_max", "y_min", "y_max"]) {
            if let Some(v) = get_f64(&table, "viewport", key)? {
                if !v.is_finite() {
                    return Err(invalid("viewport", key, "a finite number"));
                }
                *bound = v;
            }
        }
        let [x_min, x_max, y_min, y_max] = bounds;
        // same rounding as bounds typed during the session
        config.viewport.set_bounds(x_min, x_max, y_min, y_max);

        if let Some(step) = get_f64(&table, "sampling", "step")? {
            if !step.is_finite() || step <= 0.0 {
                return Err(invalid("sampling", "step", "a positive number"));
            }
            config.step = step;
        }

        if let Some(speed) = get_f64(&table, "interaction", "drag_speed")? {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(invalid("interaction", "drag_speed", "a positive number"));
            }
            config.drag_speed = speed;
        }
        config.color_seed = get_u64(&table, "interaction", "color_seed")?;

        if let Some(level) = get_str(&table, "logging", "level")? {
            config.log_level = LevelFilter::from_str(level).map_err(|_| {
                invalid("logging", "level", "one of off, error, warn, info, debug, trace")
            })?;
        }
        config.log_file = get_str(&table, "logging", "file")?.map(PathBuf::from);
        config.timestamped_log = get_bool(&table, "logging", "timestamped")?.unwrap_or(false);

        if let Some(path) = get_str(&table, "export", "path")? {
            config.export_path = PathBuf::from(path);
        }
        let width = get_u64(&table, "export", "width")?;
        let height = get_u64(&table, "export", "height")?;
        config.export_size = (
            width.map_or(config.export_size.0, |w| w as u32),
            height.map_or(config.export_size.1, |h| h as u32),
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Log file to write to, if any. A timestamped name wins over a fixed one.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        if self.timestamped_log {
            let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
            return Some(PathBuf::from(format!("grapher_{}.log", date_and_time)));
        }
        self.log_file.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            PlotterConfig::from_toml_str("").unwrap(),
            PlotterConfig::default()
        );
    }

    #[test]
    fn test_overrides() {
        let content = r#"
            [viewport]
            x_min = -5
            x_max = 5.4
            y_max = 7.5

            [sampling]
            step = 0.25

            [interaction]
            drag_speed = 50
            color_seed = 7

            [logging]
            level = "debug"
            file = "session.log"

            [export]
            path = "out.jpg"
            width = 1024
        "#;
        let config = PlotterConfig::from_toml_str(content).unwrap();
        assert_eq!(config.viewport, Viewport::new(-5.0, 5.0, -10.0, 8.0));
        assert_eq!(config.step, 0.25);
        assert_eq!(config.drag_speed, 50.0);
        assert_eq!(config.color_seed, Some(7));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file_path(), Some(PathBuf::from("session.log")));
        assert_eq!(config.export_path, PathBuf::from("out.jpg"));
        assert_eq!(config.export_size, (1024, 600));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            PlotterConfig::from_toml_str("[sampling]\nstep = 0"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            PlotterConfig::from_toml_str("[viewport]\nx_min = \"left\""),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            PlotterConfig::from_toml_str("[logging]\nlevel = \"loud\""),
            Err(ConfigError::Invalid { .. })
        ));
        for bound in ["x_min = inf", "x_max = nan", "y_min = -inf"] {
            assert!(matches!(
                PlotterConfig::from_toml_str(&format!("[viewport]\n{}", bound)),
                Err(ConfigError::Invalid { .. })
            ));
        }
        assert!(matches!(
            PlotterConfig::from_toml_str("[sampling"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_timestamped_log_name() {
        let config = PlotterConfig {
            timestamped_log: true,
            ..PlotterConfig::default()
        };
        let name = config.log_file_path().unwrap();
        let name = name.to_string_lossy();
        assert!(name.starts_with("grapher_") && name.ends_with(".log"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sampling]\nstep = 2").unwrap();
        let config = PlotterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.step, 2.0);
        assert!(matches!(
            PlotterConfig::from_file(Path::new("/nonexistent/grapher.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
