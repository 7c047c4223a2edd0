use crate::line_extraction::{HoughParams, MAX_RHO};
use crate::traffic_classifier::default_class_table;
use crate::types::{Config, LoggingConfig, OutputConfig};
use anyhow::{ensure, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

impl Default for Config {
    fn default() -> Self {
        Self {
            classes: default_class_table(),
            hough: HoughParams::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            parallel: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_annotated: true,
            output_dir: "output".to_string(),
            stroke_width: 5,
            write_json: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load the config named on the command line, or the default file next to
    /// the working directory. Only the default file may be absent, in which
    /// case the built-in defaults are used. Returns the path actually read.
    pub fn resolve(explicit: Option<&Path>, default_path: &Path) -> Result<(Self, Option<PathBuf>)> {
        match explicit {
            Some(path) => Ok((Self::load(path)?, Some(path.to_path_buf()))),
            None if default_path.exists() => {
                Ok((Self::load(default_path)?, Some(default_path.to_path_buf())))
            }
            None => Ok((Self::default(), None)),
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.classes.is_empty(), "at least one traffic class is required");
        ensure!(
            self.hough.rho > 0.0 && self.hough.rho <= MAX_RHO,
            "hough.rho must be in (0, {}]",
            MAX_RHO
        );
        ensure!(self.hough.threshold > 0, "hough.threshold must be positive");
        ensure!(
            self.hough.theta_step_degrees > 0.0 && self.hough.theta_step_degrees <= 180.0,
            "hough.theta_step_degrees must be in (0, 180]"
        );
        ensure!(self.output.stroke_width > 0, "output.stroke_width must be positive");
        Ok(())
    }
}
