//! Settings, loaded from an optional JSON file and then overridden by command line flags.
//!
//! ```json
//! {
//!     "output-device": "default",
//!     "output-gain": 1.0,
//!     "amplitude": 0.25,
//!     "fade": 0.005,
//!     "max-song-length": 600.0,
//!     "log-level": "info"
//! }
//! ```

use std::{fs, path::Path, str::FromStr};

use anyhow::{ensure, Context, Result};
use clap::ArgMatches;
use log::LevelFilter;
use serde::Deserialize;

use crate::player::DEFAULT_AMPLITUDE;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Name of the output device, `default` for the system default
    pub output_device: String,
    /// Gain applied to the mixed output
    pub output_gain: f32,
    /// Amplitude of every tone, from 0 (exclusive) to 1
    pub amplitude: f32,
    /// Fade in and out time of each tone, in seconds
    pub fade: f64,
    /// Longest song that will be played, in seconds
    pub max_song_length: Option<f64>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_device: "default".to_owned(),
            output_gain: 1.0,
            amplitude: DEFAULT_AMPLITUDE,
            fade: 0.005,
            max_song_length: None,
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    /// Loads the config file if one was given, the defaults if not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Error reading config `{}`", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config `{}`", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config = serde_json::from_str::<Self>(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies the global command line flags on top of the config.
    pub fn apply_args(&mut self, args: &ArgMatches) -> Result<()> {
        if let Some(device) = args.get_one::<String>("output-device") {
            self.output_device = device.to_owned();
        }

        if let Some(gain) = args.get_one::<f32>("output-gain") {
            self.output_gain = *gain;
        }

        if let Some(level) = args.get_one::<String>("log-level") {
            self.log_level = level.to_owned();
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.amplitude > 0.0 && self.amplitude <= 1.0,
            "amplitude must be above 0 and at most 1, got {}",
            self.amplitude
        );
        ensure!(
            self.output_gain.is_finite() && self.output_gain >= 0.0,
            "output gain must be a non-negative number, got {}",
            self.output_gain
        );
        ensure!(
            self.fade.is_finite() && self.fade >= 0.0,
            "fade must be a non-negative number of seconds, got {}",
            self.fade
        );
        if let Some(limit) = self.max_song_length {
            ensure!(
                limit > 0.0,
                "max song length must be above 0 seconds, got {limit}"
            );
        }
        self.level()?;

        Ok(())
    }

    pub fn level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .with_context(|| format!("Unknown log level `{}`", self.log_level))
    }
}
