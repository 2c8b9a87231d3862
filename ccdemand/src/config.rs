//! Application configuration management.
//!
//! This module handles loading and merging configuration from multiple sources
//! with a clear precedence order. Configuration can come from default values,
//! a configuration file, and environment variables.

use crate::{CliError, Sliders};
use cc_plot::PlotConfig;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Slider ranges for `explore`
    #[serde(default)]
    pub sliders: Sliders,

    /// Diagram layout (canvas size, axis limits, curve resolution)
    #[serde(default)]
    pub plot: PlotConfig,

    /// Numerical solver limits
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Limits applied to the numerical solvers
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock limit for a single solve (if omitted, no limit)
    #[serde(with = "humantime_serde::option")]
    pub time_limit: Option<Duration>,
    /// The maximum number of objective evaluations for the NLopt backend
    pub max_eval: u32,
    /// Relative step tolerance for the NLopt backend
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            max_eval: 500,
            tolerance: 1e-10,
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `APP_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Fix the axes of every diagram
    /// export APP_PLOT__X_MAX=250
    /// export APP_PLOT__Y_MAX=220
    ///
    /// # Give each solve at most two seconds
    /// export APP_SOLVER__TIME_LIMIT="2s"
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(CliError::MissingConfig(path.to_path_buf()).into());
            }
        }

        // Override with environment variables
        // This maps APP_PLOT__WIDTH to plot.width
        config = config.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        let app: Self = built_config.try_deserialize()?;
        app.plot.validate()?;
        Ok(app)
    }
}
