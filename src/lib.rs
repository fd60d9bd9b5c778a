pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::cli::LocalStorage;
pub use crate::core::{
    calculator::CarbonFootprintCalculator, engine::FootprintEngine, series::CarbonFactorSeries,
    FootprintPipeline,
};
pub use crate::utils::error::{CarbonError, Result};
