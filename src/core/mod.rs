pub mod calculator;
pub mod engine;
pub mod factors;
pub mod heatmap;
pub mod report;
pub mod scenarios;
pub mod series;

pub use crate::app::pipelines::footprint_pipeline::FootprintPipeline;
pub use crate::domain::model::{CalculationOutcome, FootprintRequest};
pub use crate::domain::ports::{CarbonFactorSource, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
