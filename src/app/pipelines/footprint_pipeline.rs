use crate::config::request::RequestConfig;
use crate::core::calculator::CarbonFootprintCalculator;
use crate::core::heatmap::HeatmapGenerator;
use crate::core::report::render_report;
use crate::core::scenarios::ScenarioSimulator;
use crate::core::{
    CalculationOutcome, CarbonFactorSource, ConfigProvider, FootprintRequest, Pipeline, Storage,
};
use crate::domain::model::{HeatmapCell, Scope2Detail};
use crate::utils::error::{CarbonError, Result};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// Request file in, zip bundle out.
pub struct FootprintPipeline<S: Storage, C: ConfigProvider, F: CarbonFactorSource> {
    storage: S,
    config: C,
    calculator: CarbonFootprintCalculator<F>,
}

impl<S: Storage, C: ConfigProvider, F: CarbonFactorSource> FootprintPipeline<S, C, F> {
    pub fn new(storage: S, config: C, calculator: CarbonFootprintCalculator<F>) -> Self {
        Self {
            storage,
            config,
            calculator,
        }
    }

    pub fn calculator(&self) -> &CarbonFootprintCalculator<F> {
        &self.calculator
    }
}

#[derive(Serialize)]
struct DailyEmissionRow<'a> {
    date: &'a str,
    consumption_kwh: f64,
    carbon_factor: f64,
    emissions_ton: f64,
}

#[derive(Serialize)]
struct HeatmapRow<'a> {
    date: &'a str,
    region: &'a str,
    carbon_factor: f64,
    level: &'static str,
    level_zh: &'static str,
}

fn csv_bytes<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| CarbonError::IoError(e.into_error()))
}

fn daily_rows(details: &[Scope2Detail]) -> Vec<DailyEmissionRow<'_>> {
    details
        .iter()
        .filter_map(|detail| match detail {
            Scope2Detail::Daily {
                date,
                consumption_kwh,
                carbon_factor,
                emissions_ton,
            } => Some(DailyEmissionRow {
                date,
                consumption_kwh: *consumption_kwh,
                carbon_factor: *carbon_factor,
                emissions_ton: *emissions_ton,
            }),
            Scope2Detail::AnnualTotal { .. } => None,
        })
        .collect()
}

fn heatmap_rows(cells: &[HeatmapCell]) -> impl Iterator<Item = HeatmapRow<'_>> {
    cells.iter().map(|cell| HeatmapRow {
        date: &cell.date,
        region: &cell.region,
        carbon_factor: cell.carbon_factor,
        level: cell.level.as_str(),
        level_zh: cell.level.display_zh(),
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: CarbonFactorSource> Pipeline
    for FootprintPipeline<S, C, F>
{
    async fn collect(&self) -> Result<FootprintRequest> {
        tracing::debug!("Reading request from: {}", self.config.input_path());
        let config = RequestConfig::from_file(self.config.input_path())?;
        config.to_request()
    }

    async fn calculate(&self, request: FootprintRequest) -> Result<CalculationOutcome> {
        let footprint = self.calculator.calculate(&request)?;

        let heatmap = match &request.heatmap {
            Some(settings) => HeatmapGenerator::new(self.calculator.database()).generate(settings)?,
            None => Vec::new(),
        };

        let scenarios = ScenarioSimulator::new(request.scenario_seed).simulate(&request.scenarios);

        Ok(CalculationOutcome {
            footprint,
            heatmap,
            scenarios,
            recommendations: request.recommendations,
        })
    }

    async fn publish(&self, outcome: CalculationOutcome) -> Result<String> {
        let bundle_name = self.config.bundle_name();
        let output_path = format!("{}/{}", self.config.output_path(), bundle_name);

        let daily = daily_rows(&outcome.footprint.scope2.details);

        // 打包報告與計算結果
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("report.txt", FileOptions::default())?;
            zip.write_all(render_report(&outcome).as_bytes())?;

            zip.start_file::<_, ()>("result.json", FileOptions::default())?;
            let json_data = serde_json::to_string_pretty(&outcome.footprint)?;
            zip.write_all(json_data.as_bytes())?;

            if !daily.is_empty() {
                zip.start_file::<_, ()>("scope2_daily.csv", FileOptions::default())?;
                zip.write_all(&csv_bytes(daily)?)?;
            }

            if !outcome.heatmap.is_empty() {
                zip.start_file::<_, ()>("heatmap.csv", FileOptions::default())?;
                zip.write_all(&csv_bytes(heatmap_rows(&outcome.heatmap))?)?;
            }

            if !outcome.scenarios.is_empty() {
                zip.start_file::<_, ()>("scenarios.json", FileOptions::default())?;
                let json_data = serde_json::to_string_pretty(&outcome.scenarios)?;
                zip.write_all(json_data.as_bytes())?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(bundle_name, &zip_data).await?;

        Ok(output_path)
    }
}
