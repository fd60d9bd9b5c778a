use anyhow::Context;
use carbon_footprint::core::series::{level_label, CarbonFactorSeries, DEFAULT_SEED};
use carbon_footprint::domain::model::ConfidenceLevel;
use carbon_footprint::utils::logger;
use carbon_footprint::utils::validation::validate_date;
use clap::Parser;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "series_dump")]
#[command(about = "Export the simulated daily carbon factor series as CSV")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long, default_value = "2024-01-01")]
    start_date: String,

    #[arg(long, default_value = "2024-12-31")]
    end_date: String,

    /// Output CSV path; stdout when omitted
    #[arg(short, long)]
    output: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    json_logs: bool,
}

#[derive(Serialize)]
struct SeriesRow {
    date: String,
    low: f64,
    medium: f64,
    high: f64,
    medium_level: &'static str,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(false);
    }

    let start = validate_date("start_date", &args.start_date)?;
    let end = validate_date("end_date", &args.end_date)?;
    let series = CarbonFactorSeries::generate(args.seed, start, end)?;

    let writer: Box<dyn std::io::Write> = match &args.output {
        Some(path) => Box::new(
            std::fs::File::create(path).with_context(|| format!("creating {}", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    for record in series.records() {
        csv_writer.serialize(SeriesRow {
            date: record.date.format("%Y-%m-%d").to_string(),
            low: record.low,
            medium: record.medium,
            high: record.high,
            medium_level: level_label(record.medium).as_str(),
        })?;
    }
    csv_writer.flush()?;

    tracing::info!(
        "Yearly averages: low {:.4}, medium {:.4}, high {:.4}",
        series.yearly_average(ConfidenceLevel::Low),
        series.yearly_average(ConfidenceLevel::Medium),
        series.yearly_average(ConfidenceLevel::High)
    );
    Ok(())
}
