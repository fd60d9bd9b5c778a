use carbon_footprint::config::request::RequestConfig;
use carbon_footprint::core::factors::EmissionFactorDatabase;
use carbon_footprint::utils::error::{CarbonError, ErrorSeverity};
use carbon_footprint::utils::{logger, validation::Validate};
use carbon_footprint::{
    CarbonFactorSeries, CarbonFootprintCalculator, CliConfig, FootprintEngine, FootprintPipeline,
    LocalStorage,
};
use clap::Parser;

fn exit_code(e: &CarbonError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &CarbonError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

fn dry_run(config: &CliConfig) -> Result<(), CarbonError> {
    let request = RequestConfig::from_file(&config.input)?.to_request()?;
    println!("🔍 Dry run: {}", config.input);
    println!("   Company: {}", request.company.name);
    println!("   Fuel lines: {}", request.fuels.len());
    println!(
        "   Electricity: {:?} in {} (confidence {}, dynamic {})",
        request.electricity.usage,
        request.electricity.region,
        request.electricity.confidence_level,
        request.electricity.use_dynamic
    );
    println!(
        "   Series: {} to {}, seed {}",
        config.start_date, config.end_date, config.seed
    );
    match &request.heatmap {
        Some(h) => println!("   Heatmap: {} days from {}", h.days, h.start_date),
        None => println!("   Heatmap: disabled"),
    }
    println!("   Scenarios: {}", request.scenarios.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting carbon-footprint CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if config.list_factors {
        println!("{}", EmissionFactorDatabase::new().to_json_pretty()?);
        return Ok(());
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    if config.dry_run {
        if let Err(e) = dry_run(&config) {
            fail(&e);
        }
        return Ok(());
    }

    // 模擬電碳因子序列只在啟動時生成一次
    let (start, end) = config.series_range()?;
    let series = match CarbonFactorSeries::generate(config.seed, start, end) {
        Ok(series) => series,
        Err(e) => fail(&e),
    };

    let storage = LocalStorage::new(config.output_path.clone());
    let calculator = CarbonFootprintCalculator::new(series);
    let pipeline = FootprintPipeline::new(storage, config, calculator);
    let engine = FootprintEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Carbon footprint calculation completed!");
            println!("✅ Carbon footprint calculation completed!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
