use anyhow::Result;
use carbon_footprint::domain::model::ConfidenceLevel;
use carbon_footprint::{
    CarbonFactorSeries, CarbonFootprintCalculator, CliConfig, FootprintEngine, FootprintPipeline,
    LocalStorage,
};
use chrono::NaiveDate;
use clap::Parser;
use std::io::Read;
use tempfile::TempDir;

fn series_2024() -> CarbonFactorSeries {
    CarbonFactorSeries::generate(
        42,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    )
    .unwrap()
}

fn read_entry(archive: &mut zip::ZipArchive<std::io::Cursor<Vec<u8>>>, name: &str) -> String {
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

/// 年度用電 + 燃料 + 出口，完整跑一次引擎並檢查輸出壓縮檔
#[tokio::test]
async fn test_end_to_end_annual_request() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let input_path = format!("{}/request.toml", temp_path);

    std::fs::write(
        &input_path,
        r#"
[company]
name = "华东钢铁有限公司"
industry = "钢铁"

[[fuel]]
fuel_type = "燃煤"
consumption = 100.0

[electricity]
region = "华东区域电网"
use_dynamic = false
annual_consumption_kwh = 1000000.0

[production]
product_name = "螺纹钢"
output = 1000.0

[export]
export_volume = 100.0

[heatmap]
days = 31

[scenarios]
names = ["光伏自发自用", "余热回收"]
"#,
    )?;

    let output_path = format!("{}/out", temp_path);
    let config = CliConfig::parse_from([
        "carbon-footprint",
        "--input",
        input_path.as_str(),
        "--output-path",
        output_path.as_str(),
    ]);

    let storage = LocalStorage::new(output_path.clone());
    let pipeline =
        FootprintPipeline::new(storage, config, CarbonFootprintCalculator::new(series_2024()));
    let bundle = FootprintEngine::new(pipeline).run().await?;

    assert!(bundle.ends_with("carbon_footprint.zip"));
    let zip_path = std::path::Path::new(&output_path).join("carbon_footprint.zip");
    assert!(zip_path.exists());

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(std::fs::read(&zip_path)?))?;
    assert!(archive.by_name("scope2_daily.csv").is_err());

    let result: serde_json::Value = serde_json::from_str(&read_entry(&mut archive, "result.json"))?;
    assert_eq!(result["scope1"]["total"], 264.0);
    assert_eq!(result["scope2"]["total"], 792.1);
    assert_eq!(result["total_emissions"], 1056.1);
    assert_eq!(result["product_footprint"], 1.0561);
    assert_eq!(result["scope2"]["details"][0]["method"], "annual_total");
    assert!(result["cbam_result"]["total_tax_cny"].as_f64().unwrap() > 0.0);

    let heatmap = read_entry(&mut archive, "heatmap.csv");
    assert_eq!(heatmap.lines().count(), 1 + 31 * 6);
    assert!(heatmap.starts_with("date,region,carbon_factor,level,level_zh"));

    let report = read_entry(&mut archive, "report.txt");
    assert!(report.contains("华东钢铁有限公司"));
    assert!(report.contains("光伏自发自用"));

    let scenarios: serde_json::Value =
        serde_json::from_str(&read_entry(&mut archive, "scenarios.json"))?;
    assert_eq!(scenarios.as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_missing_request_file_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let config = CliConfig::parse_from([
        "carbon-footprint",
        "--input",
        "definitely-missing.toml",
        "--output-path",
        output_path.as_str(),
    ]);

    let pipeline = FootprintPipeline::new(
        LocalStorage::new(output_path.clone()),
        config,
        CarbonFootprintCalculator::new(series_2024()),
    );
    assert!(FootprintEngine::new(pipeline).run().await.is_err());
    assert!(!temp_dir.path().join("carbon_footprint.zip").exists());
    Ok(())
}

#[test]
fn test_series_fixture_seed_42() {
    let a = series_2024();
    let b = series_2024();

    assert_eq!(a.len(), 366);
    assert_eq!(
        a.point_factor("2024-06-15", ConfidenceLevel::Medium),
        b.point_factor("2024-06-15", ConfidenceLevel::Medium)
    );
    assert_eq!(a.point_factor("not-a-date", ConfidenceLevel::Medium), 0.8);
    assert_eq!(a.point_factor("2030-01-01", ConfidenceLevel::Medium), 0.8);

    let low = a.yearly_average(ConfidenceLevel::Low);
    let medium = a.yearly_average(ConfidenceLevel::Medium);
    let high = a.yearly_average(ConfidenceLevel::High);
    assert!(high < medium && medium < low);
}
