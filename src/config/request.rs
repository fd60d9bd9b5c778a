use crate::core::factors::DEFAULT_REGION;
use crate::core::series::DEFAULT_SEED;
use crate::domain::model::{
    CbamPricing, CompanyInfo, ConfidenceLevel, DailyConsumption, ElectricityInput,
    ElectricityUsage, ExportData, FootprintRequest, FuelConsumption, HeatmapSettings,
    ProductionData,
};
use crate::utils::error::{CarbonError, Result};
use crate::utils::validation::{
    validate_date, validate_non_empty_string, validate_non_negative, validate_positive_number,
    validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_UNIT: &str = "吨";
const DEFAULT_HEATMAP_START: &str = "2024-01-01";
const DEFAULT_HEATMAP_DAYS: usize = 365;

/// 碳足跡計算請求 (TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    pub company: CompanySection,
    #[serde(default)]
    pub fuel: Vec<FuelSection>,
    pub electricity: Option<ElectricitySection>,
    pub production: Option<ProductionSection>,
    pub export: Option<ExportSection>,
    pub cbam: Option<CbamSection>,
    pub heatmap: Option<HeatmapSection>,
    pub scenarios: Option<ScenariosSection>,
    pub report: Option<ReportSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySection {
    pub name: String,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelSection {
    pub fuel_type: String,
    pub consumption: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricitySection {
    pub region: Option<String>,
    pub confidence_level: Option<String>,
    pub use_dynamic: Option<bool>,
    pub annual_consumption_kwh: Option<f64>,
    pub daily: Option<Vec<DailySection>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySection {
    pub date: String,
    pub consumption_kwh: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionSection {
    pub product_name: Option<String>,
    pub output: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    pub product: Option<String>,
    pub export_volume: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CbamSection {
    pub eu_carbon_price: Option<f64>,
    pub china_carbon_price: Option<f64>,
    pub free_allowance_rate: Option<f64>,
    pub exchange_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapSection {
    pub enabled: Option<bool>,
    pub start_date: Option<String>,
    pub days: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenariosSection {
    pub seed: Option<u64>,
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub recommendations: Option<String>,
}

impl RequestConfig {
    /// 從 TOML 檔案載入請求
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CarbonError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析請求
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CarbonError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COMPANY_NAME})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CarbonError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證請求內容的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("company.name", &self.company.name)?;

        for (i, fuel) in self.fuel.iter().enumerate() {
            validate_non_negative(&format!("fuel[{}].consumption", i), fuel.consumption)?;
        }

        if let Some(electricity) = &self.electricity {
            if let Some(kwh) = electricity.annual_consumption_kwh {
                validate_non_negative("electricity.annual_consumption_kwh", kwh)?;
            }
            for (i, day) in electricity.daily.iter().flatten().enumerate() {
                validate_non_negative(
                    &format!("electricity.daily[{}].consumption_kwh", i),
                    day.consumption_kwh,
                )?;
            }
        }

        if let Some(output) = self.production.as_ref().and_then(|p| p.output) {
            validate_non_negative("production.output", output)?;
        }

        if let Some(export) = &self.export {
            validate_non_negative("export.export_volume", export.export_volume)?;
        }

        let pricing = self.pricing();
        validate_non_negative("cbam.eu_carbon_price", pricing.eu_carbon_price)?;
        validate_non_negative("cbam.china_carbon_price", pricing.china_carbon_price)?;
        validate_range(
            "cbam.free_allowance_rate",
            pricing.free_allowance_rate,
            0.0,
            1.0,
        )?;
        validate_non_negative("cbam.exchange_rate", pricing.exchange_rate)?;

        if let Some(heatmap) = &self.heatmap {
            if let Some(days) = heatmap.days {
                validate_positive_number("heatmap.days", days, 1)?;
            }
            if let Some(start) = &heatmap.start_date {
                validate_date("heatmap.start_date", start)?;
            }
        }

        Ok(())
    }

    pub fn pricing(&self) -> CbamPricing {
        let defaults = CbamPricing::default();
        match &self.cbam {
            Some(cbam) => CbamPricing {
                eu_carbon_price: cbam.eu_carbon_price.unwrap_or(defaults.eu_carbon_price),
                china_carbon_price: cbam
                    .china_carbon_price
                    .unwrap_or(defaults.china_carbon_price),
                free_allowance_rate: cbam
                    .free_allowance_rate
                    .unwrap_or(defaults.free_allowance_rate),
                exchange_rate: cbam.exchange_rate.unwrap_or(defaults.exchange_rate),
            },
            None => defaults,
        }
    }

    /// 年度總量優先於日級數據
    fn electricity_input(&self) -> ElectricityInput {
        let Some(section) = &self.electricity else {
            return ElectricityInput {
                usage: ElectricityUsage::None,
                region: DEFAULT_REGION.to_string(),
                confidence_level: ConfidenceLevel::default(),
                use_dynamic: true,
            };
        };

        let usage = match (section.annual_consumption_kwh, &section.daily) {
            (Some(kwh), _) => ElectricityUsage::Annual { kwh },
            (None, Some(days)) => ElectricityUsage::Daily(
                days.iter()
                    .map(|d| DailyConsumption {
                        date: d.date.clone(),
                        consumption_kwh: d.consumption_kwh,
                    })
                    .collect(),
            ),
            (None, None) => ElectricityUsage::None,
        };

        let label = section.confidence_level.as_deref().unwrap_or("medium");
        if ConfidenceLevel::parse(label).is_none() {
            tracing::warn!(
                "Unknown confidence level '{}', falling back to medium",
                label
            );
        }

        ElectricityInput {
            usage,
            region: section
                .region
                .clone()
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            confidence_level: ConfidenceLevel::from_label(label),
            use_dynamic: section.use_dynamic.unwrap_or(true),
        }
    }

    fn heatmap_settings(&self) -> Result<Option<HeatmapSettings>> {
        let Some(section) = &self.heatmap else {
            return Ok(None);
        };
        if !section.enabled.unwrap_or(true) {
            return Ok(None);
        }

        let start = section
            .start_date
            .as_deref()
            .unwrap_or(DEFAULT_HEATMAP_START);
        Ok(Some(HeatmapSettings {
            start_date: validate_date("heatmap.start_date", start)?,
            days: section.days.unwrap_or(DEFAULT_HEATMAP_DAYS),
            seed: section.seed.unwrap_or(DEFAULT_SEED),
        }))
    }

    /// Validate and convert into the calculator's input.
    pub fn to_request(&self) -> Result<FootprintRequest> {
        self.validate_config()?;

        let production = match &self.production {
            Some(p) => ProductionData {
                product_name: p.product_name.clone().unwrap_or_default(),
                output: p.output.unwrap_or(1.0),
                unit: p.unit.clone().unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            },
            None => ProductionData {
                product_name: String::new(),
                output: 1.0,
                unit: DEFAULT_UNIT.to_string(),
            },
        };

        let export = self.export.as_ref().map(|e| ExportData {
            product: e
                .product
                .clone()
                .unwrap_or_else(|| production.product_name.clone()),
            export_volume: e.export_volume,
            unit: e.unit.clone().unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        });

        Ok(FootprintRequest {
            company: CompanyInfo {
                name: self.company.name.clone(),
                industry: self.company.industry.clone(),
            },
            fuels: self
                .fuel
                .iter()
                .map(|f| FuelConsumption {
                    fuel_type: f.fuel_type.clone(),
                    consumption: f.consumption,
                    unit: f.unit.clone().unwrap_or_else(|| DEFAULT_UNIT.to_string()),
                })
                .collect(),
            electricity: self.electricity_input(),
            production,
            export,
            pricing: self.pricing(),
            heatmap: self.heatmap_settings()?,
            scenarios: self
                .scenarios
                .as_ref()
                .map(|s| s.names.clone())
                .unwrap_or_default(),
            scenario_seed: self
                .scenarios
                .as_ref()
                .and_then(|s| s.seed)
                .unwrap_or(DEFAULT_SEED),
            recommendations: self.report.as_ref().and_then(|r| r.recommendations.clone()),
        })
    }
}

impl Validate for RequestConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_REQUEST: &str = r#"
[company]
name = "华东钢铁"
industry = "钢铁"

[[fuel]]
fuel_type = "燃煤"
consumption = 100.0

[[fuel]]
fuel_type = "diesel"
consumption = 12.5
unit = "吨"

[electricity]
region = "江苏"
confidence_level = "high"
use_dynamic = true
annual_consumption_kwh = 1000000.0

[production]
product_name = "螺纹钢"
output = 1000.0

[export]
export_volume = 200.0

[cbam]
eu_carbon_price = 85.0

[heatmap]
start_date = "2024-03-01"
days = 10
seed = 7

[scenarios]
seed = 11
names = ["光伏自发自用", "余热回收"]

[report]
recommendations = "优先推进电炉短流程改造"
"#;

    #[test]
    fn test_parse_full_request() {
        let config = RequestConfig::from_toml_str(FULL_REQUEST).unwrap();
        let request = config.to_request().unwrap();

        assert_eq!(request.company.name, "华东钢铁");
        assert_eq!(request.fuels.len(), 2);
        assert_eq!(request.fuels[0].unit, "吨");
        assert_eq!(request.electricity.region, "江苏");
        assert_eq!(request.electricity.confidence_level, ConfidenceLevel::High);
        assert_eq!(
            request.electricity.usage,
            ElectricityUsage::Annual { kwh: 1_000_000.0 }
        );
        assert_eq!(request.export.as_ref().unwrap().product, "螺纹钢");
        assert_eq!(request.pricing.eu_carbon_price, 85.0);
        assert_eq!(request.pricing.china_carbon_price, 60.0);
        let heatmap = request.heatmap.unwrap();
        assert_eq!(heatmap.days, 10);
        assert_eq!(heatmap.seed, 7);
        assert_eq!(request.scenarios.len(), 2);
        assert_eq!(request.scenario_seed, 11);
        assert!(request.recommendations.is_some());
    }

    #[test]
    fn test_minimal_request_defaults() {
        let config = RequestConfig::from_toml_str(
            r#"
[company]
name = "小厂"
"#,
        )
        .unwrap();
        let request = config.to_request().unwrap();

        assert!(request.fuels.is_empty());
        assert_eq!(request.electricity.usage, ElectricityUsage::None);
        assert_eq!(request.electricity.region, DEFAULT_REGION);
        assert!(request.electricity.use_dynamic);
        assert_eq!(request.production.output, 1.0);
        assert!(request.export.is_none());
        assert!(request.heatmap.is_none());
        assert_eq!(request.pricing, CbamPricing::default());
    }

    #[test]
    fn test_daily_usage_and_unknown_level() {
        let config = RequestConfig::from_toml_str(
            r#"
[company]
name = "测试"

[electricity]
confidence_level = "very_sure"

[[electricity.daily]]
date = "2024-01-02"
consumption_kwh = 5000.0

[[electricity.daily]]
date = "not-a-date"
consumption_kwh = 100.0
"#,
        )
        .unwrap();
        let request = config.to_request().unwrap();

        assert_eq!(request.electricity.confidence_level, ConfidenceLevel::Medium);
        match request.electricity.usage {
            ElectricityUsage::Daily(days) => {
                assert_eq!(days.len(), 2);
                assert_eq!(days[1].date, "not-a-date");
            }
            other => panic!("expected daily usage, got {:?}", other),
        }
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_CARBON_COMPANY", "环境变量公司");

        let config = RequestConfig::from_toml_str(
            r#"
[company]
name = "${TEST_CARBON_COMPANY}"
"#,
        )
        .unwrap();
        assert_eq!(config.company.name, "环境变量公司");

        std::env::remove_var("TEST_CARBON_COMPANY");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let negative = RequestConfig::from_toml_str(
            r#"
[company]
name = "测试"

[[fuel]]
fuel_type = "燃煤"
consumption = -5.0
"#,
        )
        .unwrap();
        assert!(negative.validate().is_err());

        let bad_allowance = RequestConfig::from_toml_str(
            r#"
[company]
name = "测试"

[cbam]
free_allowance_rate = 1.5
"#,
        )
        .unwrap();
        assert!(bad_allowance.validate().is_err());

        let zero_days = RequestConfig::from_toml_str(
            r#"
[company]
name = "测试"

[heatmap]
days = 0
"#,
        )
        .unwrap();
        assert!(zero_days.to_request().is_err());

        let blank_name = RequestConfig::from_toml_str(
            r#"
[company]
name = "  "
"#,
        )
        .unwrap();
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_disabled_heatmap() {
        let config = RequestConfig::from_toml_str(
            r#"
[company]
name = "测试"

[heatmap]
enabled = false
days = 30
"#,
        )
        .unwrap();
        assert!(config.to_request().unwrap().heatmap.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(RequestConfig::from_toml_str("[company\nname = 1").is_err());
    }

    #[test]
    fn test_request_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(FULL_REQUEST.as_bytes()).unwrap();

        let config = RequestConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.company.industry.as_deref(), Some("钢铁"));
    }
}
