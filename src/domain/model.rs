use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One of the three parallel carbon-intensity estimation curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Strict parse. Accepts `low`/`medium`/`high` in any case.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(ConfidenceLevel::Low),
            "medium" => Some(ConfidenceLevel::Medium),
            "high" => Some(ConfidenceLevel::High),
            _ => None,
        }
    }

    /// Lenient parse: anything unrecognised (including an empty string) is `Medium`.
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display bucket for a raw carbon factor, ordered from cleanest to dirtiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarbonLevel {
    VeryClean,
    Clean,
    Moderate,
    Elevated,
    High,
}

impl CarbonLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarbonLevel::VeryClean => "very_clean",
            CarbonLevel::Clean => "clean",
            CarbonLevel::Moderate => "moderate",
            CarbonLevel::Elevated => "elevated",
            CarbonLevel::High => "high",
        }
    }

    /// 報告與熱力圖使用的中文標籤
    pub fn display_zh(&self) -> &'static str {
        match self {
            CarbonLevel::VeryClean => "非常清洁",
            CarbonLevel::Clean => "清洁",
            CarbonLevel::Moderate => "中等",
            CarbonLevel::Elevated => "较高",
            CarbonLevel::High => "很高",
        }
    }
}

impl std::fmt::Display for CarbonLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyCarbonRecord {
    pub date: NaiveDate,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl DailyCarbonRecord {
    pub fn band(&self, level: ConfidenceLevel) -> f64 {
        match level {
            ConfidenceLevel::Low => self.low,
            ConfidenceLevel::Medium => self.medium,
            ConfidenceLevel::High => self.high,
        }
    }
}

// ---- calculation input ----

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelConsumption {
    pub fuel_type: String,
    pub consumption: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyConsumption {
    pub date: String,
    pub consumption_kwh: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ElectricityUsage {
    Annual {
        kwh: f64,
    },
    Daily(Vec<DailyConsumption>),
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElectricityInput {
    pub usage: ElectricityUsage,
    pub region: String,
    pub confidence_level: ConfidenceLevel,
    pub use_dynamic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionData {
    pub product_name: String,
    pub output: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub product: String,
    pub export_volume: f64,
    pub unit: String,
}

/// CBAM 計價參數，價格皆以歐元/噸 CO2 計
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CbamPricing {
    pub eu_carbon_price: f64,
    pub china_carbon_price: f64,
    pub free_allowance_rate: f64,
    pub exchange_rate: f64,
}

impl Default for CbamPricing {
    fn default() -> Self {
        Self {
            eu_carbon_price: 80.0,
            china_carbon_price: 60.0,
            free_allowance_rate: 0.1,
            exchange_rate: 7.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapSettings {
    pub start_date: NaiveDate,
    pub days: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FootprintRequest {
    pub company: CompanyInfo,
    pub fuels: Vec<FuelConsumption>,
    pub electricity: ElectricityInput,
    pub production: ProductionData,
    pub export: Option<ExportData>,
    pub pricing: CbamPricing,
    pub heatmap: Option<HeatmapSettings>,
    pub scenarios: Vec<String>,
    pub scenario_seed: u64,
    pub recommendations: Option<String>,
}

// ---- calculation output ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope1Detail {
    pub fuel_type: String,
    pub consumption: f64,
    pub unit: String,
    pub emission_factor: f64,
    pub emissions_ton: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope1Result {
    pub total: f64,
    pub details: Vec<Scope1Detail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Scope2Detail {
    AnnualTotal {
        consumption_kwh: f64,
        carbon_factor: f64,
        emissions_ton: f64,
    },
    Daily {
        date: String,
        consumption_kwh: f64,
        carbon_factor: f64,
        emissions_ton: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope2Result {
    pub total: f64,
    pub details: Vec<Scope2Detail>,
    pub use_dynamic: bool,
    pub confidence_level: ConfidenceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbamResult {
    pub export_product: String,
    pub product_carbon_intensity: f64,
    pub export_volume: f64,
    pub export_unit: String,
    pub eu_carbon_price_eur: f64,
    pub china_carbon_price_eur: f64,
    /// Percentage, e.g. `10.0` for a 0.1 rate.
    pub free_allowance_rate: f64,
    pub tax_per_unit_eur: f64,
    pub total_tax_eur: f64,
    pub total_tax_cny: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintResult {
    pub company_info: CompanyInfo,
    pub scope1: Scope1Result,
    pub scope2: Scope2Result,
    pub total_emissions: f64,
    pub product_footprint: f64,
    pub production_data: ProductionData,
    pub cbam_result: Option<CbamResult>,
    pub calculation_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: String,
    pub region: String,
    pub carbon_factor: f64,
    pub level: CarbonLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub emissions_reduction: f64,
    pub cbam_tax_saving: f64,
    pub roi_years: f64,
}

/// Everything one run produces, handed from the calculate phase to publishing.
#[derive(Debug, Clone)]
pub struct CalculationOutcome {
    pub footprint: FootprintResult,
    pub heatmap: Vec<HeatmapCell>,
    pub scenarios: Vec<ScenarioResult>,
    pub recommendations: Option<String>,
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_level_lenient_parse() {
        assert_eq!(ConfidenceLevel::from_label("low"), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_label("HIGH"), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_label("unknown_level"), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_label(""), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::parse("unknown_level"), None);
    }

    #[test]
    fn test_carbon_level_serializes_snake_case() {
        let json = serde_json::to_string(&CarbonLevel::VeryClean).unwrap();
        assert_eq!(json, "\"very_clean\"");
        assert_eq!(CarbonLevel::Elevated.display_zh(), "较高");
    }

    #[test]
    fn test_scope2_detail_is_tagged_by_method() {
        let detail = Scope2Detail::AnnualTotal {
            consumption_kwh: 1000.0,
            carbon_factor: 0.8,
            emissions_ton: 0.8,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["method"], "annual_total");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.79214, 4), 0.7921);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }
}
