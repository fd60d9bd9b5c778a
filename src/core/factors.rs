//! Static emission-factor, grid-factor and carbon-price tables.

use serde::Serialize;

/// Used for grid regions missing from the table.
pub const DEFAULT_GRID_FACTOR: f64 = 0.8;

pub const DEFAULT_REGION: &str = "华东区域电网";

#[derive(Debug, Clone, Serialize)]
pub struct FuelFactor {
    pub slug: &'static str,
    pub name: &'static str,
    /// t CO2 per unit of fuel
    pub factor: f64,
    pub unit: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarbonPrice {
    pub market: &'static str,
    pub price: f64,
    pub currency: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndustryBenchmark {
    pub industry: &'static str,
    pub product: &'static str,
    pub energy_intensity: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmissionFactorDatabase {
    fuel_factors: Vec<FuelFactor>,
    /// kg CO2 per kWh
    grid_factors: Vec<(&'static str, f64)>,
    carbon_prices: Vec<CarbonPrice>,
    industry_benchmarks: Vec<IndustryBenchmark>,
}

impl Default for EmissionFactorDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl EmissionFactorDatabase {
    pub fn new() -> Self {
        let fuel = |slug: &'static str, name: &'static str, factor: f64, unit: &'static str| FuelFactor {
            slug,
            name,
            factor,
            unit,
            source: "IPCC 2006",
        };
        let benchmark = |industry: &'static str,
                         product: &'static str,
                         energy_intensity: f64,
                         unit: &'static str| IndustryBenchmark {
            industry,
            product,
            energy_intensity,
            unit,
        };

        Self {
            fuel_factors: vec![
                fuel("coal", "燃煤", 2.64, "吨CO2/吨煤"),
                fuel("natural_gas", "天然气", 2.16, "吨CO2/吨标准煤"),
                fuel("gasoline", "汽油", 2.93, "吨CO2/吨"),
                fuel("diesel", "柴油", 3.10, "吨CO2/吨"),
                fuel("fuel_oil", "燃料油", 3.24, "吨CO2/吨"),
                fuel("lpg", "液化石油气", 3.03, "吨CO2/吨"),
            ],
            // 2024 區域電網平均排放因子
            grid_factors: vec![
                ("华北区域电网", 0.9419),
                ("东北区域电网", 1.0821),
                ("华东区域电网", 0.7921),
                ("华中区域电网", 0.8587),
                ("西北区域电网", 0.9428),
                ("南方区域电网", 0.8042),
                ("北京", 0.7921),
                ("上海", 0.7921),
                ("江苏", 0.7921),
                ("浙江", 0.7921),
                ("广东", 0.8042),
                ("山东", 0.9419),
            ],
            carbon_prices: vec![
                CarbonPrice {
                    market: "中国碳配额(CEA)",
                    price: 60.0,
                    currency: "CNY",
                },
                CarbonPrice {
                    market: "中国核证减排量(CCER)",
                    price: 40.0,
                    currency: "CNY",
                },
                CarbonPrice {
                    market: "欧盟碳配额(EUA)",
                    price: 80.0,
                    currency: "EUR",
                },
            ],
            industry_benchmarks: vec![
                benchmark("钢铁", "螺纹钢", 570.0, "kgce/吨"),
                benchmark("钢铁", "热轧板", 620.0, "kgce/吨"),
                benchmark("水泥", "水泥熟料", 110.0, "kgce/吨"),
                benchmark("水泥", "普通硅酸盐水泥", 90.0, "kgce/吨"),
                benchmark("电解铝", "原铝", 13500.0, "kWh/吨"),
                benchmark("化肥", "尿素", 1.2, "吨标准煤/吨"),
                benchmark("化肥", "合成氨", 1.5, "吨标准煤/吨"),
            ],
        }
    }

    /// Look up a fuel by slug (`coal`) or by its Chinese name (`燃煤`).
    pub fn fuel_factor(&self, fuel_type: &str) -> Option<&FuelFactor> {
        let key = fuel_type.trim();
        self.fuel_factors
            .iter()
            .find(|f| f.slug.eq_ignore_ascii_case(key) || f.name == key)
    }

    pub fn grid_factor(&self, region: &str) -> Option<f64> {
        self.grid_factors
            .iter()
            .find(|(name, _)| *name == region.trim())
            .map(|(_, factor)| *factor)
    }

    /// Grid factor, or [`DEFAULT_GRID_FACTOR`] for unknown regions.
    pub fn grid_factor_or_default(&self, region: &str) -> f64 {
        self.grid_factor(region).unwrap_or(DEFAULT_GRID_FACTOR)
    }

    pub fn regions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.grid_factors.iter().map(|(name, _)| *name)
    }

    pub fn benchmarks_for(&self, industry: &str) -> Vec<&IndustryBenchmark> {
        self.industry_benchmarks
            .iter()
            .filter(|b| b.industry == industry)
            .collect()
    }

    pub fn to_json_pretty(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
