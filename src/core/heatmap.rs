use crate::core::factors::EmissionFactorDatabase;
use crate::core::series::level_label;
use crate::domain::model::{round_to, HeatmapCell, HeatmapSettings};
use crate::utils::error::{CarbonError, Result};
use crate::utils::validation::validate_positive_number;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

pub const HEATMAP_REGIONS: [&str; 6] = ["北京", "上海", "江苏", "浙江", "广东", "山东"];

/// Region × day carbon-intensity grid built on top of the static grid factors.
pub struct HeatmapGenerator<'a> {
    db: &'a EmissionFactorDatabase,
    regions: Vec<String>,
}

impl<'a> HeatmapGenerator<'a> {
    pub fn new(db: &'a EmissionFactorDatabase) -> Self {
        Self {
            db,
            regions: HEATMAP_REGIONS.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn with_regions(db: &'a EmissionFactorDatabase, regions: Vec<String>) -> Self {
        Self { db, regions }
    }

    /// Cells are produced date-major, regions in configured order; the noise
    /// stream is consumed in that same order.
    pub fn generate(&self, settings: &HeatmapSettings) -> Result<Vec<HeatmapCell>> {
        validate_positive_number("heatmap.days", settings.days, 1)?;

        let noise = Normal::new(0.0, 0.1).map_err(|e| CarbonError::ConfigError {
            message: format!("invalid heatmap noise distribution: {}", e),
        })?;
        let mut rng = StdRng::seed_from_u64(settings.seed);

        let mut cells = Vec::with_capacity(settings.days * self.regions.len());
        for date in settings.start_date.iter_days().take(settings.days) {
            let seasonal = 0.2 * (2.0 * PI * date.ordinal() as f64 / 365.0).sin();
            let weekday = weekday_effect(date);

            for region in &self.regions {
                let base = self.db.grid_factor_or_default(region);
                let random = noise.sample(&mut rng);
                let factor = base * (1.0 + 0.6 * seasonal + 0.3 * weekday + 0.1 * random);

                cells.push(HeatmapCell {
                    date: date.format("%Y-%m-%d").to_string(),
                    region: region.clone(),
                    carbon_factor: round_to(factor, 4),
                    level: level_label(factor),
                });
            }
        }

        tracing::debug!(
            "Generated {} heatmap cells ({} days x {} regions)",
            cells.len(),
            settings.days,
            self.regions.len()
        );
        Ok(cells)
    }
}

fn weekday_effect(date: NaiveDate) -> f64 {
    if date.weekday().num_days_from_monday() < 5 {
        0.1
    } else {
        -0.05
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(days: usize, seed: u64) -> HeatmapSettings {
        HeatmapSettings {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            days,
            seed,
        }
    }

    #[test]
    fn test_one_cell_per_region_per_day() {
        let db = EmissionFactorDatabase::new();
        let cells = HeatmapGenerator::new(&db).generate(&settings(30, 42)).unwrap();
        assert_eq!(cells.len(), 30 * HEATMAP_REGIONS.len());
        assert_eq!(cells[0].date, "2024-01-01");
        assert_eq!(cells[0].region, "北京");
        assert_eq!(cells[6].date, "2024-01-02");
        assert_eq!(cells.last().unwrap().date, "2024-01-30");
    }

    #[test]
    fn test_same_seed_same_grid() {
        let db = EmissionFactorDatabase::new();
        let generator = HeatmapGenerator::new(&db);
        assert_eq!(
            generator.generate(&settings(14, 9)).unwrap(),
            generator.generate(&settings(14, 9)).unwrap()
        );
        assert_ne!(
            generator.generate(&settings(14, 9)).unwrap(),
            generator.generate(&settings(14, 10)).unwrap()
        );
    }

    #[test]
    fn test_levels_match_rounded_factor_buckets() {
        let db = EmissionFactorDatabase::new();
        let cells = HeatmapGenerator::new(&db).generate(&settings(365, 42)).unwrap();
        for cell in &cells {
            // rounding to 4 places can only move a value across a bucket edge by < 1e-4
            let label = level_label(cell.carbon_factor);
            let nudged = [
                level_label(cell.carbon_factor - 1e-4),
                level_label(cell.carbon_factor + 1e-4),
            ];
            assert!(cell.level == label || nudged.contains(&cell.level));
        }
    }

    #[test]
    fn test_zero_days_rejected() {
        let db = EmissionFactorDatabase::new();
        assert!(HeatmapGenerator::new(&db).generate(&settings(0, 42)).is_err());
    }

    #[test]
    fn test_custom_regions() {
        let db = EmissionFactorDatabase::new();
        let generator = HeatmapGenerator::with_regions(&db, vec!["东北区域电网".to_string()]);
        let cells = generator.generate(&settings(3, 1)).unwrap();
        assert_eq!(cells.len(), 3);
        assert!(cells.iter().all(|c| c.region == "东北区域电网"));
    }
}
