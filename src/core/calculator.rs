use crate::core::factors::EmissionFactorDatabase;
use crate::domain::model::{
    round_to, CbamPricing, CbamResult, ConfidenceLevel, ElectricityUsage, ExportData,
    FootprintRequest, FootprintResult, FuelConsumption, Scope1Detail, Scope1Result, Scope2Detail,
    Scope2Result,
};
use crate::domain::ports::CarbonFactorSource;
use crate::utils::error::{CarbonError, Result};

/// Scope 1 / Scope 2 aggregation and CBAM estimation.
///
/// The carbon factor source is injected at construction and only read afterwards.
pub struct CarbonFootprintCalculator<F: CarbonFactorSource> {
    db: EmissionFactorDatabase,
    factors: F,
}

impl<F: CarbonFactorSource> CarbonFootprintCalculator<F> {
    pub fn new(factors: F) -> Self {
        Self::with_database(EmissionFactorDatabase::new(), factors)
    }

    pub fn with_database(db: EmissionFactorDatabase, factors: F) -> Self {
        Self { db, factors }
    }

    pub fn database(&self) -> &EmissionFactorDatabase {
        &self.db
    }

    pub fn factors(&self) -> &F {
        &self.factors
    }

    pub fn scope1(&self, fuels: &[FuelConsumption]) -> Scope1Result {
        let mut details = Vec::new();
        let mut total = 0.0;

        for fuel in fuels {
            let Some(entry) = self.db.fuel_factor(&fuel.fuel_type) else {
                tracing::warn!("Unknown fuel type '{}', skipped", fuel.fuel_type);
                continue;
            };

            let emissions = fuel.consumption * entry.factor;
            total += emissions;

            details.push(Scope1Detail {
                fuel_type: fuel.fuel_type.clone(),
                consumption: round_to(fuel.consumption, 2),
                unit: fuel.unit.clone(),
                emission_factor: entry.factor,
                emissions_ton: round_to(emissions, 2),
            });
        }

        Scope1Result {
            total: round_to(total, 2),
            details,
        }
    }

    pub fn scope2(
        &self,
        usage: &ElectricityUsage,
        region: &str,
        level: ConfidenceLevel,
        use_dynamic: bool,
    ) -> Scope2Result {
        let mut details = Vec::new();
        let mut total = 0.0;

        match usage {
            ElectricityUsage::Annual { kwh } => {
                let factor = if use_dynamic {
                    self.factors.yearly_average(level)
                } else {
                    self.db.grid_factor_or_default(region)
                };
                // kWh * kg/kWh -> t
                let emissions = kwh * factor / 1000.0;
                total = emissions;

                details.push(Scope2Detail::AnnualTotal {
                    consumption_kwh: round_to(*kwh, 2),
                    carbon_factor: round_to(factor, 4),
                    emissions_ton: round_to(emissions, 2),
                });
            }
            ElectricityUsage::Daily(days) => {
                let static_factor = self.db.grid_factor_or_default(region);
                for day in days {
                    let factor = if use_dynamic {
                        self.factors.point_factor(&day.date, level)
                    } else {
                        static_factor
                    };
                    let emissions = day.consumption_kwh * factor / 1000.0;
                    total += emissions;

                    details.push(Scope2Detail::Daily {
                        date: day.date.clone(),
                        consumption_kwh: round_to(day.consumption_kwh, 2),
                        carbon_factor: round_to(factor, 4),
                        emissions_ton: round_to(emissions, 2),
                    });
                }
            }
            ElectricityUsage::None => {}
        }

        Scope2Result {
            total: round_to(total, 2),
            details,
            use_dynamic,
            confidence_level: level,
        }
    }

    pub fn cbam_tax(
        &self,
        product_footprint: f64,
        export: &ExportData,
        pricing: &CbamPricing,
    ) -> CbamResult {
        let tax_per_unit = if pricing.eu_carbon_price > pricing.china_carbon_price {
            (pricing.eu_carbon_price - pricing.china_carbon_price)
                * product_footprint
                * (1.0 - pricing.free_allowance_rate)
        } else {
            0.0
        };
        let total_tax = tax_per_unit * export.export_volume;

        CbamResult {
            export_product: export.product.clone(),
            product_carbon_intensity: round_to(product_footprint, 4),
            export_volume: export.export_volume,
            export_unit: export.unit.clone(),
            eu_carbon_price_eur: pricing.eu_carbon_price,
            china_carbon_price_eur: pricing.china_carbon_price,
            free_allowance_rate: round_to(pricing.free_allowance_rate * 100.0, 1),
            tax_per_unit_eur: round_to(tax_per_unit, 2),
            total_tax_eur: round_to(total_tax, 2),
            total_tax_cny: round_to(total_tax * pricing.exchange_rate, 2),
        }
    }

    pub fn calculate(&self, request: &FootprintRequest) -> Result<FootprintResult> {
        let scope1 = self.scope1(&request.fuels);
        let scope2 = self.scope2(
            &request.electricity.usage,
            &request.electricity.region,
            request.electricity.confidence_level,
            request.electricity.use_dynamic,
        );

        let total_emissions = scope1.total + scope2.total;
        if !total_emissions.is_finite() {
            return Err(CarbonError::CalculationError {
                message: format!("total emissions is not finite: {}", total_emissions),
            });
        }

        let output = request.production.output;
        let product_footprint = if output > 0.0 {
            total_emissions / output
        } else {
            0.0
        };

        let cbam_result = request
            .export
            .as_ref()
            .filter(|export| export.export_volume > 0.0)
            .map(|export| self.cbam_tax(product_footprint, export, &request.pricing));

        tracing::debug!(
            "Scope 1 {} t, Scope 2 {} t, product footprint {:.4} t/{}",
            scope1.total,
            scope2.total,
            product_footprint,
            request.production.unit
        );

        Ok(FootprintResult {
            company_info: request.company.clone(),
            scope1,
            scope2,
            total_emissions: round_to(total_emissions, 2),
            product_footprint: round_to(product_footprint, 4),
            production_data: request.production.clone(),
            cbam_result,
            calculation_time: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}
