use crate::domain::model::{CalculationOutcome, ConfidenceLevel, FootprintRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of daily grid carbon factors consumed by the Scope 2 aggregator.
///
/// Implementations must be total: a query never fails and always yields a usable number.
pub trait CarbonFactorSource: Send + Sync {
    fn point_factor(&self, date: &str, level: ConfidenceLevel) -> f64;
    fn yearly_average(&self, level: ConfidenceLevel) -> f64;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn bundle_name(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn collect(&self) -> Result<FootprintRequest>;
    async fn calculate(&self, request: FootprintRequest) -> Result<CalculationOutcome>;
    async fn publish(&self, outcome: CalculationOutcome) -> Result<String>;
}
