use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct FootprintEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> FootprintEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting carbon footprint calculation...");

        // Collect
        tracing::info!("Loading calculation request...");
        let request = self.pipeline.collect().await?;
        tracing::info!(
            "Loaded request for '{}': {} fuel lines",
            request.company.name,
            request.fuels.len()
        );

        // Calculate
        tracing::info!("Calculating emissions...");
        let outcome = self.pipeline.calculate(request).await?;
        tracing::info!(
            "Total emissions: {} t CO2 (Scope 1 {} t, Scope 2 {} t)",
            outcome.footprint.total_emissions,
            outcome.footprint.scope1.total,
            outcome.footprint.scope2.total
        );

        // Publish
        tracing::info!("Writing output bundle...");
        let output_path = self.pipeline.publish(outcome).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
