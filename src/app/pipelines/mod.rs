pub mod footprint_pipeline;
