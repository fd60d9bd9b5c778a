pub mod cli;
pub mod request;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::core::series::DEFAULT_SEED;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_date, validate_date_range, validate_non_empty_string, validate_path, Validate,
    };
    use chrono::NaiveDate;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "carbon-footprint")]
    #[command(about = "Corporate carbon footprint and CBAM estimator")]
    pub struct CliConfig {
        /// Path to the TOML calculation request
        #[arg(short, long, default_value = "footprint.toml")]
        pub input: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, default_value = "carbon_footprint.zip")]
        pub bundle_name: String,

        /// Seed for the simulated daily carbon factor series
        #[arg(long, default_value_t = DEFAULT_SEED)]
        pub seed: u64,

        #[arg(long, default_value = "2024-01-01")]
        pub start_date: String,

        #[arg(long, default_value = "2024-12-31")]
        pub end_date: String,

        /// Print the static emission factor tables as JSON and exit
        #[arg(long)]
        pub list_factors: bool,

        /// Validate the request and print a summary without writing output
        #[arg(long)]
        pub dry_run: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn series_range(&self) -> Result<(NaiveDate, NaiveDate)> {
            let start = validate_date("start_date", &self.start_date)?;
            let end = validate_date("end_date", &self.end_date)?;
            validate_date_range("series", start, end)?;
            Ok((start, end))
        }
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn bundle_name(&self) -> &str {
            &self.bundle_name
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("input", &self.input)?;
            validate_path("output_path", &self.output_path)?;
            validate_non_empty_string("bundle_name", &self.bundle_name)?;
            self.series_range()?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults_parse() {
            let config = CliConfig::parse_from(["carbon-footprint"]);
            assert_eq!(config.seed, 42);
            assert_eq!(config.bundle_name, "carbon_footprint.zip");
            assert!(config.validate().is_ok());
            let (start, end) = config.series_range().unwrap();
            assert_eq!((end - start).num_days(), 365);
        }

        #[test]
        fn test_reversed_series_range_rejected() {
            let config = CliConfig::parse_from([
                "carbon-footprint",
                "--start-date",
                "2024-12-31",
                "--end-date",
                "2024-01-01",
            ]);
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_overrides() {
            let config = CliConfig::parse_from([
                "carbon-footprint",
                "-i",
                "req.toml",
                "--seed",
                "7",
                "--dry-run",
            ]);
            assert_eq!(config.input_path(), "req.toml");
            assert_eq!(config.seed, 7);
            assert!(config.dry_run);
        }
    }
}
