use crate::core::BatchConfig;
use clap::Parser;
use std::path::PathBuf;

/// Ingest fixed-width sales order files and print the aggregated summary
#[derive(Parser, Debug)]
#[command(name = "sales-order-engine")]
#[command(
    about = "Ingest fixed-width sales order files and print the aggregated summary",
    long_about = None
)]
pub struct CliArgs {
    /// Input TXT file path containing fixed-width order records
    #[arg(value_name = "INPUT", help = "Path to the input TXT file")]
    pub input_file: PathBuf,

    /// Number of records per insert batch
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per insert batch (default: 2000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of batches written concurrently per wave
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of batches written concurrently (default: 5)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Pretty-print the JSON summary
    #[arg(long, help = "Pretty-print the JSON summary")]
    pub pretty: bool,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Uses the provided values where given and falls back to defaults
    /// otherwise; zero values fall back with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_batches
                .unwrap_or(default.max_concurrent_batches),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::batch_size(&["program", "--batch-size", "500", "orders.txt"], Some(500), None)]
    #[case::max_concurrent(&["program", "--max-concurrent", "8", "orders.txt"], None, Some(8))]
    #[case::no_options(&["program", "orders.txt"], None, None)]
    #[case::all_options(
        &["program", "--batch-size", "500", "--max-concurrent", "8", "orders.txt"],
        Some(500),
        Some(8)
    )]
    fn test_config_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent_batches, max_concurrent);
    }

    #[rstest]
    #[case::all_defaults(&["program", "orders.txt"], 2000, 5)]
    #[case::custom_batch_size(&["program", "--batch-size", "500", "orders.txt"], 500, 5)]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "orders.txt"], 2000, 8)]
    #[case::zero_falls_back(&["program", "--batch-size", "0", "orders.txt"], 2000, 5)]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[test]
    fn test_pretty_flag() {
        let parsed = CliArgs::try_parse_from(["program", "--pretty", "orders.txt"]).unwrap();
        assert!(parsed.pretty);

        let parsed = CliArgs::try_parse_from(["program", "orders.txt"]).unwrap();
        assert!(!parsed.pretty);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        assert!(CliArgs::try_parse_from(["program"]).is_err());
    }
}
