//! CLI argument definitions using clap
//!
//! Commands:
//! - directdict get --config <path> --attribute <name> --keys <k,...>
//! - directdict has --config <path> --keys <k,...>
//! - directdict is-in --config <path> --child <k,...> --ancestor <k,...>
//! - directdict ids --config <path>
//! - directdict dump --config <path>
//! - directdict info --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// directdict - query an external dictionary straight from its source
#[derive(Parser, Debug)]
#[command(name = "directdict")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up one attribute for a list of keys
    Get {
        /// Path to configuration file
        #[arg(long, default_value = "./dictionary.json")]
        config: PathBuf,

        /// Attribute to read
        #[arg(long)]
        attribute: String,

        /// Comma-separated keys
        #[arg(long, value_delimiter = ',', required = true)]
        keys: Vec<u64>,

        /// Value for keys not found (JSON, or a bare string)
        #[arg(long)]
        default: Option<String>,
    },

    /// Check which keys exist in the source
    Has {
        /// Path to configuration file
        #[arg(long, default_value = "./dictionary.json")]
        config: PathBuf,

        /// Comma-separated keys
        #[arg(long, value_delimiter = ',', required = true)]
        keys: Vec<u64>,
    },

    /// Check ancestry through the hierarchical attribute
    IsIn {
        /// Path to configuration file
        #[arg(long, default_value = "./dictionary.json")]
        config: PathBuf,

        /// Comma-separated child keys
        #[arg(long, value_delimiter = ',', required = true)]
        child: Vec<u64>,

        /// Comma-separated ancestor keys
        #[arg(long, value_delimiter = ',', required = true)]
        ancestor: Vec<u64>,
    },

    /// List every key in scan order
    Ids {
        /// Path to configuration file
        #[arg(long, default_value = "./dictionary.json")]
        config: PathBuf,
    },

    /// Export all rows as blocks
    Dump {
        /// Path to configuration file
        #[arg(long, default_value = "./dictionary.json")]
        config: PathBuf,

        /// Comma-separated columns (default: key column and all attributes)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Maximum rows per block
        #[arg(long, default_value_t = 8192)]
        max_block_size: usize,
    },

    /// Show structure and counters
    Info {
        /// Path to configuration file
        #[arg(long, default_value = "./dictionary.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_with_key_list() {
        let cli = Cli::try_parse_from([
            "directdict",
            "get",
            "--config",
            "geo.json",
            "--attribute",
            "region",
            "--keys",
            "1,2,9",
        ])
        .unwrap();

        match cli.command {
            Command::Get {
                config,
                attribute,
                keys,
                default,
            } => {
                assert_eq!(config, PathBuf::from("geo.json"));
                assert_eq!(attribute, "region");
                assert_eq!(keys, vec![1, 2, 9]);
                assert!(default.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_is_in_and_dump_defaults() {
        let cli =
            Cli::try_parse_from(["directdict", "is-in", "--child", "2,3", "--ancestor", "1"]).unwrap();
        assert!(matches!(cli.command, Command::IsIn { ref ancestor, .. } if ancestor == &[1]));

        let cli = Cli::try_parse_from(["directdict", "dump"]).unwrap();
        match cli.command {
            Command::Dump {
                config,
                columns,
                max_block_size,
            } => {
                assert_eq!(config, PathBuf::from("./dictionary.json"));
                assert!(columns.is_empty());
                assert_eq!(max_block_size, 8192);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_numeric_keys() {
        assert!(Cli::try_parse_from(["directdict", "has", "--keys", "1,x"]).is_err());
    }
}
