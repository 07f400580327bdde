//! Command-line interface parsing for trendmart
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `Config` holding the data directory and the trend source to use.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use thiserror::Error;

use crate::data::{CatalogFileSource, NoTrendSource, TrendFetcher, TrendsClient};
use crate::store::Store;

/// Error types for CLI handling
#[derive(Debug, Error)]
pub enum CliError {
    /// No --data-dir given and no home directory to derive one from
    #[error("Could not determine a data directory; pass --data-dir")]
    NoDataDir,

    /// The product id is not in the current listing
    #[error("Unknown product: '{0}'")]
    UnknownProduct(String),
}

/// trendmart - Browse trending products and manage affiliate links
#[derive(Parser, Debug)]
#[command(name = "trendmart")]
#[command(about = "Trending product catalog with affiliate link management")]
#[command(version)]
pub struct Cli {
    /// Directory for cached research, settings and leads
    #[arg(long, global = true, env = "TRENDMART_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// URL of a JSON trend feed
    #[arg(long, global = true, env = "TRENDMART_SOURCE_URL", value_name = "URL")]
    pub source_url: Option<String>,

    /// Local JSON catalog file, used instead of --source-url when both are set
    #[arg(long, global = true, env = "TRENDMART_CATALOG", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List trending products
    List {
        /// Only show products whose name or niche contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Fetch fresh trends instead of using the cached research
        #[arg(long)]
        refresh: bool,
    },
    /// Show the landing view for one product
    Show {
        /// Product id
        id: String,
    },
    /// Record consent to receive offers for a product
    Lead {
        /// Product id
        id: String,
        /// Email address
        email: String,
    },
    /// Administrative commands
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum AdminCommand {
    /// Set a product's affiliate link (an empty link clears it)
    SetLink {
        /// Product id
        id: String,
        /// Link to send users to
        link: String,
    },
    /// Show or update global affiliate settings
    Settings(SettingsArgs),
    /// Force a refresh of trending products
    Sync,
    /// List captured leads
    Leads,
}

#[derive(Args, Debug, PartialEq)]
pub struct SettingsArgs {
    /// Prefix prepended to every base link
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Whether to apply the prefix (true/false)
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub auto_apply: Option<bool>,
}

impl SettingsArgs {
    /// Whether any setting was given on the command line
    pub fn has_changes(&self) -> bool {
        self.prefix.is_some() || self.auto_apply.is_some()
    }
}

/// Where trending products come from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    /// HTTP JSON feed
    Feed(String),
    /// Local JSON catalog file
    Catalog(PathBuf),
    /// Nothing configured; only cached research is shown
    None,
}

impl SourceConfig {
    /// Builds the fetcher for this source
    pub fn fetcher(&self) -> Box<dyn TrendFetcher> {
        match self {
            SourceConfig::Feed(url) => Box::new(TrendsClient::new(url.clone())),
            SourceConfig::Catalog(path) => Box::new(CatalogFileSource::new(path.clone())),
            SourceConfig::None => Box::new(NoTrendSource),
        }
    }
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub source: SourceConfig,
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Config)` with the data directory and trend source
    /// * `Err(CliError::NoDataDir)` if no data directory can be determined
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => Store::new()
                .map(|store| store.data_dir().to_path_buf())
                .ok_or(CliError::NoDataDir)?,
        };

        let source = match (&cli.catalog, &cli.source_url) {
            (Some(path), _) => SourceConfig::Catalog(path.clone()),
            (None, Some(url)) if !url.trim().is_empty() => SourceConfig::Feed(url.clone()),
            _ => SourceConfig::None,
        };

        Ok(Config { data_dir, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_list_defaults() {
        let cli = Cli::parse_from(["trendmart", "list"]);
        assert_eq!(
            cli.command,
            Command::List {
                search: None,
                refresh: false
            }
        );
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_list_with_search_and_refresh() {
        let cli = Cli::parse_from(["trendmart", "list", "--search", "casa", "--refresh"]);
        assert_eq!(
            cli.command,
            Command::List {
                search: Some("casa".to_string()),
                refresh: true
            }
        );
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "trendmart",
            "show",
            "p1",
            "--data-dir",
            "/tmp/tm",
            "--catalog",
            "/tmp/catalog.json",
            "-v",
        ]);
        assert_eq!(cli.command, Command::Show { id: "p1".to_string() });
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tm")));
        assert_eq!(cli.catalog, Some(PathBuf::from("/tmp/catalog.json")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_admin_set_link() {
        let cli = Cli::parse_from(["trendmart", "admin", "set-link", "a", "aff.com/a"]);
        assert_eq!(
            cli.command,
            Command::Admin(AdminCommand::SetLink {
                id: "a".to_string(),
                link: "aff.com/a".to_string()
            })
        );
    }

    #[test]
    fn test_cli_parse_admin_settings() {
        let cli = Cli::parse_from([
            "trendmart",
            "admin",
            "settings",
            "--prefix",
            "aff.com/?u=",
            "--auto-apply",
            "true",
        ]);
        let Command::Admin(AdminCommand::Settings(args)) = cli.command else {
            panic!("Expected admin settings command");
        };
        assert_eq!(args.prefix.as_deref(), Some("aff.com/?u="));
        assert_eq!(args.auto_apply, Some(true));
        assert!(args.has_changes());
    }

    #[test]
    fn test_cli_parse_admin_settings_without_changes() {
        let cli = Cli::parse_from(["trendmart", "admin", "settings"]);
        let Command::Admin(AdminCommand::Settings(args)) = cli.command else {
            panic!("Expected admin settings command");
        };
        assert!(!args.has_changes());
    }

    #[test]
    fn test_cli_rejects_non_bool_auto_apply() {
        let result =
            Cli::try_parse_from(["trendmart", "admin", "settings", "--auto-apply", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["trendmart"]).is_err());
    }

    #[test]
    fn test_config_uses_explicit_data_dir() {
        let cli = Cli::parse_from(["trendmart", "--data-dir", "/tmp/tm", "list"]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tm"));
    }

    #[test]
    fn test_config_catalog_takes_precedence_over_feed() {
        let cli = Cli::parse_from([
            "trendmart",
            "--data-dir",
            "/tmp/tm",
            "--source-url",
            "http://example.com/trends.json",
            "--catalog",
            "/tmp/catalog.json",
            "list",
        ]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Catalog(PathBuf::from("/tmp/catalog.json"))
        );
    }

    #[test]
    fn test_config_feed_source() {
        let cli = Cli::parse_from([
            "trendmart",
            "--data-dir",
            "/tmp/tm",
            "--source-url",
            "http://example.com/trends.json",
            "list",
        ]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Feed("http://example.com/trends.json".to_string())
        );
    }

    #[test]
    fn test_config_blank_feed_url_means_no_source() {
        let cli = Cli::parse_from(["trendmart", "--data-dir", "/tmp/tm", "--source-url", " ", "list"]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.source, SourceConfig::None);
    }
}
