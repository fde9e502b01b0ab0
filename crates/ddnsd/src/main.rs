// # ddnsd - one-shot DDNS updater
//
// This binary is a THIN integration layer:
// 1. Parsing the command line
// 2. Reading credentials and overrides from environment variables
// 3. Initializing logging and the runtime
// 4. Wiring address sources and the DNSimple provider into `DdnsEngine`
//
// All discovery and reconciliation logic lives in ddns-core.
//
// ## Usage
//
// ```bash
// export DOMAIN_TOKEN=your_domain_token
// ddnsd eth0 example.com myip   # manages myip.example.com
// ```
//
// ## Configuration
//
// ### Credentials (one required)
// - `DOMAIN_TOKEN`: Token scoped to <domain> (preferred when both are set)
// - `OAUTH_V2_TOKEN`: OAuth token scoped to the account owning <domain>
//
// ### Optional
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `DDNS_ECHO_URL`: IP-echo endpoint (default: http://icanhazip.com/)
// - `DDNS_IP_COMMAND`: Interface query tool (default: ip)
// - `DNSIMPLE_BASE_URL`: API base (default: https://api.dnsimple.com/v2)
// - `DDNS_MODE`: set to `dry-run` to log writes instead of performing them

use anyhow::Result;
use clap::Parser;
use ddns_core::config::{DdnsConfig, ProviderConfig, RecordTarget};
use ddns_core::{AddressSource, Credentials, DdnsEngine, DnsProvider};
use ddns_ip_http::HttpEchoSource;
use ddns_ip_local::LocalInterfaceSource;
use ddns_provider_dnsimple::DnsimpleProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const CREDENTIALS_HELP: &str = "\
Don't forget to set one of the following environment variables:

  * DOMAIN_TOKEN (recommended, default) -- generated domain token,
    which must be specific to <DOMAIN> itself.
  * OAUTH_V2_TOKEN -- generated OAuth token, which must be
    specific to the account that owns <DOMAIN>.";

/// Exit codes for different termination scenarios
///
/// - 0: Run completed
/// - 1: Usage or configuration error (nothing was touched)
/// - 2: Runtime error (provider failure; earlier changes stand)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Run completed (possibly in failsafe mode)
    Success = 0,
    /// Usage or configuration error
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Publish this host's IPv4 addresses as DNSimple A records
#[derive(Debug, Parser)]
#[command(name = "ddnsd", version, about, after_help = CREDENTIALS_HELP)]
struct Cli {
    /// Internet-facing local interface (e.g. "eth0")
    interface: String,

    /// DNSimple domain (e.g. "example.com")
    domain: String,

    /// DNSimple record (e.g. "myip" = "myip.example.com")
    record: String,
}

/// Application configuration
struct Config {
    ddns: DdnsConfig,
    log_level: String,
}

impl Config {
    /// Assemble configuration from the command line and an environment lookup
    fn from_env<F>(cli: Cli, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::from_lookup(&lookup)?;

        let mut ddns = DdnsConfig::new(
            cli.interface,
            RecordTarget::new(cli.domain, cli.record),
            credentials.clone(),
        );

        if let Some(url) = lookup("DDNS_ECHO_URL") {
            ddns.echo.url = url;
        }

        if let Some(command) = lookup("DDNS_IP_COMMAND") {
            ddns.local.command = command;
        }

        let dry_run = lookup("DDNS_MODE")
            .unwrap_or_default()
            .to_lowercase()
            == "dry-run";

        let mut provider = ProviderConfig::new(credentials).with_dry_run(dry_run);
        if let Some(base_url) = lookup("DNSIMPLE_BASE_URL") {
            provider = provider.with_base_url(base_url);
        }
        ddns.provider = provider;

        Ok(Self {
            ddns,
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.ddns.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                // --help / --version
                DdnsExitCode::Success.into()
            };
        }
    };

    let config = match Config::from_env(cli, |key| env::var(key).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(config.ddns).await {
            error!("Update failed: {}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::Success
        }
    });

    result.into()
}

/// Build the collaborators and run one update pass
async fn run(config: DdnsConfig) -> Result<()> {
    info!(
        "Using {} for {}",
        config.provider.credentials.kind(),
        config.target.fqdn()
    );

    let sources: Vec<Box<dyn AddressSource>> = vec![
        Box::new(LocalInterfaceSource::from_config(&config.local)),
        Box::new(HttpEchoSource::from_config(&config.echo)?),
    ];
    let provider: Box<dyn DnsProvider> = Box::new(DnsimpleProvider::from_config(&config.provider)?);

    let engine = DdnsEngine::new(sources, provider, config.target);
    let summary = engine.run_once().await?;

    if summary.discovery.failsafe {
        info!(
            "Finished in failsafe mode; {} stale record(s) left in place",
            summary.report.refused.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn cli() -> Cli {
        Cli::try_parse_from(["ddnsd", "eth0", "example.com", "myip"]).unwrap()
    }

    #[test]
    fn test_cli_requires_exactly_three_arguments() {
        assert!(Cli::try_parse_from(["ddnsd", "eth0", "example.com", "myip"]).is_ok());

        let missing = Cli::try_parse_from(["ddnsd", "eth0", "example.com"]).unwrap_err();
        assert!(missing.use_stderr());

        let extra = Cli::try_parse_from(["ddnsd", "eth0", "example.com", "myip", "x"]).unwrap_err();
        assert!(extra.use_stderr());
    }

    #[test]
    fn test_help_mentions_credentials() {
        let help = Cli::try_parse_from(["ddnsd", "--help"]).unwrap_err();
        assert!(!help.use_stderr());
        let text = help.to_string();
        assert!(text.contains("DOMAIN_TOKEN"));
        assert!(text.contains("OAUTH_V2_TOKEN"));
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let result = Config::from_env(cli(), lookup(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_env(cli(), lookup(&[("DOMAIN_TOKEN", "token")])).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.ddns.local.interface, "eth0");
        assert_eq!(config.ddns.local.command, "ip");
        assert_eq!(config.ddns.target, RecordTarget::new("example.com", "myip"));
        assert_eq!(config.ddns.echo.url, "http://icanhazip.com/");
        assert_eq!(config.ddns.echo.timeout_secs, 10);
        assert_eq!(config.ddns.provider.base_url, "https://api.dnsimple.com/v2");
        assert!(!config.ddns.provider.dry_run);
        assert_eq!(config.tracing_level(), Level::INFO);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_env(
            cli(),
            lookup(&[
                ("OAUTH_V2_TOKEN", "token"),
                ("DDNS_MODE", "DRY-RUN"),
                ("DNSIMPLE_BASE_URL", "https://api.sandbox.dnsimple.com/v2"),
                ("DDNS_ECHO_URL", "https://ifconfig.me/ip"),
                ("DDNS_IP_COMMAND", "/sbin/ip"),
                ("DDNS_LOG_LEVEL", "debug"),
            ]),
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert!(config.ddns.provider.dry_run);
        assert_eq!(
            config.ddns.provider.credentials,
            Credentials::OAuthToken("token".to_string())
        );
        assert_eq!(config.ddns.provider.base_url, "https://api.sandbox.dnsimple.com/v2");
        assert_eq!(config.ddns.echo.url, "https://ifconfig.me/ip");
        assert_eq!(config.ddns.local.command, "/sbin/ip");
        assert_eq!(config.tracing_level(), Level::DEBUG);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = Config::from_env(
            cli(),
            lookup(&[("DOMAIN_TOKEN", "token"), ("DDNS_LOG_LEVEL", "verbose")]),
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let cli = Cli::try_parse_from(["ddnsd", "eth0", "example..com", "myip"]).unwrap();
        let config = Config::from_env(cli, lookup(&[("DOMAIN_TOKEN", "token")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DdnsExitCode::Success as u8, 0);
        assert_eq!(DdnsExitCode::ConfigError as u8, 1);
        assert_eq!(DdnsExitCode::RuntimeError as u8, 2);
    }
}
