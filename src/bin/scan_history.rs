//! Command-line trade-history scan.
//!
//! Scans one account through a Ripple REST server and prints the result as
//! JSON on stdout. Settings come from an optional TOML file and
//! `LEDGER_SCAN__*` environment variables (a `.env` file is honoured).

use anyhow::{Context, Result, bail};
use clap::Parser;
use ledger_scan::application::{HistoryScanner, ScanParameters};
use ledger_scan::domain::value_objects::{AccountId, Timestamp};
use ledger_scan::infrastructure::ripple::RippleRestClient;
use ledger_scan::settings::ScannerSettings;
use ledger_scan::telemetry::{self, LogFormat};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "scan-history")]
#[command(version, about = "Bounded trade-history scan of a ledger account", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account to scan; defaults to `ledger.account` from the settings.
    #[arg(short, long)]
    account: Option<String>,

    /// Stop once this many trades are found.
    #[arg(long)]
    max_trades: Option<u32>,

    /// Stop once this many transaction lookups were made.
    #[arg(long)]
    max_api_calls: Option<u32>,

    /// Stop at this transaction hash, e.g. the newest trade of a previous scan.
    #[arg(long)]
    stop_at_hash: Option<String>,

    /// Ignore notifications older than this RFC 3339 time.
    #[arg(long)]
    since: Option<Timestamp>,

    /// Pull the oldest notifications first.
    #[arg(long)]
    earliest_first: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl Cli {
    fn scan_parameters(&self) -> ScanParameters {
        let mut params = ScanParameters::new();
        if let Some(account) = &self.account {
            params = params.with_account(account.as_str());
        }
        if let Some(max) = self.max_trades {
            params = params.with_max_trades(max);
        }
        if let Some(max) = self.max_api_calls {
            params = params.with_max_api_calls(max);
        }
        if let Some(hash) = &self.stop_at_hash {
            params = params.with_stop_at_hash(hash.as_str());
        }
        if let Some(since) = self.since {
            params = params.with_earliest_timestamp(since);
        }
        if self.earliest_first {
            params = params.with_earliest_first(true);
        }
        params
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    telemetry::init_tracing(cli.log_format)
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    let settings = ScannerSettings::load(cli.config.as_deref()).context("failed to load settings")?;

    let owner = match (&settings.ledger.account, &cli.account) {
        (Some(account), _) => account.clone(),
        (None, Some(account)) => AccountId::new(account.as_str()),
        (None, None) => bail!("no account given: pass --account or set ledger.account"),
    };

    let gateway = RippleRestClient::new(&settings.ledger.base_url, settings.ledger.timeout_ms)
        .context("failed to build ledger client")?;
    info!(
        base_url = gateway.base_url(),
        rate_limit = %settings.rate_limit,
        "connecting to ledger"
    );

    let scanner = HistoryScanner::new(Arc::new(gateway), owner, settings.scanner_config());
    let result = scanner.scan(&cli.scan_parameters()).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
