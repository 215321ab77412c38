use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use keyhandoff_lib::bootstrap::init_tracing;
use keyhandoff_lib::{load_config, KeyHandoff, KeyHandoffConfig, WordListLanguage};
use tracing::{info, warn};

/// Pair with an owner device and hand it a recovery phrase.
#[derive(Debug, Parser)]
#[command(name = "keyhandoff", version, about)]
struct Cli {
    /// Name shown to the owner device when it opens the link
    #[arg(long)]
    name: String,

    /// TOML file with [relay] and [polling] tables
    #[arg(long, env = "KEYHANDOFF_CONFIG")]
    config: Option<PathBuf>,

    /// BIP-39 word list id (1 = English ... 10 = Chinese simplified)
    #[arg(long, default_value_t = 1)]
    language: u8,

    #[arg(long, default_value = "")]
    label: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    // never taken from argv, which other local users can read
    let phrase = std::env::var("KEYHANDOFF_PHRASE").unwrap_or_default();
    if phrase.is_empty() {
        bail!("KEYHANDOFF_PHRASE is not set");
    }

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => KeyHandoffConfig::default(),
    };
    let handoff = KeyHandoff::new(config)?
        .initiate(&cli.name)
        .context("Failed to start pairing session")?;

    println!("{}", handoff.deep_link);

    let mut outcome = handoff.outcome();
    tokio::select! {
        connected = outcome.wait_connected() => {
            if let Err(reason) = connected {
                bail!("pairing failed: {:?}", reason);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, cancelling session");
            handoff.session.cancel();
            bail!("cancelled");
        }
    }

    info!("owner device verified, exporting phrase");
    handoff
        .session
        .export_phrase(&phrase, WordListLanguage::from_id(cli.language), &cli.label)
        .context("Failed to export phrase")?;

    match outcome.wait().await {
        Ok(()) => {
            info!("phrase delivered");
            Ok(())
        }
        Err(reason) => bail!("export failed: {:?}", reason),
    }
}
