//! attest: command-line tooling for the attestation engine.

mod replay;

use anyhow::Context;
use attest_crypto::{derive_identity_hash, proof_message_hash, recover_signer, IssuerKey};
use attest_service::ServiceConfig;
use attest_types::{Account, IdentityHash, ProviderId, Signature, Timestamp};
use attest_utils::{init_logging, LogFormat};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use crate::replay::Replay;

#[derive(Parser)]
#[command(name = "attest", about = "Stamp attestation tooling", version)]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value for `replay`, "warn" otherwise.
    #[arg(long, global = true, env = "ATTEST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "ATTEST_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Derive the identity hash for a provider user id.
    IdentityHash {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        provider: ProviderId,
        /// Issuer secret mixed into the hash.
        #[arg(long, env = "ATTEST_IDENTITY_SECRET")]
        secret: String,
    },

    /// Mint a signed proof as the issuer and print it as JSON.
    Issue {
        /// Issuer private key (hex).
        #[arg(long, env = "ATTEST_ISSUER_KEY", hide_env_values = true)]
        key: String,
        #[arg(long)]
        account: Account,
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        provider: ProviderId,
        #[arg(long, env = "ATTEST_IDENTITY_SECRET")]
        secret: String,
        /// Proof time in Unix seconds (defaults to now).
        #[arg(long)]
        timestamp: Option<u64>,
    },

    /// Recover the account that signed a proof.
    Recover {
        #[arg(long)]
        account: Account,
        #[arg(long)]
        identity_hash: IdentityHash,
        #[arg(long)]
        timestamp: u64,
        #[arg(long)]
        provider: ProviderId,
        #[arg(long)]
        signature: Signature,
    },

    /// Print a configuration file with every default filled in.
    InitConfig {
        #[arg(long)]
        owner: Account,
        #[arg(long)]
        issuer: Option<Account>,
    },

    /// Run a JSON-lines script of operations against an in-memory service.
    Replay {
        /// Path to the service TOML configuration.
        #[arg(long)]
        config: PathBuf,
        /// Initial clock value in Unix seconds (defaults to now).
        #[arg(long)]
        start: Option<u64>,
        /// Issuer key used to sign `verify` operations that carry no signature.
        #[arg(long, env = "ATTEST_ISSUER_KEY", hide_env_values = true)]
        issuer_key: Option<String>,
        /// Script file, one JSON operation per line.
        script: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::IdentityHash {
            user_id,
            provider,
            secret,
        } => {
            start_logging(cli.log_format, cli.log_level.as_deref().unwrap_or("warn"))?;
            println!("{}", derive_identity_hash(&user_id, &provider, &secret));
        }
        Command::Issue {
            key,
            account,
            user_id,
            provider,
            secret,
            timestamp,
        } => {
            start_logging(cli.log_format, cli.log_level.as_deref().unwrap_or("warn"))?;
            let issuer = IssuerKey::from_hex(&key).context("invalid issuer key")?;
            let identity_hash = derive_identity_hash(&user_id, &provider, &secret);
            let timestamp = timestamp.map(Timestamp::new).unwrap_or_else(Timestamp::now);
            let proof = issuer.issue(account, identity_hash, timestamp, provider)?;
            tracing::info!(issuer = %issuer.account(), account = %account, "proof issued");
            println!("{}", serde_json::to_string_pretty(&proof)?);
        }
        Command::Recover {
            account,
            identity_hash,
            timestamp,
            provider,
            signature,
        } => {
            start_logging(cli.log_format, cli.log_level.as_deref().unwrap_or("warn"))?;
            let message =
                proof_message_hash(&account, &identity_hash, Timestamp::new(timestamp), &provider);
            let signer =
                recover_signer(&message, &signature).context("signature recovery failed")?;
            println!("{signer}");
        }
        Command::InitConfig { owner, issuer } => {
            let mut config = ServiceConfig::new(owner);
            config.issuer = issuer;
            config.validate()?;
            print!("{}", config.to_toml_string()?);
        }
        Command::Replay {
            config,
            start,
            issuer_key,
            script,
        } => {
            let service_config = ServiceConfig::from_toml_file(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let log_level = cli
                .log_level
                .unwrap_or_else(|| service_config.log_level.clone());
            start_logging(
                Some(cli.log_format.unwrap_or(service_config.log_format)),
                &log_level,
            )?;

            let signer = issuer_key
                .as_deref()
                .map(IssuerKey::from_hex)
                .transpose()
                .context("invalid issuer key")?;
            if let Some(signer) = &signer {
                if signer.account() != service_config.issuer() {
                    tracing::warn!(
                        key_account = %signer.account(),
                        issuer = %service_config.issuer(),
                        "issuer key does not match the configured issuer"
                    );
                }
            }
            let start = start.map(Timestamp::new).unwrap_or_else(Timestamp::now);
            let replay = Replay::new(&service_config, start, signer)?;

            let input = File::open(&script)
                .with_context(|| format!("opening {}", script.display()))?;
            let summary = replay.run(BufReader::new(input), io::stdout().lock())?;
            tracing::info!(
                applied = summary.applied,
                failed = summary.failed,
                members = replay.service().get_all_members().len(),
                "replay finished"
            );
        }
    }

    Ok(())
}

fn start_logging(format: Option<LogFormat>, level: &str) -> anyhow::Result<()> {
    init_logging(format.unwrap_or_default(), level)?;
    Ok(())
}
