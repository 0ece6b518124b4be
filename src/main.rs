use anyhow::{Context, Result};
use callback_core::AuthQuery;
use clap::{Args, Parser, Subcommand};
use oauth_callback_hmac::config::{Config, LogFormat};
use oauth_callback_hmac::service::CallbackVerifier;
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sign and verify OAuth authorization callback queries.
///
/// The shared secret is read from `API_SECRET_KEY`.
#[derive(Debug, Parser)]
#[command(name = "callback-hmac", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the signature for a query and the query with `hmac` set.
    Sign(QueryArgs),
    /// Check the `hmac` parameter of a query. Exits 1 on mismatch.
    Verify(QueryArgs),
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Form-urlencoded query string, e.g. `code=abc&shop=s.myshopify.com`.
    #[arg(long, conflicts_with = "json", required_unless_present = "json")]
    query: Option<String>,

    /// Query parameters as a flat JSON object of strings.
    #[arg(long)]
    json: Option<String>,
}

impl QueryArgs {
    fn auth_query(&self) -> Result<AuthQuery> {
        match (&self.query, &self.json) {
            (Some(raw), _) => Ok(AuthQuery::parse(raw)),
            (None, Some(raw)) => {
                serde_json::from_str::<AuthQuery>(raw).context("parse --json auth query")
            }
            (None, None) => Ok(AuthQuery::new()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env().context("load callback config")?;
    setup_tracing(config.log_format);

    let verifier = CallbackVerifier::new(Arc::new(config));

    match cli.command {
        Command::Sign(args) => {
            let query = args.auth_query()?;
            let signed = verifier.sign(&query).context("sign callback query")?;
            let hmac = signed.hmac().unwrap_or_default();
            println!(
                "{}",
                json!({"hmac": hmac, "query": signed.to_query_string()})
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify(args) => {
            let query = args.auth_query()?;
            let authentic = verifier
                .verify(query)
                .await
                .context("verify callback query")?;
            info!(authentic, "verification finished");
            println!("{}", json!({"authentic": authentic}));
            Ok(if authentic {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn setup_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
