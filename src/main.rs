//! Console request CLI.
//!
//! Issues one backend call through the request policy layer and prints the
//! payload (or the whole envelope with `--raw`).
//!
//! ```text
//!   args ──▶ config (file + SERVICE_* env) ──▶ RequestClient ──▶ backend
//!                                                 │
//!                    toasts / dialogs ◀── TerminalPresenter (stderr)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use console_request::client::{Reply, RequestClient};
use console_request::config::{load_config, load_from_env};
use console_request::http::ResponseType;
use console_request::lifecycle::unload_on_interrupt;
use console_request::observability::logging;
use console_request::{Credential, RequestDescriptor};

#[derive(Parser)]
#[command(name = "console-request")]
#[command(about = "Call the console backend through the request policy layer", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults plus SERVICE_* variables otherwise.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Access token to log in with.
    #[arg(short, long)]
    token: Option<String>,

    /// Refresh token paired with --token.
    #[arg(long)]
    refresh_token: Option<String>,

    /// Timeout for this call, overriding the configured default.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the whole envelope instead of just the payload.
    #[arg(long)]
    raw: bool,

    /// Do not show toasts for failures of this call.
    #[arg(long)]
    skip_error_handler: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a path
    Get {
        path: String,
        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_pair)]
        query: Vec<(String, String)>,
    },
    /// POST a JSON body to a path
    Post {
        path: String,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// PUT a JSON body to a path
    Put {
        path: String,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// DELETE a path
    Delete { path: String },
    /// GET a file export and write the body as received
    Download {
        path: String,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

fn parse_body(body: Option<String>) -> Result<Option<Value>, serde_json::Error> {
    body.map(|b| serde_json::from_str(&b)).transpose()
}

impl Cli {
    fn descriptor(&self) -> Result<RequestDescriptor, serde_json::Error> {
        let mut descriptor = match &self.command {
            Commands::Get { path, query } => {
                let mut d = RequestDescriptor::get(path);
                d.query = query.clone();
                d
            }
            Commands::Post { path, body } => {
                let mut d = RequestDescriptor::post(path);
                d.body = parse_body(body.clone())?;
                d
            }
            Commands::Put { path, body } => {
                let mut d = RequestDescriptor::put(path);
                d.body = parse_body(body.clone())?;
                d
            }
            Commands::Delete { path } => RequestDescriptor::delete(path),
            Commands::Download { path, .. } => RequestDescriptor::get(path).response_type(ResponseType::Bytes),
        };

        if let Some(ms) = self.timeout_ms {
            descriptor = descriptor.timeout(Duration::from_millis(ms));
        }
        if self.skip_error_handler {
            descriptor = descriptor.skip_error_handler();
        }
        Ok(descriptor)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    logging::init(&config.observability);

    let client = RequestClient::builder(config).build()?;
    if let Some(token) = &cli.token {
        let mut credential = Credential::new(token);
        if let Some(refresh_token) = &cli.refresh_token {
            credential = credential.with_refresh_token(refresh_token);
        }
        client.login(credential);
    }

    let descriptor = cli.descriptor()?;
    let session = client.session().clone();

    let output = match &cli.command {
        Commands::Download { output, .. } => Some(output.clone()),
        _ => None,
    };

    tokio::select! {
        result = call(&client, descriptor, cli.raw, output) => match result {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(e) => {
                // Backend and transport failures were already shown unless skipped.
                tracing::debug!(error = %e, "Request failed");
                Ok(ExitCode::FAILURE)
            }
        },
        unloaded = unload_on_interrupt(&session) => {
            if unloaded? {
                eprintln!("Interrupted with a logout dialog open; session cleared");
            }
            Ok(ExitCode::from(130))
        }
    }
}

async fn call(
    client: &RequestClient,
    descriptor: RequestDescriptor,
    raw: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        match client.request_bytes(descriptor).await? {
            Reply::Data(bytes) => {
                tokio::fs::write(&path, &bytes).await?;
                eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
            }
            Reply::Abandoned(reason) => eprintln!("Session ended ({reason:?}); download abandoned"),
        }
        return Ok(());
    }

    let reply = if raw {
        client
            .request_raw::<Value>(descriptor)
            .await?
            .map(|envelope| json!({ "code": envelope.code, "data": envelope.data, "message": envelope.message }))
    } else {
        client.request::<Value>(descriptor).await?
    };

    match reply {
        Reply::Data(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Reply::Abandoned(reason) => {
            eprintln!("Session ended ({reason:?}); request abandoned");
        }
    }
    Ok(())
}
