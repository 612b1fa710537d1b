use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;

use vocalis_client::config::loader;
use vocalis_client::identity::sources::{BoxError, SessionProvider};
use vocalis_client::observability::logging;
use vocalis_client::{ApiClient, ApiError, ClientConfig};

#[derive(Parser)]
#[command(name = "vocalis-cli")]
#[command(about = "Query the Vocalis dashboard API from the command line", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured base URL.
    #[arg(short, long)]
    base_url: Option<String>,

    /// Extra header, "Name: value". Repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a path
    Get { path: String },
    /// POST a JSON body to a path
    Post {
        path: String,
        #[arg(short, long)]
        data: String,
    },
    /// PUT a JSON body to a path
    Put {
        path: String,
        #[arg(short, long)]
        data: String,
    },
    /// PATCH a JSON body to a path
    Patch {
        path: String,
        #[arg(short, long)]
        data: String,
    },
    /// DELETE a path
    Delete { path: String },
}

/// Session lookup backed by the VOCALIS_USER_EMAIL environment variable.
struct EnvSession;

#[async_trait]
impl SessionProvider for EnvSession {
    async fn user_email(&self) -> Result<Option<String>, BoxError> {
        Ok(std::env::var("VOCALIS_USER_EMAIL")
            .ok()
            .filter(|email| !email.is_empty()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => {
            let mut config = ClientConfig::default();
            loader::apply_env_overrides(&mut config);
            config
        }
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    logging::init_logging(&config.observability);

    let client = ApiClient::builder(config)
        .session_provider(Arc::new(EnvSession))
        .build()?;
    let headers = parse_headers(&cli.headers)?;

    let result: Result<Value, ApiError> = match cli.command {
        Commands::Get { path } => {
            client
                .send(Method::GET, &path, None::<&Value>, Some(headers))
                .await
        }
        Commands::Post { path, data } => {
            let body: Value = serde_json::from_str(&data)?;
            client
                .send(Method::POST, &path, Some(&body), Some(headers))
                .await
        }
        Commands::Put { path, data } => {
            let body: Value = serde_json::from_str(&data)?;
            client
                .send(Method::PUT, &path, Some(&body), Some(headers))
                .await
        }
        Commands::Patch { path, data } => {
            let body: Value = serde_json::from_str(&data)?;
            client
                .send(Method::PATCH, &path, Some(&body), Some(headers))
                .await
        }
        Commands::Delete { path } => {
            client
                .send(Method::DELETE, &path, None::<&Value>, Some(headers))
                .await
        }
    };

    match result {
        Ok(json) => {
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(())
        }
        Err(error) => {
            eprintln!("Error: {}", error.message);
            if let Some(code) = &error.code {
                eprintln!("Code: {}", code);
            }
            if let Some(status) = error.status {
                eprintln!("Status: {}", status);
            }
            if let Some(details) = &error.details {
                for (field, messages) in details {
                    eprintln!("  {}: {}", field, messages.join(", "));
                }
            }
            std::process::exit(1);
        }
    }
}

/// Parse repeated "Name: value" flags into a header map.
fn parse_headers(raw: &[String]) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| format!("invalid header {entry:?}, expected \"Name: value\""))?;
        headers.insert(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }
    Ok(headers)
}
