mod output;

pub use output::{render_json, render_text};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::core::config::{load_config, AppConfig, ProviderKind};
use crate::stream::async_llm;
use crate::translate;
use crate::transport::{HttpTransport, ResponseMeta, ResponseObserver, SseRequest};

#[derive(Parser, Debug)]
#[command(
    name = "asyncllm",
    version,
    about = "Stream a chat completion and print normalized events"
)]
pub struct Cli {
    /// User prompt, sent as a single user message
    pub prompt: Option<String>,

    /// OpenAI-shaped request body as inline JSON
    #[arg(long, conflicts_with_all = ["body_file", "prompt"])]
    pub body: Option<String>,

    /// Read the request body from a file (`-` for stdin)
    #[arg(long, conflicts_with = "prompt")]
    pub body_file: Option<PathBuf>,

    /// Provider wire format (overrides config)
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,

    /// Model to use (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Full endpoint URL; defaults to the provider's streaming endpoint
    #[arg(long)]
    pub url: Option<String>,

    /// Extra request header, `Name: value`. Repeatable.
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, default_value = "text")]
    pub output_format: OutputFormat,

    /// Working directory used to find `asyncllm.json`
    #[arg(short = 'c', long = "cwd")]
    pub working_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.working_dir.clone()).map_err(|e| anyhow::anyhow!("{e}"))?;
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }

    let filter = if cli.debug || config.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let request = build_request(&cli, &config)?;
    let transport = HttpTransport::from_config(&config).map_err(|e| anyhow::anyhow!("{e}"))?;
    let observer: Arc<dyn ResponseObserver> = Arc::new(|meta: &ResponseMeta| {
        debug!(
            status = meta.status,
            content_type = meta.header("content-type").unwrap_or_default(),
            "response received"
        );
        Ok::<_, anyhow::Error>(())
    });

    let events = async_llm(&transport, request, Some(observer));
    match cli.output_format {
        OutputFormat::Text => render_text(events).await,
        OutputFormat::Json => render_json(events).await,
    }
}

/// Assemble the request: body (translated for the provider), endpoint, and
/// headers from config then `-H` flags.
pub fn build_request(cli: &Cli, config: &AppConfig) -> Result<SseRequest> {
    let body = read_body(cli, config)?;
    let mut body = translate::for_provider(config.provider, &body);
    if matches!(config.provider, ProviderKind::OpenAi | ProviderKind::Anthropic) {
        body["stream"] = Value::Bool(true);
    }

    let url = cli.url.clone().unwrap_or_else(|| config.endpoint());
    let mut request = SseRequest::post(url, body).headers(config.request_headers());
    for header in &cli.headers {
        let (name, value) = parse_header(header)?;
        request = request.header(name, value);
    }
    Ok(request)
}

fn read_body(cli: &Cli, config: &AppConfig) -> Result<Value> {
    let text = match (&cli.body, &cli.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) if path.as_os_str() == "-" => {
            std::io::read_to_string(std::io::stdin()).context("reading body from stdin")?
        }
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading body from {}", path.display()))?,
        (None, None) => {
            let prompt = cli
                .prompt
                .as_deref()
                .context("nothing to send: pass a prompt, --body or --body-file")?;
            return Ok(json!({
                "model": config.model,
                "messages": [{ "role": "user", "content": prompt }],
            }));
        }
    };

    let mut body: Value = serde_json::from_str(&text).context("request body is not valid JSON")?;
    if body.get("model").is_none() {
        body["model"] = Value::String(config.model.clone());
    }
    Ok(body)
}

fn parse_header(header: &str) -> Result<(&str, &str)> {
    let (name, value) = header
        .split_once(':')
        .with_context(|| format!("header must look like 'Name: value', got {header:?}"))?;
    Ok((name.trim(), value.trim()))
}
