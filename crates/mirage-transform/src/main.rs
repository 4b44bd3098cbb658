//! Mirage response renderer
//!
//! Renders one mock rule against a request described on the command line,
//! the same way the mock server would, and prints the resulting response.
//!
//! Usage:
//!   mirage-render --config rules.yaml --rule get-user --method POST \
//!       --url /users/7 --body '{"name": "Alice"}'

use anyhow::{Context, Result};
use clap::Parser;
use mirage_transform::config::MockConfig;
use mirage_transform::{BodyTransformer, DirectoryFileSource, RequestDescriptor};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Render a mock response template against a request
#[derive(Parser, Debug)]
#[command(name = "mirage-render")]
#[command(author, version, about = "Render Mirage response templates")]
struct Args {
    /// Rule configuration file (YAML, or JSON by extension)
    #[arg(short, long, env = "MIRAGE_CONFIG")]
    config: PathBuf,

    /// Id of the rule to render
    #[arg(short, long, required_unless_present = "validate")]
    rule: Option<String>,

    /// Request method
    #[arg(short, long, default_value = "GET")]
    method: String,

    /// Request URL (path and query)
    #[arg(short, long, default_value = "/")]
    url: String,

    /// Host used to build the absolute request URL
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Request body
    #[arg(short, long, conflicts_with = "body_file")]
    body: Option<String>,

    /// Read the request body from a file
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// Request header as `name:value` (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Root directory for response body files
    #[arg(short, long, default_value = "__files")]
    files: PathBuf,

    /// Print the extracted request variables instead of the response
    #[arg(long)]
    dump_variables: bool,

    /// Only load and validate the configuration
    #[arg(long)]
    validate: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = MockConfig::from_file(&args.config)?;
    if args.validate {
        info!(rules = config.rules.len(), "Configuration is valid");
        return Ok(());
    }

    let rule_id = args.rule.as_deref().context("--rule is required")?;
    let rule = config
        .rule(rule_id)
        .with_context(|| format!("No rule with id '{rule_id}'"))?
        .mount()?;

    let request = build_request(&args)?;
    let transformer = BodyTransformer::new();

    if args.dump_variables {
        let variables = transformer
            .extract_variables(&request, &rule.parameters)
            .unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&variables)?);
        return Ok(());
    }

    let files = DirectoryFileSource::new(&args.files);
    let rendered = rule.render(&transformer, &request, &files)?;
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn build_request(args: &Args) -> Result<RequestDescriptor> {
    let body = match (&args.body, &args.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request body: {}", path.display()))?,
        (None, None) => String::new(),
    };

    let absolute_url = format!("http://{}{}", args.host.trim_end_matches('/'), args.url);
    let mut request = RequestDescriptor::new(&args.method, &args.url)
        .with_absolute_url(absolute_url)
        .with_body(body);

    for header in &args.headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("Invalid header '{header}', expected name:value"))?;
        request = request.with_header(name.trim(), value.trim());
    }

    Ok(request)
}
