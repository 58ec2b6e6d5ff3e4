//! linkveil - publish an access-restricted file as an obfuscated mirror link
//!
//! One publish operation per invocation: resolve the source, build the
//! obfuscated public path for the given request context, materialize the
//! mirror entry if needed, and print the web-root-relative address.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use common::prelude::*;

/// Publish an access-restricted file as an obfuscated mirror link
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Storage resource identifier to publish (e.g. "userfiles/report.pdf")
    #[arg(conflicts_with = "uri", required_unless_present = "uri")]
    identifier: Option<String>,

    /// Publish a raw URI relative to the document root instead of a
    /// storage resource
    #[arg(long)]
    uri: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The web server's document root
    #[arg(long)]
    document_root: Option<PathBuf>,

    /// Root directory of the storage layer
    #[arg(long)]
    storage_root: Option<PathBuf>,

    /// Override the publishing root (defaults to <document_root>/linkveil)
    #[arg(long)]
    publishing_root: Option<PathBuf>,

    /// Location id partitioning the mirror tree
    #[arg(long, default_value = "default")]
    location: String,

    /// Session access token; when set the publish is authenticated and the
    /// mirror directory is access-restricted before the entry appears
    #[arg(long)]
    token: Option<String>,

    /// Write Apache .htaccess restriction artifacts for authenticated
    /// publishes (otherwise the web server must be configured out of band)
    #[arg(long)]
    htaccess: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::WARN);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);
    tracing_subscriber::registry().with(stderr_layer).init();

    let config = build_config(&args)?;

    let restriction: Box<dyn AccessRestrictionPublisher> = if args.htaccess {
        Box::new(HtaccessPublisher)
    } else {
        Box::new(NoopPublisher)
    };
    let target = PublishingTarget::new(&config, restriction);

    let ctx = match &args.token {
        Some(token) => RequestContext::authenticated(&args.location, token),
        None => RequestContext::anonymous(&args.location),
    };

    let result = match (&args.identifier, &args.uri) {
        (Some(identifier), None) => target.publish_resource(&Resource::new(identifier), &ctx),
        (None, Some(uri)) => target.publish_uri(uri, &ctx),
        // clap enforces exactly one of the two
        _ => unreachable!("either an identifier or --uri is required"),
    };

    match result {
        Ok(address) => {
            println!("{address}");
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            tracing::error!("{e}");
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

/// Build the publishing configuration from the optional TOML file with
/// individual flags layered on top.
fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => {
            let document_root = args
                .document_root
                .clone()
                .context("--document-root is required without --config")?;
            let storage_root = args
                .storage_root
                .clone()
                .context("--storage-root is required without --config")?;
            Config::new(document_root, storage_root)
        }
    };

    if let Some(document_root) = &args.document_root {
        config.document_root = document_root.clone();
    }
    if let Some(storage_root) = &args.storage_root {
        config.storage_root = storage_root.clone();
    }
    if let Some(publishing_root) = &args.publishing_root {
        config.publishing_root = Some(publishing_root.clone());
    }

    Ok(config)
}
