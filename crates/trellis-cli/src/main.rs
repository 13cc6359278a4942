//! Trellis CLI - Deploy a webapp directory and inspect its components
//!
//! - `trellis deploy <webapp>` runs both discovery passes and prints the
//!   resulting registry
//! - `trellis identity <classes-dir> <file>` prints the class identity a
//!   class file resolves to

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trellis_container::{
    ContainerConfig, DeploymentSummary, InMemoryAttributeStore, ManifestReflectionProvider,
    ObjectManager,
};
use trellis_registry::{DescriptorRegistry, InMemoryDescriptorRegistry};
use trellis_scanner::IdentityResolver;
use trellis_types::Descriptor;

/// Reflection manifest looked up in the webapp when `--manifest` is not given
const DEFAULT_MANIFEST: &str = "META-INF/reflection.json";

/// Trellis CLI
#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Trellis - Component discovery for deployed applications", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TRELLIS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level, overrides the configuration
    #[arg(long, global = true, env = "TRELLIS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, global = true, env = "TRELLIS_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a webapp directory and print its component registry
    Deploy {
        /// Webapp root directory
        webapp: PathBuf,

        /// Reflection manifest (JSON array of reflected classes)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Application name, defaults to the webapp directory name
        #[arg(short, long)]
        name: Option<String>,

        /// Print the registry and summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the class identity of a file below a classes directory
    Identity {
        /// Classes directory
        classes_dir: PathBuf,

        /// Class file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ContainerConfig::load(cli.config.as_deref()).context("loading configuration")?;

    // Initialize tracing
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if cli.log_json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match cli.command {
        Commands::Deploy {
            webapp,
            manifest,
            name,
            json,
        } => deploy(&config, &webapp, manifest, name, json),
        Commands::Identity { classes_dir, file } => {
            let identity = IdentityResolver::new(classes_dir)
                .resolve(&file)
                .with_context(|| format!("resolving {}", file.display()))?;
            println!("{identity}");
            Ok(())
        }
    }
}

fn deploy(
    config: &ContainerConfig,
    webapp: &Path,
    manifest: Option<PathBuf>,
    name: Option<String>,
    json: bool,
) -> Result<()> {
    let manifest = manifest.unwrap_or_else(|| webapp.join(DEFAULT_MANIFEST));
    let reflection = if manifest.is_file() {
        ManifestReflectionProvider::load(&manifest)?
    } else {
        tracing::warn!(path = %manifest.display(), "No reflection manifest, classes will not resolve");
        ManifestReflectionProvider::default()
    };

    let name = name.unwrap_or_else(|| {
        webapp
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".to_string())
    });

    let registry = Arc::new(InMemoryDescriptorRegistry::new());
    let manager = ObjectManager::new(
        name,
        webapp,
        registry.clone(),
        Arc::new(InMemoryAttributeStore::new()),
        Arc::new(reflection),
    );

    let summary = manager
        .deploy(config)
        .with_context(|| format!("deploying {}", webapp.display()))?;
    let descriptors = registry.snapshot();

    if json {
        let output = json!({
            "summary": summary,
            "components": descriptors,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_descriptors(&descriptors);
        print_summary(&summary);
    }

    Ok(())
}

fn print_descriptors(descriptors: &[Descriptor]) {
    for descriptor in descriptors {
        println!("{}", descriptor.identity());
        for (name, field) in descriptor.fields() {
            println!("  {name} = {} ({})", field.value, field.provenance);
        }
    }
}

fn print_summary(summary: &DeploymentSummary) {
    println!();
    println!(
        "{}: {} components, {} skipped",
        summary.application,
        summary.components,
        summary.skipped()
    );
    for report in [&summary.descriptor, &summary.classes] {
        if !report.present {
            println!("  {} not present", report.source);
            continue;
        }
        println!(
            "  {}: {} registered, {} conflicts",
            report.source, report.registered, report.conflicts
        );
        for item in &report.skipped {
            println!("    skipped {}: {}", item.location, item.error);
        }
    }
}
