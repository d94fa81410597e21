//! `payloadkit` command-line front end.
//!
//! ```text
//! payloadkit render xml/currency_conversion_request -p from_currency=SEK -p to_currency=NTD
//! payloadkit resolvers --config payloadkit.yaml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use payloadkit::{RenderContext, RendererConfig, TemplateRegistry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "payloadkit", version, about = "Render XML, JSON and text message payloads")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a template to stdout
    Render {
        /// Logical template name, e.g. xml/currency_conversion_request
        name: String,

        /// Template parameter as key=value (repeatable)
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Template directory (overrides the config file)
        #[arg(long, env = "PAYLOADKIT_TEMPLATES", value_name = "DIR")]
        templates: Option<PathBuf>,

        /// YAML config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List resolvers in priority order
    Resolvers {
        /// YAML config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_config(path: Option<&PathBuf>) -> Result<RendererConfig> {
    match path {
        Some(path) => RendererConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RendererConfig::default()),
    }
}

fn resolver_table(registry: &TemplateRegistry) -> String {
    let mut out = format!(
        "{:>8}  {:<12} {:<6} {:<9} {:<24} PATH\n",
        "PRIORITY", "NAME", "FORMAT", "CACHEABLE", "PATTERNS"
    );
    for resolver in registry.resolvers() {
        let patterns = if resolver.patterns().is_empty() {
            "*".to_string()
        } else {
            resolver
                .patterns()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        out.push_str(&format!(
            "{:>8}  {:<12} {:<6} {:<9} {:<24} {}{{name}}{}\n",
            resolver.priority(),
            resolver.name(),
            resolver.format(),
            if resolver.cacheable() { "yes" } else { "no" },
            patterns,
            resolver.prefix(),
            resolver.suffix(),
        ));
    }
    out
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render {
            name,
            params,
            templates,
            config,
        } => {
            let mut config = load_config(config.as_ref())?;
            if templates.is_some() {
                config.templates_dir = templates;
            }
            let renderer = config.build().context("building renderer")?;
            let context: RenderContext = params.into_iter().collect();

            let payload = renderer
                .render(&name, &context)
                .with_context(|| format!("rendering {name}"))?;
            println!("{payload}");
        }
        Command::Resolvers { config } => {
            let registry = load_config(config.as_ref())?
                .registry()
                .context("building resolver registry")?;
            print!("{}", resolver_table(&registry));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}
