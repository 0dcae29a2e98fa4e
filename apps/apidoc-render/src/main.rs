use anyhow::{Context, Result};
use apidoc::OpenApi;
use clap::{Parser, Subcommand};
use runtime::{default_logging_config, AppConfig, CliArgs, OutputFormat};
use std::path::{Path, PathBuf};

mod petstore;

/// apidoc-render - compile the declared API into an OpenAPI document
#[derive(Parser)]
#[command(name = "apidoc-render")]
#[command(about = "apidoc-render - compile the declared API into an OpenAPI document")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format: json or yaml (overrides config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Write the document to this file instead of stdout (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and write the document
    Render,
    /// Compile the document and print a summary
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
        format: cli.format,
        output: cli.output.clone(),
    };

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(default_logging_config);
    let base_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    runtime::init_logging_from_config(&logging_config, &base_dir);
    tracing::debug!(openapi = %config.document.openapi, "apidoc-render starting");

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Render) {
        Commands::Render => render(&config),
        Commands::Check => check(&config),
    }
}

fn compile(config: &AppConfig) -> Result<OpenApi> {
    let api = petstore::declare(&config.document, config.builder.clone());
    api.document().context("Failed to compile API document")
}

fn render(config: &AppConfig) -> Result<()> {
    let doc = compile(config)?;

    let mut text = match config.output.format {
        OutputFormat::Json => doc.to_json_pretty()?,
        OutputFormat::Yaml => doc.to_yaml()?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    match &config.output.path {
        Some(path) => {
            write_output(path, &text)?;
            tracing::info!(path = %path.display(), format = %config.output.format, "Document written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn check(config: &AppConfig) -> Result<()> {
    let doc = compile(config)?;

    let operations: Vec<String> = doc
        .paths
        .iter()
        .flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, _)| format!("{} {}", method.as_str().to_uppercase(), path))
        })
        .collect();
    let shared = doc
        .components
        .as_ref()
        .map_or(0, |components| components.schemas.len());

    println!("Document OK: {} {}", doc.info.title, doc.info.version);
    println!("openapi: {}", doc.openapi);
    println!("paths: {}", doc.paths.len());
    println!("operations: {}", operations.len());
    println!("shared schemas: {shared}");
    for op in operations {
        println!("  {op}");
    }
    Ok(())
}
