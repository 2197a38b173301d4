//! Hybrid X.509 inspection CLI
//!
//! Reads certificates and certificate signing requests, extracts the hybrid
//! (secondary) signature and reports it against the qTESLA registry.

use clap::{Parser, Subcommand, ValueEnum};
use hybrid_x509::{
    infra::config::ExportFormat, ConfigManager, InspectWorkflow, OutputFormat, SecurityCategory,
};
use miette::{Context, IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hybrid-x509")]
#[command(about = "Inspect hybrid (dual-signature) X.509 certificates and CSRs")]
#[command(long_about = "
Hybrid X.509 - secondary signature inspection utility

EXAMPLES:
    # Show the hybrid signature of a certificate (DER or PEM)
    hybrid-x509 inspect leaf.pem

    # Inspect a certificate signing request as JSON
    hybrid-x509 inspect request.csr --csr --format json

    # List known qTESLA categories
    hybrid-x509 categories

ENVIRONMENT VARIABLES:
    RUST_LOG        Logging level (debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and describe the hybrid signature of a certificate or CSR
    Inspect {
        /// Certificate or CSR file (DER or PEM)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Treat the input as a PKCS#10 certificate signing request
        #[arg(long)]
        csr: bool,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormatArg>,

        /// Report length mismatches instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// List the registered qTESLA security categories
    Categories,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Create default configuration file
    Init,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Export configuration
    Export {
        /// Export format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ExportFormatArg,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum ExportFormatArg {
    Toml,
    Json,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Toml => ExportFormat::Toml,
            ExportFormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            file,
            csr,
            format,
            lenient,
        } => handle_inspect_command(file, csr, format, lenient)?,
        Commands::Categories => handle_categories_command(),
        Commands::Config(config_cmd) => handle_config_command(config_cmd)?,
    }

    Ok(())
}

fn handle_inspect_command(
    file: PathBuf,
    csr: bool,
    format: Option<OutputFormatArg>,
    lenient: bool,
) -> Result<()> {
    let config_manager = ConfigManager::new().into_diagnostic()?;
    let mut config = config_manager.load_or_default().into_diagnostic()?;
    if lenient {
        config.enforce_signature_length = false;
    }
    let format = format.map_or(config.default_output_format, OutputFormat::from);

    let report = InspectWorkflow::from_config(&config)
        .run(&file, csr)
        .wrap_err_with(|| format!("Failed to inspect {}", file.display()))?;

    match format {
        OutputFormat::Text => {
            print!("{report}");
            if config.verbose {
                println!("  Length check:    {:?}", report.length_ok);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
            println!("{json}");
        }
    }
    Ok(())
}

fn handle_categories_command() {
    println!(
        "{:<20} {:<26} {:>10} {:>10} {:>10}",
        "NAME", "OID", "SIG BYTES", "PUB BYTES", "PRIV BYTES"
    );
    for category in SecurityCategory::ALL {
        println!(
            "{:<20} {:<26} {:>10} {:>10} {:>10}",
            category.name(),
            category.oid(),
            category.signature_size(),
            category.public_key_size(),
            category.private_key_size()
        );
    }
}

fn handle_config_command(config_cmd: ConfigCommands) -> Result<()> {
    let config_manager = ConfigManager::new().into_diagnostic()?;

    match config_cmd {
        ConfigCommands::Show => match config_manager.load() {
            Ok(config) => {
                println!("Current Configuration:");
                println!(
                    "  Enforce signature length: {}",
                    config.enforce_signature_length
                );
                println!(
                    "  Default output format: {:?}",
                    config.default_output_format
                );
                println!("  Verbose: {}", config.verbose);
                println!(
                    "  Configuration file: {}",
                    config_manager.config_path().display()
                );
            }
            Err(_) => {
                println!("No configuration file found. Use 'config init' to create one.");
            }
        },

        ConfigCommands::Init => {
            let _config = config_manager.load_or_create_default().into_diagnostic()?;
            println!(
                "Configuration initialized: {}",
                config_manager.config_path().display()
            );
        }

        ConfigCommands::Set { key, value } => {
            config_manager
                .update_value(&key, &value)
                .into_diagnostic()?;
            println!("Configuration updated: {key} = {value}");
        }

        ConfigCommands::Export { format } => {
            let content = config_manager
                .export_config(format.into())
                .into_diagnostic()?;
            println!("{content}");
        }
    }

    Ok(())
}
