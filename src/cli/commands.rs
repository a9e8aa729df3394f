use crate::generator::{generate_provider, GenerateOptions, GenerationReport, GeneratorInputs};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Command-line interface of the provider generator
#[derive(Parser, Debug)]
#[command(name = "restprovider-gen")]
#[command(about = "Generate a Terraform provider from an OpenAPI description", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// The two input files every command reads
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InputArgs {
    /// Path to the OpenAPI description (YAML or JSON)
    #[arg(long, env = "RESTPROVIDER_OPEN_API")]
    pub open_api: PathBuf,

    /// Path to the provider configuration (YAML)
    #[arg(long, env = "RESTPROVIDER_PROVIDER_SPEC")]
    pub provider_spec: PathBuf,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render and write the provider source tree
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Directory the provider is written to; existing files are overwritten
        #[arg(long)]
        output_directory: PathBuf,

        /// Directory with template overrides (`<name>.txt`, minijinja syntax)
        #[arg(long)]
        template_dir: Option<PathBuf>,

        /// Render everything and print the report without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Validate the configuration and resolve every entity without writing
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Print the planned artifact paths in write order
    Plan {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

/// Parse the process arguments and run the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Run an already parsed command line, printing results to stdout.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Generate {
            inputs,
            output_directory,
            template_dir,
            dry_run,
        } => {
            let report = generate_provider(&GenerateOptions {
                open_api: inputs.open_api,
                provider_spec: inputs.provider_spec,
                output_directory: output_directory.clone(),
                template_dir,
                dry_run,
            })?;
            if dry_run {
                print_report(&mut out, &report)?;
            } else {
                writeln!(
                    out,
                    "Generated {} files into {}",
                    report.artifacts.len(),
                    output_directory.display()
                )?;
            }
        }
        Commands::Validate { inputs } => {
            let loaded = GeneratorInputs::load(&inputs.open_api, &inputs.provider_spec)?;
            let counts = loaded.check()?;
            for (path, properties) in &counts {
                writeln!(out, "{}: {properties} attributes", path.display())?;
            }
            info!(artifacts = counts.len(), "configuration is valid");
            writeln!(out, "OK: {} entities", loaded.config.resources.len())?;
        }
        Commands::Plan { inputs } => {
            let loaded = GeneratorInputs::load(&inputs.open_api, &inputs.provider_spec)?;
            for path in loaded.plan().paths() {
                writeln!(out, "{}", path.display())?;
            }
        }
    }
    Ok(())
}

fn print_report(out: &mut impl Write, report: &GenerationReport) -> io::Result<()> {
    for artifact in &report.artifacts {
        writeln!(
            out,
            "{}  {:>7}  {}",
            artifact.sha256,
            artifact.bytes,
            artifact.path.display()
        )?;
    }
    writeln!(
        out,
        "{} files, {} bytes (dry run, nothing written)",
        report.artifacts.len(),
        report.total_bytes()
    )
}
