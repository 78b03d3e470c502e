//! memreport CLI - memreport to JSON conversion tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use memreport::config::{ConfigResolver, DirSource};
use memreport::{
    detect_version, detect_version_from_path, report_title, DocumentParser, EngineVersion,
    JsonFormat, ParseOptions, UnmatchedLines,
};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "memreport")]
#[command(version)]
#[command(about = "Convert Unreal Engine memreport dumps to structured JSON", long_about = None)]
struct Cli {
    /// Input memreport file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory holding the per-version configuration
    #[arg(
        long,
        global = true,
        env = "MEMREPORT_RESOURCES",
        default_value = "resources",
        value_name = "DIR"
    )]
    resources: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a memreport into JSON
    Parse {
        /// Input memreport file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Engine version (detected from content if not specified)
        #[arg(short, long, value_name = "VERSION")]
        engine: Option<EngineVersion>,

        /// Fail on table lines that do not match their row pattern
        #[arg(long, conflicts_with = "keep_unmatched")]
        strict: bool,

        /// Keep table lines that do not match as single-cell rows
        #[arg(long)]
        keep_unmatched: bool,
    },

    /// Detect the engine version of a memreport
    Detect {
        /// Input memreport file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the resolved configuration for an engine version
    Config {
        /// Engine version
        #[arg(short, long, value_name = "VERSION")]
        engine: EngineVersion,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Check configurations for structural problems
    Validate {
        /// Engine version (all versions if not specified)
        #[arg(short, long, value_name = "VERSION")]
        engine: Option<EngineVersion>,
    },

    /// List the pattern resources available for an engine version
    Patterns {
        /// Engine version
        #[arg(short, long, value_name = "VERSION")]
        engine: EngineVersion,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result: CmdResult = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(run(cli)),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CmdResult {
    let resources = cli.resources;

    match cli.command {
        Some(Commands::Parse {
            input,
            output,
            compact,
            engine,
            strict,
            keep_unmatched,
        }) => {
            let policy = if strict {
                UnmatchedLines::Fail
            } else if keep_unmatched {
                UnmatchedLines::Raw
            } else {
                UnmatchedLines::Drop
            };
            cmd_parse(
                &resources,
                &input,
                output.as_deref(),
                json_format(compact),
                engine,
                policy,
            )
            .await
        }
        Some(Commands::Detect { input }) => cmd_detect(&input),
        Some(Commands::Config { engine, compact }) => {
            cmd_config(&resources, engine, json_format(compact)).await
        }
        Some(Commands::Validate { engine }) => cmd_validate(&resources, engine).await,
        Some(Commands::Patterns { engine }) => cmd_patterns(&resources, engine).await,
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: parse if input is provided
            if let Some(input) = cli.input {
                cmd_parse(
                    &resources,
                    &input,
                    None,
                    JsonFormat::Pretty,
                    None,
                    UnmatchedLines::Drop,
                )
                .await
            } else {
                println!("{}", "Usage: memreport <FILE>".yellow());
                println!("       memreport --help for more information");
                Ok(())
            }
        }
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn resolver(resources: &Path) -> ConfigResolver<DirSource> {
    ConfigResolver::new(DirSource::new(resources))
}

async fn cmd_parse(
    resources: &Path,
    input: &Path,
    output: Option<&Path>,
    format: JsonFormat,
    engine: Option<EngineVersion>,
    unmatched: UnmatchedLines,
) -> CmdResult {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading report...");
    let bytes = tokio::fs::read(input).await?;
    let text = String::from_utf8_lossy(&bytes);

    let version = engine.unwrap_or_else(|| detect_version(&text));
    log::info!("{}: engine {}", input.display(), version);

    pb.set_message(format!("Resolving configuration for {}...", version));
    let config = resolver(resources).resolve(version).await?;

    pb.set_message("Parsing sections...");
    let parser = DocumentParser::with_options(ParseOptions::new().with_unmatched_lines(unmatched));
    let doc = parser
        .parse(&text, &report_title(input), &config.sections)
        .await?;
    pb.finish_and_clear();

    let json = memreport::render::to_json(&doc, format)?;
    write_output(output, &json)?;

    if output.is_some() {
        println!(
            "{} {} sections, {} tables (engine {})",
            "Parsed".green().bold(),
            doc.section_count(),
            doc.table_count(),
            version
        );
    }

    Ok(())
}

fn cmd_detect(input: &Path) -> CmdResult {
    let version = detect_version_from_path(input)?;

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Engine".bold(), version.to_string().cyan());
    println!("{}: {:?}", "Pipeline".bold(), version.pipeline());

    Ok(())
}

async fn cmd_config(resources: &Path, engine: EngineVersion, format: JsonFormat) -> CmdResult {
    let config = resolver(resources).resolve(engine).await?;

    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&config)?,
        JsonFormat::Compact => serde_json::to_string(&config)?,
    };
    println!("{}", json);

    Ok(())
}

async fn cmd_validate(resources: &Path, engine: Option<EngineVersion>) -> CmdResult {
    let versions = match engine {
        Some(version) => vec![version],
        None => EngineVersion::ALL.to_vec(),
    };

    let resolver = resolver(resources);
    let mut total = 0;
    for version in versions {
        let problems = resolver.validate(version).await;
        if problems.is_empty() {
            println!("{} {}", "✓".green(), version);
            continue;
        }

        println!("{} {}", "✗".red(), version);
        for problem in &problems {
            println!("  {} {}", "─".dimmed(), problem);
        }
        total += problems.len();
    }

    if total > 0 {
        return Err(format!("{} configuration problem(s) found", total).into());
    }

    Ok(())
}

async fn cmd_patterns(resources: &Path, engine: EngineVersion) -> CmdResult {
    let patterns = resolver(resources).available_patterns(engine).await;

    println!(
        "{} ({})",
        "Pattern resources".cyan().bold(),
        engine.family()
    );
    println!("{}", "─".repeat(40).dimmed());
    for id in &patterns {
        println!("  {}", id);
    }
    if patterns.is_empty() {
        println!("  {}", "(none)".dimmed());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "memreport".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Unreal Engine memreport parsing tool");
    println!();
    println!(
        "Engines: {}",
        EngineVersion::ALL
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("License: MIT");
}

fn write_output(output: Option<&Path>, content: &str) -> std::io::Result<()> {
    match output {
        Some(path) => fs::write(path, content),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
