use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use mindmap_outline::{
    completion_content, CompletionRequest, MindmapAssembler, OutlineConfig, PromptConfig,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "mindmap")]
#[command(about = "Turn model-generated outlines into mindmap trees", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the mindmap tree from model output (file or stdin)
    Build(BuildArgs),

    /// Print the completion request asking the model for an outline
    Prompt(PromptArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Model output to read (default: stdin)
    file: Option<PathBuf>,

    /// Input is a chat-completion response body; use its message content
    #[arg(long)]
    envelope: bool,

    /// Print the build report (tree, payload source, stats) instead of the bare tree
    #[arg(long)]
    report: bool,

    /// Outline configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct PromptArgs {
    /// Source document (default: stdin)
    file: Option<PathBuf>,

    /// Override the model id
    #[arg(long)]
    model: Option<String>,

    /// Marker tag the model is asked to wrap its payload in
    #[arg(long)]
    marker_tag: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Build(args) => run_build(args)?,
        Commands::Prompt(args) => run_prompt(args)?,
    }

    Ok(())
}

fn run_build(args: BuildArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => OutlineConfig::default(),
    };
    let assembler = MindmapAssembler::new(config).context("Invalid outline configuration")?;

    let input = read_input(args.file.as_deref(), "model output")?;
    let raw = if args.envelope {
        completion_content(&input).unwrap_or_else(|| {
            log::warn!("No message content in completion response; building from empty output");
            String::new()
        })
    } else {
        input
    };

    let report = assembler.build(&raw);
    log::info!(
        "Built mindmap: {} nodes, depth {}, payload source {}{}",
        report.stats.node_count,
        report.stats.max_depth,
        report.source.as_str(),
        if report.stats.truncated { " (truncated)" } else { "" }
    );

    if args.report {
        print_json(&report, args.pretty)
    } else {
        print_json(&report.tree, args.pretty)
    }
}

fn run_prompt(args: PromptArgs) -> Result<()> {
    let mut config = PromptConfig::default();
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(tag) = args.marker_tag {
        config.marker_tag = tag;
    }

    let document = read_input(args.file.as_deref(), "document")?;
    let request = CompletionRequest::for_document(&document, &config)
        .context("Cannot build a completion request")?;
    print_json(&request, args.pretty)
}

fn load_config(path: &Path) -> Result<OutlineConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid outline config in {}", path.display()))
}

fn read_input(file: Option<&Path>, what: &str) -> Result<String> {
    if let Some(path) = file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read {what} from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .with_context(|| format!("Failed to read {what} from stdin"))?;
    Ok(buffer)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    print_stdout(&output)
}
