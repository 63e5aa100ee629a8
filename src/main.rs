mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands, PlanArgs, SplitArgs};
use pdf_chapter_splitter::{
    AutoConfirm, ChapterSplitter, ClassificationRules, Confirm, FallbackPolicy, OutlineReader,
    Result, SplitConfig, TerminalPrompt,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Split(args) => handle_split_command(args, cli.output.as_deref()),
        Commands::Analyze(args) => handle_analyze_command(args, cli.output.as_deref()),
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn build_config(args: &PlanArgs, output_dir: Option<&Path>) -> Result<SplitConfig> {
    let rules = match &args.rules {
        Some(path) => ClassificationRules::from_json_file(path)?,
        None => ClassificationRules::default(),
    };

    Ok(SplitConfig {
        output_dir: output_dir.map(PathBuf::from),
        max_depth: args.max_depth,
        fallback: if args.strict {
            FallbackPolicy::Strict
        } else {
            FallbackPolicy::Unfiltered
        },
        rules,
        ..SplitConfig::default()
    })
}

fn handle_split_command(args: &SplitArgs, output_dir: Option<&Path>) -> Result<()> {
    info!("Starting split of {}", args.plan.input.display());

    let config = SplitConfig {
        sequence_prefix: !args.no_sequence,
        ..build_config(&args.plan, output_dir)?
    };
    let splitter = ChapterSplitter::new(config);

    let mut confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(TerminalPrompt::stdio())
    };

    let Some(result) = splitter.run(&args.plan.input, confirm.as_mut())? else {
        println!("Split cancelled.");
        return Ok(());
    };

    println!("\n=== Split complete ===");
    println!("Output directory: {}", result.output_dir.display());
    println!("Files created: {}", result.output_files.len());
    for output_file in &result.output_files {
        println!("  - {}", output_file.display());
    }

    if !result.skipped.is_empty() {
        warn!("{} segments were skipped", result.skipped.len());
        for skipped in &result.skipped {
            println!("  ! {}: {}", skipped.name, skipped.reason);
        }
    }

    match &result.manifest_file {
        Some(manifest) => println!("Chapter summary: {}", manifest.display()),
        None => println!("Chapter summary could not be written (see log)"),
    }

    Ok(())
}

fn handle_analyze_command(args: &AnalyzeArgs, output_dir: Option<&Path>) -> Result<()> {
    info!("Analyzing {}", args.plan.input.display());

    let splitter = ChapterSplitter::new(build_config(&args.plan, output_dir)?);
    let pdf = OutlineReader::open(&args.plan.input)?;
    let entries = pdf.outline_entries()?;

    if args.detailed {
        println!("\n=== Bookmarks in '{}' ===", args.plan.input.display());
        for entry in &entries {
            let page = entry
                .page_index
                .map(|p| (p + 1).to_string())
                .unwrap_or_else(|| "?".to_string());
            println!("{}{} (page {})", "  ".repeat(entry.depth + 1), entry.title, page);
        }
    }

    let plan = splitter.plan_document(&pdf)?;
    splitter.print_plan(&plan);

    if let Some(json_path) = &args.json_output {
        let report = serde_json::json!({
            "created_at": chrono::Utc::now().to_rfc3339(),
            "outline": entries,
            "plan": plan,
        });
        let json_content = serde_json::to_string_pretty(&report)
            .context("Failed to serialize analysis results")?;

        std::fs::write(json_path, json_content)
            .with_context(|| format!("Failed to write JSON analysis file {}", json_path.display()))?;

        info!("Analysis results written to: {}", json_path.display());
    }

    Ok(())
}
