//! Command-line interface for the clause inserter.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{BatchOptions, BatchReport, BatchRunner, DirectiveStatus};
use crate::config::{
    DEFAULT_CONTRACTS_DIR, DEFAULT_OUTPUT_DIR, PREVIEW_MAX_CHARS, PREVIEW_WRAP_WIDTH,
};
use crate::document::ContractDocument;
use crate::error::Result;
use crate::instructions::{parse_instructions_detailed, read_instruction_text, ParsedInstructions};
use crate::output::{preview, save_report, wrap_preview};
use crate::sentence::OffsetPolicy;
use crate::types::{DirectiveRecord, InsertionMode};

/// Clause Inserter - Insert drafted clauses and sentences into contracts.
#[derive(Parser)]
#[command(name = "clause-inserter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an instruction document and show the directives.
    Parse {
        /// Instruction document (.txt or WordprocessingML .xml)
        instructions: PathBuf,

        /// Print directives as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the outline label of every paragraph in a contract.
    Labels {
        /// Contract document (WordprocessingML .xml)
        contract: PathBuf,
    },

    /// Apply an instruction document to the contracts.
    Apply {
        /// Instruction document (.txt or WordprocessingML .xml)
        instructions: PathBuf,

        /// Directory holding the contracts (default: contracts/)
        #[arg(short, long)]
        contracts: Option<PathBuf>,

        /// Directory for the updated contracts (default: updated/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Place sentences using offsets taken from the inserted text, as
        /// earlier versions of the tool did
        #[arg(long)]
        legacy_offsets: bool,

        /// Write a YAML run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { instructions, json } => parse_command(&instructions, json),
        Commands::Labels { contract } => labels_command(&contract),
        Commands::Apply {
            instructions,
            contracts,
            output,
            legacy_offsets,
            report,
        } => {
            let policy = if legacy_offsets {
                OffsetPolicy::Payload
            } else {
                OffsetPolicy::Paragraph
            };
            let options = BatchOptions::new(
                contracts.unwrap_or_else(|| PathBuf::from(DEFAULT_CONTRACTS_DIR)),
                output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            )
            .with_policy(policy);
            apply_command(&instructions, options, report.as_deref())
        }
    }
}

fn load_instructions(path: &Path) -> Result<ParsedInstructions> {
    let text = read_instruction_text(path)?;
    Ok(parse_instructions_detailed(&text))
}

/// Execute the parse command.
fn parse_command(instructions: &Path, json: bool) -> Result<()> {
    let parsed = load_instructions(instructions)?;
    let records: Vec<DirectiveRecord> = parsed
        .directives
        .iter()
        .map(DirectiveRecord::from)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{} {} from {}",
        style("Parsed").bold(),
        style(format!("{} directives", records.len())).cyan(),
        instructions.display()
    );
    println!();

    for directive in &parsed.directives {
        let target = match &directive.mode {
            InsertionMode::AsNewSection { section } => format!("as new section {section}"),
            InsertionMode::WithinSection {
                section,
                sentence_after: Some(n),
            } => format!("in section {section} after sentence {n}"),
            InsertionMode::WithinSection {
                section,
                sentence_after: None,
            } => format!("in section {section} (sentence not recognised)"),
            InsertionMode::Unrecognized => "unrecognised instruction".to_string(),
        };
        let target = if directive.is_noop() {
            style(target).yellow()
        } else {
            style(target).green()
        };

        println!("  {}: {}", style(&directive.contract).bold(), target);
        println!(
            "{}",
            wrap_preview(&directive.text, PREVIEW_WRAP_WIDTH, "    ")
        );
    }

    for block in &parsed.skipped {
        println!(
            "  {}: {} {}",
            style(&block.contract).bold(),
            style("skipped:").yellow().bold(),
            block.reason
        );
    }

    Ok(())
}

/// Execute the labels command.
fn labels_command(contract: &Path) -> Result<()> {
    let document = ContractDocument::from_file(contract)?;
    let labels = document.labels();

    for (index, (paragraph, label)) in document.paragraphs().iter().zip(&labels).enumerate() {
        let text = preview(&paragraph.text(), PREVIEW_MAX_CHARS);
        if text.is_empty() && label.is_empty() {
            continue;
        }
        println!(
            "{:>4}  {:<10} {}",
            style(index).dim(),
            style(label).cyan().bold(),
            text
        );
    }

    Ok(())
}

/// Execute the apply command.
fn apply_command(
    instructions: &Path,
    options: BatchOptions,
    report_path: Option<&Path>,
) -> Result<()> {
    let parsed = load_instructions(instructions)?;

    println!(
        "{} {} directives from {}",
        style("Applying").bold(),
        style(parsed.directives.len()).cyan(),
        instructions.display()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let runner = BatchRunner::new(options);
    let result = runner.run(&parsed, |contract| {
        pb.set_message(format!("Processing {contract}..."));
    });
    pb.finish_and_clear();

    let report = result?;
    print_report(&report);

    if let Some(path) = report_path {
        save_report(&report, path)?;
        println!();
        println!(
            "{} {}",
            style("Report saved to:").green().bold(),
            path.display()
        );
    }

    Ok(())
}

fn print_report(report: &BatchReport) {
    for contract in &report.contracts {
        if let Some(error) = &contract.error {
            println!(
                "  {} {}",
                style(&contract.contract).bold(),
                style(error).red()
            );
            continue;
        }

        println!(
            "  {} applied {}, skipped {}",
            style(&contract.contract).bold(),
            style(contract.applied).green(),
            style(contract.skipped()).yellow()
        );
        for outcome in &contract.directives {
            if let DirectiveStatus::Skipped { reason } = &outcome.status {
                println!("    {} {reason}", style("warning:").yellow().bold());
            }
        }
    }

    for block in &report.skipped_blocks {
        println!(
            "  {} {} {}",
            style(&block.contract).bold(),
            style("skipped:").yellow().bold(),
            block.reason
        );
    }

    println!();
    println!(
        "{} {} directives applied",
        style("Done:").green().bold(),
        report.applied()
    );
}
