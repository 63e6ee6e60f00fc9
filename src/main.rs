use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use ao3_report::{
    aggregate, extract_stories, read_file_text, repair, top_stories,
    Extraction,
};

mod export;
mod render;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank stories by rating or word count.
    Top {
        /// Field to rank by, "rating" or "words".
        #[arg(long, default_value = "rating")]
        sort: String,

        /// How many rows to show.
        #[arg(short = 'n', long, default_value = "100")]
        count: usize,

        /// Input file path.
        input: PathBuf,
    },

    /// Show the most frequent entries of a category.
    Frequency {
        /// One of "ratings", "characters", "series", "authors".
        category: String,

        /// How many rows to show.
        #[arg(short = 'n', long, default_value = "100")]
        count: usize,

        /// Input file path.
        input: PathBuf,
    },

    /// Draw a category's frequencies as an SVG bar chart.
    Histogram {
        /// One of "ratings", "characters", "series", "authors".
        category: String,

        /// Output file, defaults to a chart named after the category next
        /// to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input file path.
        input: PathBuf,
    },

    /// Write a category's frequency table out as CSV.
    Export {
        /// One of "ratings", "characters", "series", "authors".
        category: String,

        /// Output file path, defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input file path.
        input: PathBuf,
    },

    /// Parse the input and report malformed entries without generating a
    /// report.
    Check {
        /// Input file path.
        input: PathBuf,
    },

    /// Rewrite unlinked author lines from the old export format, writing
    /// the result to a `_repaired` sibling file.
    Repair {
        /// Input file path.
        input: PathBuf,
    },
}

use Commands::*;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Top { sort, count, input } => {
            let extraction = load(&input)?;
            let (top, diagnostics) =
                top_stories(&extraction.stories, sort.parse()?, count);
            for d in &diagnostics {
                eprintln!("{d}");
            }
            render::stories_table(&top);
            Ok(())
        }

        Frequency {
            category,
            count,
            input,
        } => {
            let category = category.parse()?;
            let extraction = load(&input)?;
            let rows = aggregate(&extraction.stories).ranked(category, count);
            render::frequency_table(&rows, category);
            Ok(())
        }

        Histogram {
            category,
            output,
            input,
        } => {
            let category = category.parse()?;
            let extraction = load(&input)?;
            let rows =
                aggregate(&extraction.stories).ranked(category, usize::MAX);
            let output = output.unwrap_or_else(|| {
                input.with_file_name(format!("{category}_histogram.svg"))
            });
            render::histogram(&rows, category, &output)?;
            println!("Histogram written to {}", output.display());
            Ok(())
        }

        Export {
            category,
            output,
            input,
        } => {
            let category = category.parse()?;
            let extraction = load(&input)?;
            let rows =
                aggregate(&extraction.stories).ranked(category, usize::MAX);
            export::run(&rows, output.as_deref())
        }

        Check { input } => {
            let (text, encoding) = read_file_text(&input)?;
            let extraction = extract_stories(&text);
            for d in &extraction.diagnostics {
                println!("{d}");
            }
            println!(
                "{} stories, {} problems ({} input)",
                extraction.stories.len(),
                extraction.diagnostics.len(),
                encoding.name()
            );
            Ok(())
        }

        Repair { input } => {
            let target = repair::repair_file(&input)?;
            println!("Repaired copy written to {}", target.display());
            Ok(())
        }
    }
}

/// Read and extract an input file, surfacing diagnostics on stderr.
fn load(path: &Path) -> Result<Extraction> {
    let (text, _) = read_file_text(path)?;
    let extraction = extract_stories(&text);
    for d in &extraction.diagnostics {
        eprintln!("{d}");
    }
    Ok(extraction)
}
