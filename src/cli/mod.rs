//! CLI module for S.A.G.E.
//!
//! Provides command-line interface parsing for the `sage` binary. Uses clap
//! for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// S.A.G.E - School Assistant Grounded Engine
///
/// A retrieval-augmented question answering assistant with input and output
/// safety guardrails.
#[derive(Parser, Debug)]
#[command(
    name = "sage",
    version,
    about = "S.A.G.E - School Assistant Grounded Engine",
    long_about = "A retrieval-augmented question answering assistant over a school document\n\
                  corpus, with mandatory input/output safety guardrails around generation.\n\n\
                  Run `sage ingest <path>` once to index a corpus, then `sage chat` to talk\n\
                  to it (the default when no subcommand is given).",
    after_help = "EXAMPLES:\n    \
                  sage init                     # Write a default sage.toml\n    \
                  sage ingest ./school_data     # Index a corpus of .txt/.md files\n    \
                  sage ask \"When is the Hindi exam for SA1?\"\n    \
                  sage chat                     # Interactive session\n    \
                  sage eval                     # Score the pipeline on eval cases"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "sage.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a sage.toml (and .env.example) in a directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
    },

    /// Ingest a corpus: load, chunk, embed, and index text documents
    ///
    /// Re-running replaces the collection rather than merging into it.
    Ingest {
        /// A text file or a directory of .txt/.md files
        path: PathBuf,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question
        question: String,
    },

    /// Interactive chat session (/clear resets history, /quit exits)
    Chat,

    /// Evaluate the pipeline against question/ground-truth cases
    Eval {
        /// TOML file with [[cases]] entries; built-in cases when omitted
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Where to write the JSON report
        #[arg(long, default_value = "evaluation_report.json")]
        output: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Validate the configuration file and exit
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
