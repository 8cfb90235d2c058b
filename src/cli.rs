//! Command line interface for resumatch

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resumatch")]
#[command(about = "Match a resume against a job description")]
#[command(long_about = "Score a resume against a job description with a local term-frequency engine, \
extract shared skills from a taxonomy, and ask an AI collaborator for gap analysis, ATS audits and interview practice")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown, html
        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,

        /// Also write the rendered report to this file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Do not record the analysis in history
        #[arg(long)]
        no_save: bool,

        /// Include category breakdown
        #[arg(short, long)]
        detailed: bool,
    },

    /// ATS compatibility audit of a resume on its own
    Ats {
        #[arg(short, long)]
        resume: PathBuf,

        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,
    },

    /// Browse saved analyses and interview sessions
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Interview preparation
    Interview {
        #[command(subcommand)]
        action: InterviewAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List entries, newest first
    List {
        /// Interview sessions instead of analyses
        #[arg(long)]
        interviews: bool,
    },

    /// Render one entry
    Show {
        id: String,

        #[arg(long)]
        interviews: bool,

        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,
    },

    /// Delete one entry
    Remove {
        id: String,

        #[arg(long)]
        interviews: bool,
    },
}

#[derive(Subcommand)]
pub enum InterviewAction {
    /// Generate one tailored question
    Question {
        #[arg(short, long)]
        resume: PathBuf,

        #[arg(short, long)]
        job: PathBuf,
    },

    /// Answer questions on stdin and get graded
    Practice {
        #[arg(short, long)]
        resume: PathBuf,

        #[arg(short, long)]
        job: PathBuf,

        /// Number of questions
        #[arg(short = 'n', long, default_value_t = 3)]
        rounds: usize,

        /// Use the built-in behavioural questions instead of tailored ones
        #[arg(long)]
        common: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "collaborator.timeout_secs")
        key: String,

        /// Configuration value
        value: String,
    },
}

pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    format.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "resumatch", "analyze", "-r", "cv.pdf", "-j", "job.txt", "-o", "md", "--no-save",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                resume,
                output,
                no_save,
                ..
            } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(output, Some(OutputFormat::Markdown));
                assert!(no_save);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_bad_output_format_rejected() {
        let result = Cli::try_parse_from([
            "resumatch", "ats", "-r", "cv.pdf", "-o", "pdf",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_practice_defaults() {
        let cli = Cli::try_parse_from([
            "resumatch", "--verbose", "interview", "practice", "-r", "cv.md", "-j", "job.md",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Interview {
                action: InterviewAction::Practice { rounds, common, .. },
            } => {
                assert_eq!(rounds, 3);
                assert!(!common);
            }
            _ => panic!("expected interview practice"),
        }
    }
}
