//! resumatch: resume and job description matching from the command line

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resumatch::cli::{Cli, Commands, ConfigAction, HistoryAction, InterviewAction};
use resumatch::config::{Config, OutputFormat};
use resumatch::error::ResumatchError;
use resumatch::input::InputManager;
use resumatch::interview::{InterviewCoach, PracticeSession, COMMON_QUESTIONS};
use resumatch::llm::gemini::GeminiClient;
use resumatch::output::formatter::ConsoleFormatter;
use resumatch::output::{save_report_to_file, Report, ReportGenerator};
use resumatch::processing::pipeline::{audit_resume, job_title, MatchingPipeline};
use resumatch::processing::taxonomy::{default_categories, SkillTaxonomy};
use resumatch::storage::History;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            no_save,
            detailed,
        } => {
            let format = output.unwrap_or(config.output.format);
            println!("🚀 Resume match analysis");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Job Description: {}", job.display());

            let mut input_manager = InputManager::new();
            let (resume_text, job_text) = input_manager
                .extract_pair(&resume, &job)
                .await
                .context("Failed to read input documents")?;

            let taxonomy = load_taxonomy(&config)?;
            let client = GeminiClient::from_config(&config.collaborator)?;
            info!("Using collaborator model {}", client.model());
            let pipeline = MatchingPipeline::new(client, taxonomy);

            let history = if no_save {
                History::in_memory()
            } else {
                History::open(&config.storage.history_dir)?
            };

            let progress = spinner("Analyzing with the AI collaborator...");
            let result = pipeline.analyze_and_store(&resume_text, &job_text, &history).await;
            progress.finish_and_clear();
            let record = result?;

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
                true,
            );
            let rendered = generator.generate(Report::Analysis(&record), format)?;
            println!("{}", rendered);
            if format == OutputFormat::Console {
                let groups = pipeline.taxonomy().group_skills(&resume_text);
                println!("{}", ConsoleFormatter::new(config.output.color_output, false).format_skills_found(&groups));
            }

            if let Some(path) = save {
                save_report_to_file(&rendered, &path)?;
                println!("💾 Report saved to {}", path.display());
            }
            if !no_save {
                println!("🗂️  Saved to history as {}", record.id);
            }
        }

        Commands::Ats { resume, output } => {
            let format = output.unwrap_or(config.output.format);
            println!("🤖 ATS audit: {}", resume.display());

            let resume_text = InputManager::new()
                .extract_text(&resume)
                .await
                .with_context(|| format!("Failed to read {}", resume.display()))?;
            let taxonomy = load_taxonomy(&config)?;
            let client = GeminiClient::from_config(&config.collaborator)?;

            let progress = spinner("Auditing resume...");
            let result = audit_resume(&client, &resume_text).await;
            progress.finish_and_clear();
            let report = result?;

            let generator = ReportGenerator::from_config(&config.output);
            println!("{}", generator.generate(Report::Ats(&report), format)?);
            if format == OutputFormat::Console {
                let groups = taxonomy.group_skills(&resume_text);
                println!("{}", ConsoleFormatter::new(config.output.color_output, false).format_skills_found(&groups));
            }
        }

        Commands::History { action } => {
            let history = History::open(&config.storage.history_dir)?;
            run_history(action, &history, &config)?;
        }

        Commands::Interview { action } => run_interview(action, &config).await?,

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumatchError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut updated = config;
                updated.set_value(&key, &value)?;
                updated.save_to(config_path)?;
                println!("✅ {} = {}", key, value);
            }
        },
    }

    Ok(())
}

fn run_history(action: HistoryAction, history: &History, config: &Config) -> anyhow::Result<()> {
    match action {
        HistoryAction::List { interviews: false } => {
            let records = history.analyses.list();
            if records.is_empty() {
                println!("📭 No saved analyses yet");
            }
            for record in records {
                println!(
                    "{}  {}  {:>6}  {}",
                    record.id.dimmed(),
                    format_date(record.timestamp),
                    format!("{:.1}%", record.score).bold(),
                    record.job_title
                );
            }
        }

        HistoryAction::List { interviews: true } => {
            let sessions = history.interviews.list();
            if sessions.is_empty() {
                println!("📭 No saved interview sessions yet");
            }
            for session in sessions {
                println!(
                    "{}  {}  {:>4}  {} ({} questions)",
                    session.id.dimmed(),
                    format_date(session.timestamp),
                    session.overall_score.to_string().bold(),
                    session.job_title,
                    session.turns.len()
                );
            }
        }

        HistoryAction::Show {
            id,
            interviews,
            output,
        } => {
            let format = output.unwrap_or(config.output.format);
            let generator = ReportGenerator::with_options(config.output.color_output, true, true);
            let rendered = if interviews {
                let session = history.interviews.get(&id).ok_or_else(|| not_found(&id))?;
                generator.generate(Report::Interview(&session), format)?
            } else {
                let record = history.analyses.get(&id).ok_or_else(|| not_found(&id))?;
                generator.generate(Report::Analysis(&record), format)?
            };
            println!("{}", rendered);
        }

        HistoryAction::Remove { id, interviews } => {
            let (before, after) = if interviews {
                let before = history.interviews.len();
                (before, history.interviews.remove(&id)?.len())
            } else {
                let before = history.analyses.len();
                (before, history.analyses.remove(&id)?.len())
            };

            if before == after {
                println!("⚠️  No entry with id {}", id);
            } else {
                println!("🗑️  Removed {} ({} remaining)", id, after);
            }
        }
    }
    Ok(())
}

async fn run_interview(action: InterviewAction, config: &Config) -> anyhow::Result<()> {
    match action {
        InterviewAction::Question { resume, job } => {
            let (resume_text, job_text) = read_pair(&resume, &job).await?;
            let coach = InterviewCoach::new(GeminiClient::from_config(&config.collaborator)?);

            let progress = spinner("Preparing a question...");
            let question = coach.next_question(&resume_text, &job_text).await;
            progress.finish_and_clear();

            println!("🎤 {}", question.bold());
        }

        InterviewAction::Practice {
            resume,
            job,
            rounds,
            common,
        } => {
            let (resume_text, job_text) = read_pair(&resume, &job).await?;
            let coach = InterviewCoach::new(GeminiClient::from_config(&config.collaborator)?);
            let history = History::open(&config.storage.history_dir)?;
            let mut session = PracticeSession::new(job_title(&job_text));
            let mut stdin = BufReader::new(tokio::io::stdin()).lines();

            println!("🎤 Interview practice: {}", session.job_title());
            println!("Answer each question, then submit with an empty line.\n");

            for round in 0..rounds {
                let question = if common {
                    COMMON_QUESTIONS[round % COMMON_QUESTIONS.len()].to_string()
                } else {
                    let progress = spinner("Preparing a question...");
                    let question = coach.next_question(&resume_text, &job_text).await;
                    progress.finish_and_clear();
                    question
                };
                println!("{} {}", format!("Q{}:", round + 1).cyan().bold(), question);

                let mut answer = String::new();
                while let Some(line) = stdin.next_line().await? {
                    if line.trim().is_empty() {
                        break;
                    }
                    answer.push_str(&line);
                    answer.push('\n');
                }

                if answer.trim().is_empty() {
                    println!("⏭️  No answer given, ending practice\n");
                    break;
                }

                let progress = spinner("Evaluating your answer...");
                let result = coach.evaluate(&question, answer.trim(), &job_text).await;
                progress.finish_and_clear();

                match result {
                    Ok(turn) => {
                        println!(
                            "{} {:.0}/100\n{}\n",
                            "Score:".bold(),
                            turn.feedback.score,
                            turn.feedback.feedback
                        );
                        session.record(turn);
                    }
                    Err(e) => println!("❌ Could not evaluate this answer: {}\n", e),
                }
            }

            match session.finish() {
                Some(finished) => {
                    history.interviews.append(finished.clone())?;
                    let generator = ReportGenerator::from_config(&config.output);
                    println!("{}", generator.generate(Report::Interview(&finished), OutputFormat::Console)?);
                }
                None => println!("📭 No answers recorded, session not saved"),
            }
        }
    }
    Ok(())
}

fn load_taxonomy(config: &Config) -> resumatch::Result<Arc<SkillTaxonomy>> {
    let taxonomy = match &config.taxonomy.path {
        Some(path) => {
            info!("Loading skill taxonomy from {}", path.display());
            SkillTaxonomy::from_toml_file(path)?
        }
        None => SkillTaxonomy::new(default_categories())?,
    };
    Ok(Arc::new(taxonomy))
}

async fn read_pair(resume: &Path, job: &Path) -> anyhow::Result<(String, String)> {
    let pair = InputManager::new()
        .extract_pair(resume, job)
        .await
        .context("Failed to read input documents")?;
    Ok(pair)
}

fn spinner(message: &str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.set_message(message.to_string());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn format_date(millis: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn not_found(id: &str) -> ResumatchError {
    ResumatchError::InvalidInput(format!("No history entry with id {}", id))
}
