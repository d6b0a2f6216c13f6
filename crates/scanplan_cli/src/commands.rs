//! CLI argument definitions and dispatch.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::info;
use scanplan_core::db::open_db;
use scanplan_core::derive::study::{ocr_sample, upload_summaries, StudyOverview, UploadSummary};
use scanplan_core::model::study::StudyModule;
use scanplan_core::mutate::finance::parse_amount;
use scanplan_core::{
    core_version, init_logging, AnswerAction, CoreConfig, ExpenseRow, FileMeta, FinanceService,
    KeyValueRepository, SqliteKeyValueRepository, StudyService, Tone,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "scanplan")]
#[command(about = "Local study-scan and finance planner state engine")]
#[command(version)]
pub struct Cli {
    /// SQLite file holding local storage (overrides SCANPLAN_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling logs (overrides SCANPLAN_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides SCANPLAN_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Study Scan app
    Study {
        #[command(subcommand)]
        command: StudyCommands,
    },
    /// Finance Planner app
    Finance {
        #[command(subcommand)]
        command: FinanceCommands,
    },
    /// List stored namespace keys
    Keys,
}

#[derive(Subcommand)]
enum StudyCommands {
    /// Print the stored document
    Show,
    /// Record files from disk (metadata only)
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Add a video or web link
    Link { url: String },
    /// Remove an upload by position
    RemoveUpload { index: usize },
    /// Remove a link by position
    RemoveLink { index: usize },
    /// Update profile fields; unspecified fields keep their value
    Profile(ProfileArgs),
    /// Replace the manual notes text
    Notes { text: String },
    /// Run the simulated scan
    Scan,
    /// Generate answers for every detected question
    Generate,
    /// Remove all generated answers
    ClearAnswers,
    /// Refine one answer: regenerate|more|shorter|diagram
    Action { action: AnswerAction, id: String },
    /// Answered/total progress
    Progress,
    /// Dashboard stats, upload summaries and OCR preview
    Overview,
    /// Delete the stored document
    Clear,
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    class_level: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    board: Option<String>,
    /// 2|5|8|10|15; other values use the 10-mark template
    #[arg(long)]
    marks: Option<u32>,
    /// simple|exam|detailed
    #[arg(long, value_parser = parse_tone)]
    tone: Option<Tone>,
    #[arg(long)]
    examples: Option<bool>,
    #[arg(long)]
    diagrams: Option<bool>,
    #[arg(long)]
    strict: Option<bool>,
    #[arg(long)]
    offline_mode: Option<String>,
    #[arg(long)]
    language: Option<String>,
}

#[derive(Subcommand)]
enum FinanceCommands {
    /// Print the stored document
    Show,
    /// Set monthly income
    Income { amount: String },
    /// Edit expense rows
    Expense {
        #[command(subcommand)]
        command: ExpenseCommands,
    },
    /// Set the savings goal
    Goal {
        name: String,
        amount: String,
        years: String,
    },
    /// Set retirement inputs
    Retirement {
        age: String,
        target_age: String,
        target_amount: String,
    },
    /// Totals, breakdown, goal and retirement projections
    Summary,
    /// Delete the stored document
    Clear,
}

#[derive(Subcommand)]
enum ExpenseCommands {
    /// Append one row
    Add { name: String, amount: String },
    /// Remove a row by position
    Remove { index: usize },
    /// Replace all rows with NAME=AMOUNT pairs
    Set {
        #[arg(value_parser = parse_expense_row)]
        rows: Vec<ExpenseRow>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StudyDashboard<'a> {
    overview: StudyOverview,
    uploads: Vec<UploadSummary>,
    modules: &'a [StudyModule],
    ocr_sample: &'a str,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;

    match cli.command {
        Commands::Study { command } => run_study(command, SqliteKeyValueRepository::new(&conn)),
        Commands::Finance { command } => {
            run_finance(command, SqliteKeyValueRepository::new(&conn))
        }
        Commands::Keys => print_json(&SqliteKeyValueRepository::new(&conn).keys()?),
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let mut config = CoreConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run_study(command: StudyCommands, repo: SqliteKeyValueRepository<'_>) -> anyhow::Result<()> {
    let service = StudyService::new(repo);
    match command {
        StudyCommands::Show => print_json(&service.document()?),
        StudyCommands::Upload { files } => {
            let metas = files
                .iter()
                .map(|path| file_meta(path.as_path()))
                .collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&service.add_uploads(metas)?.uploads)
        }
        StudyCommands::Link { url } => print_json(&service.add_link(&url)?.links),
        StudyCommands::RemoveUpload { index } => {
            print_json(&service.remove_upload(index)?.uploads)
        }
        StudyCommands::RemoveLink { index } => print_json(&service.remove_link(index)?.links),
        StudyCommands::Profile(args) => {
            let mut profile = service.document()?.profile;
            apply_profile_args(&mut profile, args);
            print_json(&service.save_inputs(profile, None)?.profile)
        }
        StudyCommands::Notes { text } => {
            let profile = service.document()?.profile;
            let doc = service.save_inputs(profile, Some(&text))?;
            print_json(&doc.manual_text)
        }
        StudyCommands::Scan => print_json(&service.run_scan()?.questions),
        StudyCommands::Generate => print_json(&service.generate_answers()?.answers),
        StudyCommands::ClearAnswers => print_json(&service.clear_answers()?.answers),
        StudyCommands::Action { action, id } => {
            let doc = service.apply_answer_action(action, &id)?;
            match doc.answer(&id) {
                Some(answer) => print_json(answer),
                None => bail!("no answer with id `{id}`"),
            }
        }
        StudyCommands::Progress => print_json(&service.progress()?),
        StudyCommands::Overview => {
            let doc = service.document()?;
            print_json(&StudyDashboard {
                overview: service.overview()?,
                uploads: upload_summaries(&doc),
                modules: &doc.modules,
                ocr_sample: ocr_sample(&doc),
            })
        }
        StudyCommands::Clear => print_json(&service.clear_all()?),
    }
}

fn run_finance(
    command: FinanceCommands,
    repo: SqliteKeyValueRepository<'_>,
) -> anyhow::Result<()> {
    let service = FinanceService::new(repo);
    match command {
        FinanceCommands::Show => print_json(&service.document()?),
        FinanceCommands::Income { amount } => {
            print_json(&service.set_income(parse_amount(&amount))?)
        }
        FinanceCommands::Expense { command } => {
            let doc = match command {
                ExpenseCommands::Add { name, amount } => {
                    service.add_expense(ExpenseRow::parse(&name, &amount))?
                }
                ExpenseCommands::Remove { index } => service.remove_expense(index)?,
                ExpenseCommands::Set { rows } => service.set_expenses(rows)?,
            };
            print_json(&doc.expenses)
        }
        FinanceCommands::Goal {
            name,
            amount,
            years,
        } => print_json(&service.set_goal(&name, parse_amount(&amount), parse_amount(&years))?),
        FinanceCommands::Retirement {
            age,
            target_age,
            target_amount,
        } => print_json(&service.set_retirement(
            parse_amount(&age),
            parse_amount(&target_age),
            parse_amount(&target_amount),
        )?),
        FinanceCommands::Summary => print_json(&service.overview()?),
        FinanceCommands::Clear => print_json(&service.clear_all()?),
    }
}

fn apply_profile_args(profile: &mut scanplan_core::Profile, args: ProfileArgs) {
    if let Some(value) = args.class_level {
        profile.class_level = value;
    }
    if let Some(value) = args.subject {
        profile.subject = value;
    }
    if let Some(value) = args.board {
        profile.board = value;
    }
    if let Some(value) = args.marks {
        profile.marks = value;
    }
    if let Some(value) = args.tone {
        profile.tone = value;
    }
    if let Some(value) = args.examples {
        profile.include_examples = value;
    }
    if let Some(value) = args.diagrams {
        profile.include_diagrams = value;
    }
    if let Some(value) = args.strict {
        profile.strict_mode = value;
    }
    if let Some(value) = args.offline_mode {
        profile.offline_mode = value;
    }
    if let Some(value) = args.language {
        profile.language = value;
    }
}

fn file_meta(path: &Path) -> anyhow::Result<FileMeta> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("cannot read `{}`", path.display()))?;
    if !metadata.is_file() {
        bail!("`{}` is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("`{}` has no file name", path.display()))?;
    Ok(FileMeta::new(name, metadata.len()))
}

fn parse_tone(value: &str) -> Result<Tone, String> {
    Tone::parse(value).ok_or_else(|| format!("unknown tone `{value}`; expected simple|exam|detailed"))
}

fn parse_expense_row(value: &str) -> Result<ExpenseRow, String> {
    let (name, amount) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got `{value}`"))?;
    Ok(ExpenseRow::parse(name, amount))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
