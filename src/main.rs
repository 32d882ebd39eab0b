//! CLI entry point for the class grade engine.
//!
//! Provides subcommands for generating class reports and for running the
//! two-phase spreadsheet grade import against a persisted class file.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use class_grade_engine::class::Class;
use class_grade_engine::enrollment::EvaluationKind;
use class_grade_engine::import::{ImportGoalColumns, ImportReconciler};
use class_grade_engine::output::{print_json, write_json};
use class_grade_engine::report::ReportAggregator;
use class_grade_engine::repository::{ClassRepository, InMemoryClassRepository};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "class_grade_engine")]
#[command(about = "Grade computation and spreadsheet import for academic classes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a class report from a persisted class file
    Report {
        /// Path to the class JSON file
        #[arg(short, long)]
        class: PathBuf,

        /// Optional file to write the report JSON to (stdout otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import grades from a CSV/XLSX spreadsheet into a class
    Import {
        /// Path to the class JSON file (updated in place on success)
        #[arg(short, long)]
        class: PathBuf,

        /// Spreadsheet to import
        #[arg(short, long)]
        file: PathBuf,

        /// Which ledger to import into: "evaluation" or "self-evaluation"
        #[arg(short, long, default_value = "evaluation")]
        kind: String,

        /// Column mappings, e.g. --map "CPF Number=cpf" --map "Req=Requirements".
        /// Unmapped file columns that match an expected column map to themselves.
        #[arg(short, long)]
        map: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/class_grade_engine.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("class_grade_engine.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { class, output } => {
            let mut repository = InMemoryClassRepository::new();
            let id = repository.insert(load_class(&class)?);

            let report = ReportAggregator::new().generate(repository.get(id).unwrap());
            info!(
                students = report.students.len(),
                goals = report.goals.len(),
                average = ?report.students_average,
                "report generated"
            );

            match output {
                Some(path) => write_json(&path, &report)?,
                None => print_json(&report)?,
            }
        }
        Commands::Import {
            class,
            file,
            kind,
            map,
        } => {
            let kind = parse_kind(&kind)?;
            let mut repository = InMemoryClassRepository::new();
            let id = repository.insert(load_class(&class)?);

            let columns = ImportGoalColumns::uniform(
                repository.get(id).unwrap().metas().to_vec(),
            );
            let reconciler = ImportReconciler::new(columns);

            let discovery = reconciler.discover(&file, kind).await?;
            info!(
                file_columns = ?discovery.file_columns,
                expected_columns = ?discovery.expected_columns,
                "import headers discovered"
            );

            let mapping = build_mapping(
                &discovery.file_columns,
                &discovery.expected_columns,
                &map,
            )?;

            let records = reconciler
                .apply(
                    repository.get_mut(id).unwrap(),
                    discovery.session_token,
                    &mapping,
                )
                .await?;
            info!(rows = records.len(), "import applied");

            save_class(&class, repository.get(id).unwrap())?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}

fn parse_kind(kind: &str) -> Result<EvaluationKind> {
    match kind {
        "evaluation" => Ok(EvaluationKind::Evaluation),
        "self-evaluation" => Ok(EvaluationKind::SelfEvaluation),
        other => bail!("unknown evaluation kind {other:?} (expected \"evaluation\" or \"self-evaluation\")"),
    }
}

fn load_class(path: &Path) -> Result<Class> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read class file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse class file {}", path.display()))
}

fn save_class(path: &Path, class: &Class) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(class)?)
        .with_context(|| format!("failed to write class file {}", path.display()))?;
    info!(path = %path.display(), "class saved");
    Ok(())
}

/// File columns matching an expected column map to themselves; explicit
/// `COL=GOAL` pairs are added on top and win over the identity mapping.
fn build_mapping(
    file_columns: &[String],
    expected_columns: &[String],
    overrides: &[String],
) -> Result<HashMap<String, String>> {
    let mut mapping: HashMap<String, String> = file_columns
        .iter()
        .filter(|column| expected_columns.contains(column))
        .map(|column| (column.clone(), column.clone()))
        .collect();

    for entry in overrides {
        let Some((column, goal)) = entry.split_once('=') else {
            bail!("invalid --map entry {entry:?} (expected COL=GOAL)");
        };
        mapping.insert(column.trim().to_string(), goal.trim().to_string());
    }

    Ok(mapping)
}
