// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::keep_alive::KeepAliveService;
use crate::search::JobSearchService;
use crate::types::{Job, JobSearchResponse, SearchCriteria};
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "job-finder")]
#[command(about = "Aggregate job postings and rank them by relevance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,
    /// Run one search and print the ranked jobs
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    #[arg(long)]
    pub position: String,
    #[arg(long, default_value = "")]
    pub location: String,
    /// Comma-separated skills
    #[arg(long, default_value = "")]
    pub skills: String,
    #[arg(long, default_value = "")]
    pub experience: String,
    #[arg(long, default_value = "")]
    pub salary: String,
    /// remote, onsite or hybrid
    #[arg(long, default_value = "")]
    pub work_mode: String,
    #[arg(long)]
    pub min_score: Option<f64>,
    #[arg(long)]
    pub max_results: Option<usize>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
    /// File or directory to write to instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl SearchArgs {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria::new(&self.position, &self.location)
            .with_skills(&self.skills)
            .with_experience(&self.experience)
            .with_salary(&self.salary)
            .with_work_mode(&self.work_mode)
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Command::Serve => serve(config).await,
        Command::Search(args) => search_once(args, config).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let service = Arc::new(JobSearchService::from_config(&config)?);

    let keep_alive = KeepAliveService::new(&config.keep_alive)?;
    if config.keep_alive.enabled {
        keep_alive.start();
    }

    let result = start_web_server(service, &config.server).await;
    keep_alive.stop().await;
    result
}

async fn search_once(args: SearchArgs, config: AppConfig) -> Result<()> {
    let service = JobSearchService::from_config(&config)?;
    let min_score = args.min_score.unwrap_or(config.search.min_score);
    let max_results = args.max_results.unwrap_or(config.search.max_results);

    let outcome = service
        .search_with(&args.criteria(), min_score, max_results)
        .await?;
    let jobs = outcome.into_jobs();
    info!("Search finished with {} relevant jobs", jobs.len());

    match &args.output {
        Some(path) => {
            let path = resolve_output(path, args.format);
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            export(&jobs, args.format, file)?;
            info!("Results written to {}", path.display());
        }
        None => export(&jobs, args.format, std::io::stdout().lock())?,
    }
    Ok(())
}

/// A directory gets a timestamped file name inside it.
fn resolve_output(path: &Path, format: ExportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(format!(
            "job_search_results_{}.{}",
            chrono::Utc::now().format("%Y%m%d_%H%M%S"),
            format.extension()
        ))
    } else {
        path.to_path_buf()
    }
}

pub fn export<W: Write>(jobs: &[Job], format: ExportFormat, mut writer: W) -> Result<()> {
    match format {
        ExportFormat::Json => {
            let body = JobSearchResponse {
                relevant_jobs: jobs.to_vec(),
            };
            serde_json::to_writer_pretty(&mut writer, &body).context("Failed to write JSON")?;
            writeln!(writer)?;
        }
        ExportFormat::Csv => write_csv(jobs, writer)?,
    }
    Ok(())
}

pub fn write_csv<W: Write>(jobs: &[Job], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "title",
        "company",
        "location",
        "work_mode",
        "experience",
        "salary",
        "score",
        "apply_url",
    ])?;

    for job in jobs {
        let score = format!("{:.2}", job.score());
        csv.write_record([
            job.title.as_str(),
            job.company.as_str(),
            job.location.as_str(),
            job.work_mode.as_str(),
            job.experience.as_str(),
            job.salary.as_str(),
            score.as_str(),
            job.apply_url.as_str(),
        ])?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}
