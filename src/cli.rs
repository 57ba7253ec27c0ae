use crate::config::Settings;
use crate::engine::{self, ServiceClient};
use crate::model::{ClientConfig, EnhancementReport, EnhancementResult};
use crate::orchestrator::{EnhancementController, Outcome};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "resume-refiner",
    version,
    about = "AI resume enhancement client with optional TUI"
)]
pub struct Cli {
    /// Base URL of the enhancement service [default: http://localhost:5000]
    #[arg(long)]
    pub base_url: Option<String>,

    /// Resume to submit. A .pdf is sent for text extraction, anything else is read as text ("-" reads stdin)
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Desired job title (optional)
    #[arg(long)]
    pub target_role: Option<String>,

    /// Use a random built-in sample resume
    #[arg(long, conflicts_with = "resume")]
    pub sample: bool,

    /// Print JSON result and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print text result and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Run silently: suppress all output except errors (for scripting)
    #[arg(long)]
    pub silent: bool,

    /// Request timeout [default: 120s]
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Write the improved resume to a .tex file
    #[arg(long)]
    pub export_latex: Option<PathBuf>,

    /// Write the result report as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Path to the config file [default: <config dir>/resume-refiner/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Submit as soon as the TUI launches when a resume is given
    #[arg(long)]
    pub submit_on_launch: bool,
}

impl Cli {
    pub fn is_tui(&self) -> bool {
        !(self.silent || self.json || self.text)
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(p) => Ok(p.clone()),
            None => Settings::default_path(),
        }
    }
}

pub async fn run(args: Cli, settings: Settings) -> Result<()> {
    // Validate that --silent can only be used with --json
    if args.silent && !args.json {
        return Err(anyhow::anyhow!(
            "--silent can only be used with --json. Use --silent --json together."
        ));
    }

    if args.is_tui() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args, settings).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_once(args, settings, false).await;
        }
    }

    let silent = args.silent;
    run_once(args, settings, silent).await
}

/// Build the client configuration; CLI flags take precedence over the config file.
pub fn build_config(args: &Cli, settings: &Settings) -> ClientConfig {
    ClientConfig {
        base_url: args
            .base_url
            .clone()
            .or_else(|| settings.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        timeout: args
            .timeout
            .map(Duration::from)
            .or(settings.timeout)
            .unwrap_or(DEFAULT_TIMEOUT),
        user_agent: format!("resume-refiner/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Read resume text from a path. PDFs go through the extraction endpoint; "-" reads stdin.
pub(crate) async fn read_resume(path: &Path, client: &ServiceClient) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("read resume from stdin")?;
        return Ok(text);
    }
    if engine::is_pdf(path) {
        return client
            .extract_pdf(path)
            .await
            .with_context(|| format!("extract text from {}", path.display()));
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read resume {}", path.display()))
}

/// Resolve resume text and target role for non-interactive runs.
async fn load_input(args: &Cli, client: &ServiceClient) -> Result<(String, Option<String>)> {
    if args.sample {
        let sample = crate::samples::random();
        let role = args
            .target_role
            .clone()
            .unwrap_or_else(|| sample.role.to_string());
        return Ok((sample.text.to_string(), Some(role)));
    }
    let path = args
        .resume
        .as_deref()
        .context("no resume given. Use --resume <path> or --sample")?;
    let text = read_resume(path, client).await?;
    Ok((text, args.target_role.clone()))
}

/// Submit once and print the result. `silent` suppresses everything but errors.
async fn run_once(args: Cli, settings: Settings, silent: bool) -> Result<()> {
    let cfg = build_config(&args, &settings);
    let client = ServiceClient::new(&cfg)?;
    let (resume_text, target_role) = load_input(&args, &client).await?;

    let (out_tx, out_handle) = if silent {
        (None, None)
    } else {
        let (tx, handle) = spawn_output_writer();
        (Some(tx), Some(handle))
    };
    if let Some(tx) = out_tx.as_ref() {
        if !args.json {
            let _ = tx.send(OutputLine::Stderr(format!(
                "Enhancing resume via {}…",
                client.base_url()
            )));
        }
    }

    let controller = EnhancementController::new(Arc::new(client.clone()));
    let outcome = controller
        .submit(&resume_text, target_role.as_deref())
        .await;
    let final_state = controller.presentation();
    tracing::debug!(
        status = ?final_state.status,
        busy = final_state.busy,
        "enhancement request finished"
    );
    let result: EnhancementResult = match outcome {
        Outcome::Success(r) => r,
        Outcome::Failure(e) => return Err(anyhow::Error::new(e).context("enhancement failed")),
        Outcome::Cancelled => anyhow::bail!("enhancement request was cancelled"),
    };

    let report = EnhancementReport::new(client.base_url(), target_role.as_deref(), &result);

    // Handle exports (errors will propagate)
    handle_exports(&args, &report)?;

    if let Some(tx) = out_tx.as_ref() {
        if args.json {
            let out = serde_json::to_string_pretty(&report)?;
            let _ = tx.send(OutputLine::Stdout(out));
        } else {
            for line in crate::text_summary::build_text_summary(&report).lines {
                let _ = tx.send(OutputLine::Stdout(line));
            }
            if let Some(p) = args.export_latex.as_deref() {
                let _ = tx.send(OutputLine::Stderr(format!("Exported LaTeX: {}", p.display())));
            }
            if let Some(p) = args.export_json.as_deref() {
                let _ = tx.send(OutputLine::Stderr(format!("Exported JSON: {}", p.display())));
            }
        }
    }

    if let Some(tx) = out_tx {
        drop(tx);
    }
    if let Some(handle) = out_handle {
        let _ = handle.await;
    }

    Ok(())
}

/// Handle export operations (LaTeX and JSON) for both text and JSON modes.
fn handle_exports(args: &Cli, report: &EnhancementReport) -> Result<()> {
    if let Some(p) = args.export_latex.as_deref() {
        crate::storage::export_latex(p, &report.improved_text)?;
    }
    if let Some(p) = args.export_json.as_deref() {
        crate::storage::export_json(p, report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("resume-refiner").chain(argv.iter().copied()))
    }

    #[test]
    fn flags_override_settings() {
        let settings = Settings {
            base_url: Some("http://config:1".into()),
            timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        let cfg = build_config(
            &parse(&["--base-url", "http://flag:2", "--timeout", "5s"]),
            &settings,
        );
        assert_eq!(cfg.base_url, "http://flag:2");
        assert_eq!(cfg.timeout, Duration::from_secs(5));

        let cfg = build_config(&parse(&[]), &settings);
        assert_eq!(cfg.base_url, "http://config:1");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn defaults_without_settings() {
        let cfg = build_config(&parse(&[]), &Settings::default());
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert!(cfg.user_agent.starts_with("resume-refiner/"));
    }

    #[test]
    fn output_modes_disable_tui() {
        assert!(parse(&[]).is_tui());
        assert!(!parse(&["--text"]).is_tui());
        assert!(!parse(&["--json", "--silent"]).is_tui());
    }

    #[tokio::test]
    async fn silent_requires_json() {
        let err = run(parse(&["--silent", "--sample"]), Settings::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--silent can only be used with --json"));
    }

    #[tokio::test]
    async fn reads_plain_text_resume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe\nProduct Manager").unwrap();
        let client = ServiceClient::new(&build_config(&parse(&[]), &Settings::default())).unwrap();

        let text = read_resume(&path, &client).await.unwrap();
        assert_eq!(text, "Jane Doe\nProduct Manager");
    }

    #[tokio::test]
    async fn sample_fills_role_unless_given() {
        let client = ServiceClient::new(&build_config(&parse(&[]), &Settings::default())).unwrap();
        let (text, role) = load_input(&parse(&["--sample"]), &client).await.unwrap();
        assert!(!text.trim().is_empty());
        assert!(crate::samples::SAMPLE_RESUMES
            .iter()
            .any(|s| Some(s.role) == role.as_deref()));

        let (_, role) = load_input(&parse(&["--sample", "--target-role", "CTO"]), &client)
            .await
            .unwrap();
        assert_eq!(role.as_deref(), Some("CTO"));
    }
}
