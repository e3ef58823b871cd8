mod commands;
mod host;
mod render;
mod vm;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use exam_core::ExamConfig;
use exam_core::model::{PDF_CONTENT_TYPE, QuestionPaper, paper::sniff_content_type};
use services::{
    ExamLoopService, ExamSession, Phase, SessionCommand, SessionTick, TICK_PERIOD, Tick, Ticker,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use commands::{HELP, Input, LocalAction, parse_line};
use host::{StdoutPrinter, TerminalFullscreen};
use vm::{PaperView, format_clock};

const DEFAULT_LOG_FILTER: &str = "app=info,services=info";

#[derive(Debug, Parser)]
#[command(name = "exam", version, about = "Timed computer-based exam simulator")]
struct Cli {
    /// Exam configuration file (TOML). The built-in 75 question paper is used when absent.
    #[arg(long, env = "EXAM_CONFIG")]
    config: Option<PathBuf>,
    /// Override the exam name from the configuration.
    #[arg(long)]
    exam_name: Option<String>,
    /// Override the duration from the configuration.
    #[arg(long)]
    duration_minutes: Option<u32>,
    /// Sign in immediately with this name.
    #[arg(long)]
    candidate: Option<String>,
    /// Question paper to show alongside each question (PDF only).
    #[arg(long)]
    paper: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ExamConfig> {
    let mut config = match &cli.config {
        Some(path) => ExamConfig::load(path)
            .with_context(|| format!("failed to load exam config {}", path.display()))?,
        None => ExamConfig::default(),
    };
    if let Some(minutes) = cli.duration_minutes {
        config.duration_minutes = minutes;
    }
    Ok(config)
}

async fn load_paper(path: &Path) -> anyhow::Result<QuestionPaper> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let declared = path
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.eq_ignore_ascii_case("pdf"))
        .map(|_| PDF_CONTENT_TYPE);
    let content_type = sniff_content_type(&bytes)
        .or(declared)
        .unwrap_or("application/octet-stream");
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(QuestionPaper::from_upload(name, content_type, bytes)?)
}

struct Shell {
    svc: ExamLoopService,
    session: ExamSession,
    view: PaperView,
    ticker: Option<(Ticker, mpsc::Receiver<Tick>)>,
}

enum Event {
    Line(Option<String>),
    Tick(Tick),
}

impl Shell {
    fn show(&self) {
        println!("\n{}", render::render(&self.session, &self.view, self.svc.is_fullscreen()));
    }

    fn apply(&mut self, command: SessionCommand) {
        match self.svc.dispatch(&mut self.session, command) {
            Ok(()) => self.show(),
            Err(err) => println!("! {err}"),
        }
    }

    async fn attach_paper(&mut self, path: &Path) {
        match load_paper(path).await {
            Ok(paper) => self.apply(SessionCommand::AttachPaper(paper)),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "question paper rejected");
                println!("! {err:#}");
            }
        }
    }

    /// Returns `false` once the user asks to quit.
    async fn handle_line(&mut self, line: &str) -> bool {
        let input = match parse_line(line) {
            Ok(Some(input)) => input,
            Ok(None) => return true,
            Err(err) => {
                println!("! {err}");
                return true;
            }
        };
        match input {
            Input::Session(command) => self.apply(command),
            Input::Local(LocalAction::LoadPaper(path)) => self.attach_paper(&path).await,
            Input::Local(LocalAction::ZoomIn) => {
                println!("viewer height {}px", self.view.zoom_in());
            }
            Input::Local(LocalAction::ZoomOut) => {
                println!("viewer height {}px", self.view.zoom_out());
            }
            Input::Local(LocalAction::Show) => self.show(),
            Input::Local(LocalAction::Help) => println!("{HELP}"),
            Input::Local(LocalAction::Restart) => match self.session.restart() {
                Ok(fresh) => {
                    self.session = fresh;
                    self.view = PaperView::default();
                    self.show();
                }
                Err(err) => println!("! {err}"),
            },
            Input::Local(LocalAction::Quit) => return false,
        }
        true
    }

    fn handle_tick(&mut self, tick: Tick) -> anyhow::Result<()> {
        match self.svc.on_tick(&mut self.session)? {
            SessionTick::Running { remaining_secs } if remaining_secs % 60 == 0 => {
                println!("Time left {}", format_clock(remaining_secs));
            }
            SessionTick::Expired(_) => {
                tracing::debug!(seq = tick.seq, "expiry tick");
                println!("\nTime is up.");
                self.show();
            }
            SessionTick::Running { .. } | SessionTick::Ignored => {}
        }
        Ok(())
    }

    /// Run the ticker exactly while the session is active.
    fn sync_ticker(&mut self) {
        if self.session.phase() == Phase::Active {
            if self.ticker.is_none() {
                self.ticker = Some(Ticker::spawn(TICK_PERIOD));
            }
        } else if let Some((ticker, _)) = self.ticker.take() {
            ticker.cancel();
        }
    }

    async fn next_event(
        &mut self,
        lines: &mut tokio::io::Lines<BufReader<tokio::io::Stdin>>,
    ) -> anyhow::Result<Event> {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line.context("failed to read stdin")?),
            Some(tick) = next_tick(&mut self.ticker) => Event::Tick(tick),
        };
        Ok(event)
    }
}

async fn next_tick(ticker: &mut Option<(Ticker, mpsc::Receiver<Tick>)>) -> Option<Tick> {
    match ticker {
        Some((_, rx)) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let blueprint = Arc::new(config.into_blueprint().context("invalid exam configuration")?);
    tracing::info!(
        exam = blueprint.exam_name(),
        questions = blueprint.total_questions(),
        duration_secs = blueprint.duration_secs(),
        "exam loaded"
    );

    let svc = ExamLoopService::new(Arc::new(TerminalFullscreen::new()), Arc::new(StdoutPrinter));
    let session = ExamSession::new(blueprint)?;
    let mut shell = Shell {
        svc,
        session,
        view: PaperView::default(),
        ticker: None,
    };

    if let Some(name) = &cli.exam_name {
        shell
            .svc
            .dispatch(&mut shell.session, SessionCommand::SetExamName(name.clone()))?;
    }
    if let Some(path) = &cli.paper {
        shell.attach_paper(path).await;
    }
    if let Some(candidate) = &cli.candidate {
        shell.svc.dispatch(
            &mut shell.session,
            SessionCommand::Login {
                candidate_name: candidate.clone(),
            },
        )?;
    }
    shell.show();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match shell.next_event(&mut lines).await? {
            Event::Line(None) => break,
            Event::Line(Some(line)) => {
                if !shell.handle_line(&line).await {
                    break;
                }
            }
            Event::Tick(tick) => shell.handle_tick(tick)?,
        }
        shell.sync_ticker();
    }

    if let Some((ticker, _)) = shell.ticker.take() {
        ticker.cancel();
    }
    tracing::info!(phase = %shell.session.phase(), "exam shell closed");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    run(Cli::parse()).await
}
