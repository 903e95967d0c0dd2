//! alignvis entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::load_from;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod script;
mod session;

use session::{RunSummary, Session};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "alignvis", version, about = "Hidden column and row explorer")]
struct Args {
    /// Script of view commands, one per line. Read from stdin when omitted.
    pub script: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `alignvis.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Absolute column count of the view (overrides `[view] width`).
    #[arg(long = "width")]
    pub width: Option<i64>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn run(&mut self, args: &Args) -> Result<Session> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let mut config = load_from(args.config.clone())?;
        let width = args.width.unwrap_or(config.file.view.width);
        let height = config.file.view.height;
        let columns = config.apply_width(width).to_vec();
        let rows = config.apply_height(height).to_vec();

        let mut session = Session::new(width, config.file.markers.show_hidden);
        session.seed(&columns, &rows)?;

        let source = config.source.as_ref().map(|p| p.to_string_lossy().to_string());
        info!(
            target: "runtime.startup",
            config = source.as_deref(),
            config_override = args.config.is_some(),
            width,
            height,
            hidden_columns = session.columns.size(),
            hidden_rows = session.rows.size(),
            "bootstrap_complete"
        );
        Ok(session)
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("alignvis.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "alignvis.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn run_script(session: &mut Session, script: Option<&Path>) -> Result<RunSummary> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            session.run(BufReader::new(file), &mut out)
        }
        None => session.run(io::stdin().lock(), &mut out),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let mut session = startup.run(&args)?;
    let summary = run_script(&mut session, args.script.as_deref())?;
    if summary.failed > 0 {
        warn!(target: "runtime", failed = summary.failed, "script_had_failures");
    }
    info!(target: "runtime", executed = summary.executed, "shutdown");
    Ok(())
}
