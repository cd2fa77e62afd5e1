mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fecviz_common::{init_tracing, Config};
use fecviz_core::{
    filter_category, format_bin_count, load_records, si_currency, write_svg, ContributionRecord,
    Dispatch, HistogramView,
};
use notify::{RecursiveMode, Watcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::{Path, PathBuf};
use std::{io, time::Duration};
use tracing::{info, warn};
use tui::app::{App, StatusKind};
use tui::events::handle_key;
use tui::ui::render;

#[derive(Parser)]
#[command(name = "fecviz", version, about = "Histogram of campaign contribution sizes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal histogram
    View {
        path: String,
        #[arg(long)] state: Option<String>,
        #[arg(long)] watch: bool,
    },
    /// Render the histogram to an SVG file
    Export {
        path: String,
        #[arg(long)] state: Option<String>,
        #[arg(long)] output: Option<String>,
    },
    /// Print bin counts
    Summary {
        path: String,
        #[arg(long)] state: Option<String>,
        #[arg(long)] json: bool,
    },
    /// Print shell completions
    Completions { shell: Shell },
}

fn load(path: &str) -> anyhow::Result<Vec<ContributionRecord>> {
    load_records(Path::new(path)).map_err(|e| anyhow::anyhow!("{path}: {e}"))
}

fn log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fecviz")
        .join("fecviz.log")
}

fn start_stderr_logging() {
    if let Err(e) = init_tracing(io::stderr) {
        eprintln!("fecviz: logging disabled: {e}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();
    match cli.command {
        Commands::View { path, state, watch } => {
            let log_path = log_file();
            if let Some(parent) = log_path.parent() { std::fs::create_dir_all(parent)?; }
            let file = std::fs::OpenOptions::new().create(true).append(true).open(&log_path)?;
            // terminal belongs to the TUI; report before entering raw mode
            if let Err(e) = init_tracing(std::sync::Mutex::new(file)) {
                eprintln!("fecviz: logging disabled: {e}");
            }
            run_tui(path, state, watch, config)?
        }
        Commands::Export { path, state, output } => {
            start_stderr_logging();
            run_export(path, state, output, &config)?
        }
        Commands::Summary { path, state, json } => {
            start_stderr_logging();
            run_summary(path, state, json, &config)?
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "fecviz", &mut io::stdout());
        }
    }
    Ok(())
}

fn rendered_view(records: &[ContributionRecord], config: &Config) -> anyhow::Result<HistogramView> {
    let mut view = HistogramView::with_config("#histogram", Dispatch::detached(), config.histogram.clone())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    view.render(records);
    Ok(view)
}

fn run_export(input_path: String, state: Option<String>, output: Option<String>, config: &Config) -> anyhow::Result<()> {
    let records = filter_category(&load(&input_path)?, state.as_deref());
    let view = rendered_view(&records, config)?;
    let out_path = match output {
        Some(o) => PathBuf::from(o),
        None => Path::new(&config.export.output_dir).join("histogram.svg"),
    };
    write_svg(view.surface(), &out_path).map_err(|e| anyhow::anyhow!("{e}"))?;
    info!(records = records.len(), path = %out_path.display(), "svg exported");
    println!("Exported to {}", out_path.display());
    Ok(())
}

fn run_summary(input_path: String, state: Option<String>, json: bool, config: &Config) -> anyhow::Result<()> {
    let records = filter_category(&load(&input_path)?, state.as_deref());
    let view = rendered_view(&records, config)?;
    if json {
        let doc = serde_json::json!({
            "records": records.len(),
            "state": state,
            "bins": view.bins(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }
    println!("{:<16} {}", "Records:", records.len());
    println!("{:<16} {}", "State:", state.as_deref().unwrap_or("all"));
    for bin in view.bins() {
        let upper = if bin.upper_bound.is_finite() { si_currency(bin.upper_bound, 1) } else { "+".to_string() };
        let range = format!("{}-{}", si_currency(bin.lower_bound, 1), upper);
        println!("{:<16} {:>8}  ({})", range, bin.count, format_bin_count(bin.count));
    }
    Ok(())
}

fn spawn_reload(path: String) -> std::sync::mpsc::Receiver<Result<Vec<ContributionRecord>, String>> {
    let (tx, rx) = std::sync::mpsc::channel();
    tokio::task::spawn_blocking(move || {
        let _ = tx.send(load(&path).map_err(|e| e.to_string()));
    });
    rx
}

fn run_tui(input_path: String, state: Option<String>, watch: bool, config: Config) -> anyhow::Result<()> {
    let records = load(&input_path)?;
    let mut app = App::new(input_path.clone(), config).map_err(|e| anyhow::anyhow!("{e}"))?;
    app.selected_state = state.map(|s| s.to_ascii_uppercase());
    app.set_records(records);
    app.set_status(StatusKind::Info, "Ready | q:quit ?:help");

    // keep the watcher alive for the whole session
    let _watcher = if watch {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let mut w = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(ev) = res {
                if ev.kind.is_modify() || ev.kind.is_create() { let _ = tx.send(()); }
            }
        })?;
        w.watch(Path::new(&input_path), RecursiveMode::NonRecursive)?;
        app.watch_rx = Some(rx);
        Some(w)
    } else {
        None
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick = Duration::from_millis(66); // 15Hz
    loop {
        app.drain_events();
        terminal.draw(|f| render(f, &app))?;
        // coalesce bursts of fs events into one reload
        let changed = app.watch_rx.as_ref().map(|rx| rx.try_iter().count() > 0).unwrap_or(false);
        if changed && app.reload_rx.is_none() {
            app.reload_rx = Some(spawn_reload(input_path.clone()));
        }
        let reloaded = app.reload_rx.as_ref().and_then(|rx| rx.try_recv().ok());
        if let Some(result) = reloaded {
            app.reload_rx = None;
            match result {
                Ok(records) => {
                    info!(records = records.len(), "reloaded");
                    app.set_status(StatusKind::Success, format!("reloaded {} records", records.len()));
                    app.set_records(records);
                }
                Err(e) => {
                    warn!(error = %e, "reload failed");
                    app.set_status(StatusKind::Error, format!("reload failed: {e}"));
                }
            }
        }
        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? { handle_key(&mut app, key); }
        }
        if app.should_quit { break; }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
