use arena_tap::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    device::DeviceInfo,
    history::HistoryDb,
    logging,
    runtime::{ArenaEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    terminal::{install_panic_hook, restore_terminal, setup_terminal},
    ui::screen::draw,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::tty::IsTty;
use ratatui::{backend::Backend, layout::Rect, Terminal};
use std::{error::Error, io::stdin, path::PathBuf, time::Instant};

/// target-tapping reaction test for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Click or tap the target as many times as you can before the countdown runs out. Shows score, time and accuracy along with what the terminal reports about your device."
)]
pub struct Cli {
    /// number of seconds per round
    #[clap(short = 's', long)]
    secs: Option<u32>,

    /// target width in terminal cells
    #[clap(long)]
    target_width: Option<u16>,

    /// target height in terminal cells
    #[clap(long)]
    target_height: Option<u16>,

    /// do not record finished rounds to the history database
    #[clap(long)]
    no_history: bool,

    /// write logs here instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line flags over the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(secs) = self.secs {
            cfg.round_secs = secs;
        }
        if let Some(w) = self.target_width {
            cfg.target_width = w;
        }
        if let Some(h) = self.target_height {
            cfg.target_height = h;
        }
        if self.no_history {
            cfg.record_history = false;
        }
        cfg
    }
}

fn open_history(config: &Config) -> Option<HistoryDb> {
    if !config.record_history {
        return None;
    }

    match HistoryDb::new() {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!(error = %e, "history unavailable");
            None
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        if let Err(e) = logging::init(&path) {
            eprintln!("logging disabled: {}", e);
        }
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "config saved");
    }

    let history = open_history(&config);

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = run(&mut terminal, &config, history, runner);

    // restore even when the session failed
    restore_terminal(&mut terminal)?;

    result.map(|_| ())
}

/// Everything that happens on the alternate screen. Errors are returned to
/// `main` so the terminal is always restored.
fn run<B, E, T>(
    terminal: &mut Terminal<B>,
    config: &Config,
    history: Option<HistoryDb>,
    runner: Runner<E, T>,
) -> Result<App, Box<dyn Error>>
where
    B: Backend,
    E: ArenaEventSource,
    T: Ticker,
{
    let size = terminal.size()?;
    let device = DeviceInfo::probe(size.width, size.height);
    tracing::info!(?device, "device probed");

    let mut app = App::new(
        config.session_config(),
        device,
        history,
        Rect::new(0, 0, size.width, size.height),
    );

    let looped = event_loop(terminal, &mut app, &runner);
    app.shutdown();
    looped?;

    Ok(app)
}

fn event_loop<B, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    E: ArenaEventSource,
    T: Ticker,
{
    terminal.draw(|f| draw(app, f))?;

    while !app.should_quit {
        let event = runner.step();
        if app.handle(event, Instant::now()) {
            terminal.draw(|f| draw(app, f))?;
        }
    }

    Ok(())
}
