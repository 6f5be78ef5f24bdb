// sortty: step through sorting algorithms one operation at a time

use std::fs::File;
use std::io;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use sortty::config::{Cli, Config};
use sortty::driver::{run_all, run_all_threaded};
use sortty::errors::ConfigError;
use sortty::ui::App;

/// Headless runs log to stderr. The TUI owns the terminal, so it only logs
/// when given a file.
fn init_tracing(config: &Config) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(&config.log_level).map_err(|source| ConfigError::LogFilter {
        filter: config.log_level.clone(),
        source,
    })?;

    match (&config.log_file, config.headless) {
        (Some(path), _) => {
            let file = File::create(path).map_err(|source| ConfigError::LogFile {
                path: path.clone(),
                source,
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| ConfigError::Subscriber(e.to_string()))?;
        }
        (None, true) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init()
                .map_err(|e| ConfigError::Subscriber(e.to_string()))?;
        }
        (None, false) => {}
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_cli(Cli::parse())?;
    init_tracing(&config)?;

    if config.headless {
        let values = config.values();
        println!(
            "layout={} seed={} n={}",
            config.layout,
            config.seed,
            values.len()
        );
        let reports = if config.threaded.is_empty() {
            run_all(&config.algorithms, &values)?
        } else {
            run_all_threaded(&config.threaded, &values)?
        };
        for report in reports {
            println!("{}", report);
        }
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
