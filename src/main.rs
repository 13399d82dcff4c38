// fungetty: Time-Travel Befunge-93 Debugger

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::sync::Arc;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use fungetty::befunge93::{load_program, Befunge93};
use fungetty::config::{Config, Mode};
use fungetty::constants::DEFAULT_RECORD_TICKS;
use fungetty::debugger::Debugger;
use fungetty::engine::{Engine, RunOutcome};
use fungetty::io::{FungeInput, FungeOutput, ReaderInput, WriterOutput, INPUT, OUTPUT};
use fungetty::ip::SharedState;
use fungetty::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_args();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .init();

    if !Path::new(&config.program).exists() {
        eprintln!("Error: File '{}' not found", config.program.display());
        std::process::exit(1);
    }

    // Read source code; Befunge programs are byte grids, not necessarily UTF-8
    let bytes = fs::read(&config.program)?;
    let source = String::from_utf8_lossy(&bytes);
    let grid = load_program(&source)?;

    let language = Arc::new(match config.seed {
        Some(seed) => Befunge93::with_seed(seed),
        None => Befunge93::new(),
    });

    let mut shared = SharedState::new();
    let input: Box<dyn FungeInput> = match &config.input {
        Some(path) => Box::new(ReaderInput::new(BufReader::new(File::open(path)?))),
        None => Box::new(ReaderInput::new(BufReader::new(io::stdin()))),
    };
    shared.insert(&INPUT, input);

    match config.mode {
        Mode::Run => {
            let output: Box<dyn FungeOutput> = Box::new(WriterOutput::new(io::stdout()));
            shared.insert(&OUTPUT, output);
            let mut engine = Engine::start(grid.into(), language, shared)?;
            let outcome = match config.max_ticks {
                Some(max_ticks) => engine.run_for(max_ticks),
                None => engine.spawn().and_then(|handle| handle.join()).map(RunOutcome::Halted),
            };
            io::stdout().flush()?;
            match outcome {
                Ok(RunOutcome::Halted(_)) => {}
                Ok(RunOutcome::TickLimit) => {
                    eprintln!();
                    eprintln!("Stopped after {} ticks", config.max_ticks.unwrap_or(0));
                }
                Err(e) if e.is_input_fault() => {
                    eprintln!();
                    eprintln!("Input error: {}", e);
                    std::process::exit(2);
                }
                Err(e) => {
                    eprintln!();
                    eprintln!("Runtime error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Mode::Tui => {
            let engine = Engine::start(grid.into(), language, shared)?;

            // Run execution to build history
            eprintln!("Recording {}...", config.program.display());
            let debugger = Debugger::record(
                engine,
                config.snapshot_limit,
                config.max_ticks.unwrap_or(DEFAULT_RECORD_TICKS),
            )?;
            eprintln!(
                "Recorded {} snapshots; run {}.",
                debugger.total_snapshots(),
                debugger.outcome()
            );

            // Set up terminal
            enable_raw_mode()?;
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;

            // Create and run app
            let mut app = App::new(debugger);
            let res = app.run(&mut terminal);

            // Restore terminal
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;

            if let Err(err) = res {
                eprintln!("Error: {:?}", err);
            }
        }
    }

    Ok(())
}
