//! ParamLab TUI — experiment form with mouse-driven interval selectors.
//!
//! Usage: `paramlab-tui [CONFIG.toml]`. Without an argument the config is
//! read from `{config_dir}/paramlab/paramlab.toml` when present.

mod app;
mod input;
mod logging;
mod persistence;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use paramlab_runner::{ExperimentConfigController, ExperimentDraft, LabConfig};

use crate::app::AppState;

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stderr(),
            DisableMouseCapture,
            DisableFocusChange,
            LeaveAlternateScreen
        );
        default_hook(info);
    }));

    // Paths
    let app_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paramlab");
    let state_path = app_dir.join("state.json");

    let _log_guard = logging::init_logging(&app_dir)?;

    // Config, then persisted state on top
    let config = load_config(std::env::args_os().nth(1).map(PathBuf::from), &app_dir)?;
    let draft = ExperimentDraft {
        title: config.experiment.title.clone(),
        provider: config.experiment.provider,
        model: config.experiment.model.clone(),
        ..ExperimentDraft::default()
    };
    let mut app = AppState::new(ExperimentConfigController::from_config(&config), draft);
    if let Some(persisted) = persistence::load(&state_path) {
        persistence::apply(&mut app, persisted);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = terminal.size()?;
    app.set_viewport(Rect::new(0, 0, size.width, size.height));

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(err) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %err, "could not save state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn load_config(explicit: Option<PathBuf>, app_dir: &std::path::Path) -> Result<LabConfig> {
    match explicit {
        Some(path) => LabConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => {
            let path = app_dir.join("paramlab.toml");
            if path.exists() {
                Ok(LabConfig::from_file(&path)?)
            } else {
                Ok(LabConfig::default())
            }
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::FocusLost => input::handle_focus_lost(app),
                Event::Resize(width, height) => {
                    app.set_viewport(Rect::new(0, 0, width, height));
                }
                _ => {}
            }
        }

        // 3. Check quit
        if !app.running {
            app.cancel_drag();
            break;
        }
    }
    Ok(())
}
