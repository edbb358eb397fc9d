use std::error::Error;
use std::time::Duration;

use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

mod api;
mod app;
mod appointments;
mod dates;
mod filter;
mod models;
mod review;
mod storage;
mod ui;

use app::{App, View};

/// Admin console for a vehicle service shop backend.
#[derive(Parser)]
#[command(name = "wrenchdesk", version, about)]
struct Cli {
    /// Base URL of the shop API, e.g. https://shop.example/api
    #[arg(long)]
    server: Option<String>,

    /// Discard the saved token and prompt for a new one
    #[arg(long)]
    login: bool,

    /// Open the appointment board instead of the time log review
    #[arg(long)]
    appointments: bool,

    /// Operator name recorded on cancellations
    #[arg(long)]
    operator: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let server_url = match cli.server {
        Some(url) => {
            let url = storage::normalize_server_url(&url);
            storage::write_server_url(&url)?;
            url
        }
        None => storage::read_server_url(),
    };

    if let Some(operator) = &cli.operator {
        storage::write_operator(operator)?;
    }

    let initial_view = if cli.appointments {
        View::Appointments
    } else {
        View::Review
    };

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(server_url, cli.login, initial_view);

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        if app.has_pending_action() {
            app.run_pending_action();
        }

        if app.needs_refresh {
            app.refresh_data();
        }

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(120))? {
            let event = event::read()?;
            if let Event::Key(key) = event {
                app.handle_key_event(key);
            }
        }
    }

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
