mod app;
mod catalog;
mod config;
mod family;
mod notify;
mod player;
mod profiles;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "famstream")]
#[command(version = "0.1.0")]
#[command(about = "Terminal demo client for a family streaming subscription")]
struct Args {
    /// Output the subscription summary as JSON (for scripts)
    #[arg(short, long)]
    status: bool,

    /// Jump straight to the profile picker
    #[arg(long)]
    skip_onboarding: bool,

    /// Pre-select the given viewing profile
    #[arg(short, long)]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Handle CLI-only commands
    if args.status {
        return print_status();
    }

    // Run TUI
    run_tui(args).await
}

/// Subscription summary as a single JSON line.
fn print_status() -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let roster = family::Roster::demo(today);
    let savings = family::savings(roster.len());

    let output = serde_json::json!({
        "plan": "family",
        "active": true,
        "members": roster.len(),
        "member_limit": family::MAX_MEMBERS,
        "free_slots": roster.free_slots(),
        "monthly_price": family::FAMILY_PRICE,
        "per_member_price": savings.per_member_price,
        "savings_percent": savings.percent,
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn run_tui(args: Args) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let config = AppConfig::load().unwrap_or_default();
    let mut app = App::new(config, args.skip_onboarding);
    if let Some(name) = args.profile.as_deref() {
        app.select_profile_by_name(name);
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.allows_quick_quit() => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.report_error(e);
                            }
                        }
                    }
                }
            }
        }

        // Periodic refresh
        app.tick();
    }
}
