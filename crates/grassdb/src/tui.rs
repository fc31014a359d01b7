use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use grassdb_core::NodeDriver;
use log::info;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::App;
use crate::event::EventHandler;
use crate::ui;

const TICK_RATE: Duration = Duration::from_millis(250);

type ConsoleTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Put the terminal back before the default hook prints the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

fn init_terminal() -> Result<ConsoleTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut ConsoleTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the interactive console until the user quits.
pub async fn run_console(node_url: String, driver: Arc<dyn NodeDriver>) -> Result<()> {
    info!("Starting console against {} ({})", node_url, driver.display_name());

    install_panic_hook();
    let mut terminal = init_terminal()?;

    let events = EventHandler::new(TICK_RATE);
    let app = App::new(node_url, driver, events.sender());

    let result = run(&mut terminal, app, events).await;

    restore_terminal(&mut terminal)?;
    info!("Console closed");

    result
}

async fn run(
    terminal: &mut ConsoleTerminal,
    mut app: App,
    mut events: EventHandler,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        match events.next().await {
            Some(event) => app.handle_event(event),
            None => break,
        }
    }

    Ok(())
}
