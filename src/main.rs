mod action;
mod app;
mod config;
mod demo_source;
mod event;
mod tui;
mod ui;
mod viewport;

use std::panic;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::{Args, Config};
use crate::demo_source::DemoSource;
use crate::event::Event;
use crate::tui::EventHandler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::resolve(&args)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(config).await;

    tui::restore()?;

    result
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let source = DemoSource::new(&config.source);
    let mut app = App::new(&config, source, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let frame_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, frame_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render | Event::Resize => {
                        app.set_body_rows(ui::body_rows(terminal.size()?.height));
                        terminal.draw(|frame| ui::render(frame, &app))?;
                        // Scroll checks and page requests see the frame just drawn.
                        app.settle();
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
