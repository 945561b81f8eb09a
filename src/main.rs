use anyhow::Result;
use clap::Parser;
use log::{debug, info, warn};
use std::io;
use std::path::PathBuf;
use tokio::sync::mpsc;

mod ui;
mod utils;

use crate::ui::{ChatUI, UiAction};
use banter::config;
use banter::models::Message;
use banter::notify::Notifier;
use banter::reply::{Reply, ReplyScheduler};
use banter::roster;
use banter::store::ChatStore;

/// Command line arguments for banter
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "banter: a terminal chat UI with simulated replies.",
    long_about = "banter renders a demo contact roster and message threads in the \
    terminal and answers every outgoing message with a randomized simulated reply.\n\n\
    All data is in-memory fixture data; nothing touches the network."
)]
struct Args {
    /// Log file path
    #[arg(long, value_name = "PATH", default_value = "banter.log")]
    log_file: PathBuf,

    /// Override the config file location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the configured log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Disable desktop notifications for this run
    #[arg(long)]
    no_notifications: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.config {
        config::set_config_path_override(path.clone());
    }

    let config = config::load_config()
        .unwrap_or_else(|e| {
            eprintln!("Warning: failed to load config ({}), using defaults", e);
            config::Config::default()
        })
        .with_env_overrides()
        .validated();

    let level = utils::parse_level(args.log_level.as_deref().unwrap_or(&config.log_level));
    utils::setup_logging(args.log_file.to_str(), level)?;

    info!("banter starting up");
    info!(
        "System information: {} {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    info!("Logging to file: {}", args.log_file.display());
    info!(
        "Reply delay window: [{}, {}) ms",
        config.reply_delay_ms.0, config.reply_delay_ms.1
    );

    let mut store = ChatStore::new(roster::contacts());
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    let mut scheduler = ReplyScheduler::new(reply_tx, config.reply_delay_ms);
    let notifier = Notifier::new(config.notifications && !args.no_notifications);
    if !notifier.is_enabled() {
        info!("Desktop notifications are disabled");
    }

    let mut terminal = ui::setup_terminal()?;
    let mut chat_ui = ChatUI::new();

    let result = run_main_loop(
        &mut chat_ui,
        &mut terminal,
        &mut store,
        &mut scheduler,
        &notifier,
        &mut reply_rx,
    )
    .await;

    // Always restore the terminal, even when the loop errored.
    ui::restore_terminal(terminal)?;
    result?;

    println!("Chat session ended.");
    Ok(())
}

/// Run the main event loop
async fn run_main_loop(
    chat_ui: &mut ChatUI,
    terminal: &mut ui::Terminal<ui::CrosstermBackend<io::Stdout>>,
    store: &mut ChatStore,
    scheduler: &mut ReplyScheduler,
    notifier: &Notifier,
    reply_rx: &mut mpsc::UnboundedReceiver<Reply>,
) -> Result<()> {
    loop {
        terminal.draw(|f| chat_ui.draw(f, store))?;

        match chat_ui.handle_input(store)? {
            Some(UiAction::Quit) => break,
            Some(UiAction::Select(id)) => {
                // Unknown ids can only come from a stale cursor; ignore them.
                if let Err(e) = store.select(id) {
                    debug!("selection ignored: {}", e);
                }
            }
            Some(UiAction::Send(text)) => {
                let time = utils::clock_time();
                match store.send(&text, &time) {
                    Ok(message) => {
                        info!("message sent: {} chars", message.text.chars().count());
                        if let Some(id) = store.selected_id() {
                            scheduler.schedule(id);
                        }
                    }
                    // Empty input or no selection degrade to a silent no-op.
                    Err(e) => debug!("send ignored: {}", e),
                }
            }
            None => {}
        }

        // Deliver replies whose timers fired since the last pass.
        while let Ok((contact_id, line)) = reply_rx.try_recv() {
            let reply = Message::received(line, utils::clock_time());
            match store.apply_reply(contact_id, reply) {
                Ok(outcome) => {
                    let sender = store
                        .contacts()
                        .iter()
                        .find(|c| c.id == contact_id)
                        .map(|c| c.name.clone())
                        .unwrap_or_default();
                    debug!("reply from {} delivered ({:?})", sender, outcome);
                    notifier.notify(&sender, line);
                }
                Err(e) => warn!("dropping simulated reply: {}", e),
            }
        }
    }

    scheduler.cancel_all();
    info!("shutting down, pending replies cancelled");
    Ok(())
}
