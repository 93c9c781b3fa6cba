use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

use globochat_client::history::fetch_history;
use globochat_client::prefs::{load_prefs, save_prefs};
use globochat_client::session::ChatSession;
use globochat_client::transport::{connect, SocketUpdate};
use globochat_core::{ServerEvent, DEFAULT_HISTORY_LIMIT};

/// Line-based client for the globochat backend: every stdin line is one
/// message, broadcasts and typing changes are printed as they arrive.
#[derive(Debug, Parser)]
#[command(name = "globochat", version, about)]
struct Args {
    /// Backend base URL
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server: String,
    /// Display name; overrides and updates the saved preference
    #[arg(long)]
    name: Option<String>,
    /// Preferences file
    #[arg(long, default_value = "globochat-prefs.json")]
    prefs: PathBuf,
    /// Flip the saved light/dark theme and exit
    #[arg(long)]
    toggle_theme: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let mut prefs = load_prefs(&args.prefs);

    if args.toggle_theme {
        prefs.theme = prefs.theme.toggle();
        save_prefs(&args.prefs, &prefs).context("save preferences")?;
        println!("theme set to {:?}", prefs.theme);
        return Ok(());
    }

    let name = args
        .name
        .clone()
        .or_else(|| prefs.username.clone())
        .context("no display name saved; pass --name on first run")?;
    let mut session = ChatSession::new(&name).map_err(|e| anyhow::anyhow!("invalid name: {}", e))?;

    if prefs.username.as_deref() != Some(session.username()) {
        prefs.username = Some(session.username().to_string());
        save_prefs(&args.prefs, &prefs).context("save preferences")?;
    }

    // One-shot history load; a failure is a notice, not a fatal error.
    match fetch_history(&args.server, DEFAULT_HISTORY_LIMIT).await {
        Ok(history) => {
            for msg in &history {
                println!("[{}] {}: {}", msg.timestamp, msg.username, msg.message);
            }
            session.history_loaded(history);
        }
        Err(e) => eprintln!("! could not load history: {:#}", e),
    }

    let mut conn = connect(&args.server).await.context("open websocket")?;
    session.socket_opened();
    println!("connected as {} — type a message and press enter", session.username());

    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line.context("read stdin")? else { break };
                match session.submit(&line) {
                    Ok(events) => {
                        for event in events {
                            let _ = conn.outbound.send(event);
                        }
                    }
                    Err(notice) => eprintln!("! {}", notice),
                }
            }
            update = conn.updates.recv() => {
                match update {
                    Some(SocketUpdate::Event(event)) => render(&mut session, event),
                    Some(SocketUpdate::Closed(reason)) => {
                        // no reconnection: the session stays down and every
                        // further submit answers with a connectivity notice
                        session.socket_closed();
                        eprintln!(
                            "! disconnected{} — messages can no longer be sent",
                            reason.map(|r| format!(" ({})", r)).unwrap_or_default()
                        );
                    }
                    None => {}
                }
            }
            _ = tick.tick() => {
                if let Some(event) = session.poll_typing(Instant::now()) {
                    let _ = conn.outbound.send(event);
                }
            }
        }
    }

    Ok(())
}

fn render(session: &mut ChatSession, event: ServerEvent) {
    let shown = event.clone();
    if let Some(notice) = session.apply(event) {
        eprintln!("! {}", notice);
        return;
    }
    match shown {
        ServerEvent::Message(msg) => {
            println!("[{}] {}: {}", msg.timestamp, msg.username, msg.message);
        }
        ServerEvent::Typing { .. } => {
            let typing: Vec<&str> = session.typing_users().collect();
            if !typing.is_empty() {
                eprintln!("… {} typing", typing.join(", "));
            }
        }
        // errors were turned into a notice by apply
        ServerEvent::Error { .. } => {}
    }
}
