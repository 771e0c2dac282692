//! guestsync-provider-google - Google Calendar provider for guestsync
//!
//! This binary implements the guestsync provider protocol, communicating
//! with guestsync via JSON over stdin/stdout.
//!
//! The provider manages its own credentials and tokens:
//!   ~/.config/guestsync/providers/google/credentials.json
//!   ~/.config/guestsync/providers/google/tokens/{account}.json

mod app_config;
mod commands;
mod google_event;
mod session;

use std::io::{self, BufRead, Write};

use guestsync_core::protocol::{Command, Request, Response};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::<()>::error(&format!("Failed to parse request: {}", e)),
        };

        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

async fn handle_request(request: Request) -> String {
    let params = request.params;

    let result = match request.command {
        Command::Authenticate => commands::authenticate::handle().await,
        Command::ListEvents => commands::list_events::handle(params).await,
        Command::GetEvent => commands::get_event::handle(params).await,
        Command::AddGuest => commands::add_guest::handle(params).await,
        Command::SetMyStatus => commands::set_my_status::handle(params).await,
        Command::CreateEvent => commands::create_event::handle(params).await,
        Command::SetDescription => commands::set_description::handle(params).await,
        Command::DeleteEvent => commands::delete_event::handle(params).await,
    };

    match result {
        Ok(data) => Response::success(data),
        Err(e) => {
            eprintln!("{:?} failed: {:#}", request.command, e);
            Response::<()>::error(&format!("{:#}", e))
        }
    }
}
