//! Headless agent: reads chat commands from stdin, prints transcript
//! entries, and keeps the activity feed fresh in the background.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use whizdesk::chat::{dispatch, interpret, ChatFlow};
use whizdesk::config;
use whizdesk::state::AppState;
use whizdesk::types::{ChatMessage, Sender, UserProfile};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = config::load();
    if let Err(e) = config::validate(&cfg) {
        log::error!("{}", e);
        std::process::exit(1);
    }
    log::info!("WhizDesk agent starting against {}", cfg.api_base_url);

    let state = match AppState::new(cfg) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            log::error!("failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    // Resolve the signed-in user; the agent still runs offline as demo.
    let user = match state.client().current_user().await {
        Ok(u) => u,
        Err(e) => {
            log::warn!("could not load profile ({}), running as demo user", e);
            UserProfile::demo()
        }
    };
    log::info!("Signed in as {} ({})", user.name, user.role);
    if let Ok(mut guard) = state.user.lock() {
        *guard = Some(user);
    }

    // Print transcript entries as they are published.
    let mut chat_rx = state.chat_bus.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(msg) = chat_rx.recv().await {
            let who = match msg.sender {
                Sender::User => "you",
                Sender::Bot => "bot",
                Sender::System => "sys",
            };
            println!("[{}] {}", who, msg.text);
        }
    });

    let poller = tokio::spawn(whizdesk::services::activity::run_activity_poller(
        Arc::clone(&state),
    ));

    state
        .chat_bus
        .push_system("Ready. Try 'clock in', 'expense 250 travel taxi', or 'help <question>'. Type 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }

        state
            .chat_bus
            .publish(ChatMessage::now(Sender::User, text));

        // Interpret while holding the flow lock, then drop it before
        // dispatching so background tasks never wait on the network.
        let reply = match state.flow.lock() {
            Ok(mut flow) => interpret(text, &mut flow),
            Err(_) => interpret(text, &mut ChatFlow::default()),
        };
        let bot_msg = dispatch::dispatch(
            state.client(),
            &state.user_id(),
            state.organization_id(),
            reply,
        )
        .await;
        state.chat_bus.publish(bot_msg);
    }

    log::info!("Shutting down");
    state.request_shutdown();
    poller.abort();
    printer.abort();
}
