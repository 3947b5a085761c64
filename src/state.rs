//! Shared application state.
//!
//! Locks guard small value types only and are never held across await
//! points. A poisoned lock degrades to a sensible default rather than
//! propagating the panic.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use crate::api::ApiClient;
use crate::bus::{ActivityStore, ChatBus};
use crate::chat::ChatFlow;
use crate::error::ApiError;
use crate::types::{Config, UserProfile};

/// State shared between the chat loop and background tasks.
pub struct AppState {
    config: RwLock<Config>,
    client: ApiClient,
    pub user: Mutex<Option<UserProfile>>,
    pub flow: Mutex<ChatFlow>,
    pub chat_bus: ChatBus,
    pub activity: ActivityStore,
    shutdown: AtomicBool,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config)?;
        Ok(Self {
            config: RwLock::new(config),
            client,
            user: Mutex::new(None),
            flow: Mutex::new(ChatFlow::default()),
            chat_bus: ChatBus::default(),
            activity: ActivityStore::default(),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The signed-in user's id, or the demo id before sign-in resolves.
    pub fn user_id(&self) -> String {
        match self.user.lock() {
            Ok(guard) => guard
                .as_ref()
                .map(|u| u.id.clone())
                .unwrap_or_else(|| UserProfile::demo().id),
            Err(_) => UserProfile::demo().id,
        }
    }

    pub fn organization_id(&self) -> u64 {
        match self.config.read() {
            Ok(cfg) => cfg.organization_id,
            Err(_) => Config::default().organization_id,
        }
    }

    pub fn delayed_threshold_days(&self) -> i64 {
        match self.config.read() {
            Ok(cfg) => cfg.delayed_threshold_days,
            Err(_) => Config::default().delayed_threshold_days,
        }
    }

    pub fn activity_poll_secs(&self) -> u64 {
        match self.config.read() {
            Ok(cfg) => cfg.activity_poll_secs,
            Err(_) => Config::default().activity_poll_secs,
        }
    }

    /// Signal background tasks to wind down. Advisory; pollers check it
    /// between requests, never mid-request.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_falls_back_to_demo() {
        let state = AppState::new(Config::default()).expect("state");
        assert_eq!(state.user_id(), "demo-user");

        if let Ok(mut guard) = state.user.lock() {
            *guard = Some(UserProfile {
                id: "u-7".to_string(),
                name: "Real User".to_string(),
                role: "employee".to_string(),
            });
        }
        assert_eq!(state.user_id(), "u-7");
    }

    #[test]
    fn test_shutdown_flag() {
        let state = AppState::new(Config::default()).expect("state");
        assert!(!state.is_shutdown());
        state.request_shutdown();
        assert!(state.is_shutdown());
    }
}
