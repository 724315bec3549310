//! Connection state owned by one provider instance.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{logger::Logger, messages};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Snapshot of the provider's connection to the wallet.
pub struct ConnectionState {
    /// Whether the wallet connection is live.
    pub is_connected: bool,
    /// Hex chain id of the connected chain.
    pub chain_id: Option<String>,
    /// Decimal network id of the connected chain.
    pub network_version: Option<String>,
    /// Exposed accounts, most recently selected first.
    pub accounts: Vec<String>,
    /// Whether the page should reload when the network changes.
    pub auto_refresh_on_network_change: bool,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            is_connected: false,
            chain_id: None,
            network_version: None,
            accounts: Vec::new(),
            auto_refresh_on_network_change: true,
        }
    }
}

/// Mutation seam handed to the connection-lifecycle layer.
///
/// The provider itself only ever reads state; every transition goes through this handle.
#[derive(Clone)]
pub struct ConnectionStateHandle {
    state: Rc<RefCell<ConnectionState>>,
    logger: Rc<dyn Logger>,
}

impl ConnectionStateHandle {
    pub(crate) fn new(state: Rc<RefCell<ConnectionState>>, logger: Rc<dyn Logger>) -> Self {
        Self { state, logger }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Overwrites the connected flag without logging.
    pub fn set_connected(&self, is_connected: bool) {
        self.state.borrow_mut().is_connected = is_connected;
    }

    /// Records a completed handshake with the given chain.
    pub fn connect(&self, chain_id: &str, network_version: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.is_connected = true;
            state.chain_id = Some(chain_id.to_string());
            state.network_version = Some(network_version.to_string());
        }
        self.logger.info(&messages::info::connected(chain_id));
    }

    /// Records a lost connection; `permanent` means the background is gone for good.
    pub fn disconnect(&self, permanent: bool) {
        {
            let mut state = self.state.borrow_mut();
            state.is_connected = false;
            if permanent {
                state.chain_id = None;
                state.network_version = None;
                state.accounts.clear();
            }
        }
        let message = if permanent {
            messages::errors::permanently_disconnected()
        } else {
            messages::errors::disconnected()
        };
        self.logger.error(&message);
    }

    /// Replaces the exposed accounts.
    pub fn set_accounts(&self, accounts: Vec<String>) {
        self.state.borrow_mut().accounts = accounts;
    }

    /// Sets the reload-on-network-change preference.
    pub fn set_auto_refresh_on_network_change(&self, enabled: bool) {
        self.state.borrow_mut().auto_refresh_on_network_change = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LogLevel, MemoryLogger};

    fn handle() -> (ConnectionStateHandle, MemoryLogger) {
        let logger = MemoryLogger::default();
        let handle = ConnectionStateHandle::new(
            Rc::new(RefCell::new(ConnectionState::default())),
            Rc::new(logger.clone()),
        );
        (handle, logger)
    }

    #[test]
    fn initial_state_is_disconnected() {
        let state = ConnectionState::default();
        assert!(!state.is_connected);
        assert!(state.accounts.is_empty());
        assert!(state.auto_refresh_on_network_change);
    }

    #[test]
    fn connect_and_disconnect_log_transitions() {
        let (handle, logger) = handle();
        handle.set_accounts(vec!["0xabc".to_string()]);

        handle.connect("0x1", "1");
        assert!(handle.snapshot().is_connected);
        assert_eq!(handle.snapshot().chain_id.as_deref(), Some("0x1"));

        handle.disconnect(false);
        let state = handle.snapshot();
        assert!(!state.is_connected);
        assert_eq!(state.chain_id.as_deref(), Some("0x1"));
        assert_eq!(state.accounts, vec!["0xabc".to_string()]);

        handle.disconnect(true);
        let state = handle.snapshot();
        assert_eq!(state.chain_id, None);
        assert!(state.accounts.is_empty());

        assert_eq!(
            logger.lines(),
            vec![
                (
                    LogLevel::Info,
                    "ezDeFi: Connected to chain with ID \"0x1\".".to_string()
                ),
                (LogLevel::Error, messages::errors::disconnected()),
                (LogLevel::Error, messages::errors::permanently_disconnected()),
            ]
        );
    }

    #[test]
    fn state_serializes_with_camel_case_keys() {
        let raw = serde_json::to_value(ConnectionState::default()).expect("json");
        assert_eq!(raw["isConnected"], serde_json::json!(false));
        assert_eq!(raw["autoRefreshOnNetworkChange"], serde_json::json!(true));
    }
}
