use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::app::{
    bus::{Event, EventBus},
    error::Error,
};
use crate::backend::Backend;

/// One backend-known wallet. The name is the backend-assigned identifier;
/// this layer never re-validates it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletIdentity {
    pub name: String,
}

impl WalletIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for WalletIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Default)]
struct ListState {
    wallets: Vec<WalletIdentity>,
    selected: Option<usize>,
}

/// Single source of truth for which wallets exist and which one is
/// selected. The cache and the selection pointer are only ever mutated
/// here; everyone else works on snapshots or on the published
/// [`Event::WalletSelected`] payloads.
#[derive(Clone)]
pub struct WalletList {
    backend: Arc<dyn Backend + Send + Sync>,
    bus: EventBus,
    state: Arc<Mutex<ListState>>,
}

impl WalletList {
    pub fn new(backend: Arc<dyn Backend + Send + Sync>, bus: EventBus) -> Self {
        Self {
            backend,
            bus,
            state: Arc::new(Mutex::new(ListState::default())),
        }
    }

    /// Fetches the wallet set from the backend and replaces the cache
    /// wholesale, sorted by name. A non-empty list selects its first
    /// wallet and publishes [`Event::WalletSelected`]; an empty one leaves
    /// the selection unset so the shell can prompt for wallet creation.
    pub async fn refresh(&self) -> Result<(), Error> {
        let names = self.backend.get_wallet_list().await?;
        let selected = {
            let mut state = self.state.lock().unwrap();
            let mut wallets: Vec<WalletIdentity> =
                names.into_iter().map(WalletIdentity::new).collect();
            wallets.sort();
            state.selected = if wallets.is_empty() { None } else { Some(0) };
            state.wallets = wallets;
            state
                .selected
                .and_then(|i| state.wallets.get(i).cloned())
        };
        match selected {
            Some(wallet) => {
                info!("wallet list loaded, '{}' selected", wallet);
                self.bus.publish(Event::WalletSelected(wallet));
            }
            None => warn!("backend knows no wallet"),
        }
        Ok(())
    }

    /// Selects the named wallet and publishes [`Event::WalletSelected`].
    /// Re-selecting the current wallet publishes nothing, so downstream
    /// panes do not refetch for no reason.
    pub fn select(&self, name: &str) -> Result<(), Error> {
        let to_publish = {
            let mut state = self.state.lock().unwrap();
            let index = state
                .wallets
                .iter()
                .position(|w| w.name == name)
                .ok_or_else(|| Error::UnknownWallet(name.to_string()))?;
            if state.selected == Some(index) {
                None
            } else {
                state.selected = Some(index);
                state.wallets.get(index).cloned()
            }
        };
        if let Some(wallet) = to_publish {
            self.bus.publish(Event::WalletSelected(wallet));
        }
        Ok(())
    }

    /// Snapshot of the cached wallet names, in display order.
    pub fn names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.wallets.iter().map(|w| w.name.clone()).collect()
    }

    /// Snapshot of the cached wallet identities, in display order.
    pub fn wallets(&self) -> Vec<WalletIdentity> {
        self.state.lock().unwrap().wallets.clone()
    }

    pub fn selected(&self) -> Option<WalletIdentity> {
        let state = self.state.lock().unwrap();
        state.selected.and_then(|i| state.wallets.get(i).cloned())
    }
}
