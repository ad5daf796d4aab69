use std::sync::{Arc, Mutex};

use crate::app::{
    bus::{Event, EventBus, Topic},
    error::Error,
    state::Pane,
};
use crate::backend::Backend;

/// Leftover transaction value returned to the wallet's own address. The
/// backend computes the amount; this layer only formats the recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutput {
    pub amount: u64,
    pub address: String,
}

impl ChangeOutput {
    /// The `amount,address` recipient line fed back into the transaction
    /// under construction.
    pub fn recipient(&self) -> String {
        format!("{},{}", self.amount, self.address)
    }
}

#[derive(Default)]
struct SendState {
    wallet: Option<String>,
    change_address: Option<String>,
    change_amount: i64,
    warning: Option<Error>,
}

/// Builds the change details of the transaction under construction: any
/// leftover funds go back to the selected wallet's own address.
#[derive(Clone)]
pub struct SendPane {
    backend: Arc<dyn Backend + Send + Sync>,
    state: Arc<Mutex<SendState>>,
}

impl SendPane {
    pub fn new(backend: Arc<dyn Backend + Send + Sync>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(SendState::default())),
        }
    }

    pub fn wallet(&self) -> Option<String> {
        self.state.lock().unwrap().wallet.clone()
    }

    pub fn warning(&self) -> Option<Error> {
        self.state.lock().unwrap().warning.clone()
    }

    /// Sets the change amount, `sum(in) - sum(out) - fee` as computed by
    /// the backend. A negative amount means the inputs cannot cover the
    /// transaction and is surfaced as an error; zero hides the change
    /// section.
    pub fn set_change_amount(&self, amount: i64) {
        let mut state = self.state.lock().unwrap();
        state.change_amount = amount;
        state.warning = if amount < 0 {
            Some(Error::InsufficientFunds)
        } else {
            None
        };
    }

    /// The change recipient to add to the transaction, if any funds are
    /// left over and the change address is known.
    pub fn change(&self) -> Option<ChangeOutput> {
        let state = self.state.lock().unwrap();
        if state.change_amount <= 0 {
            return None;
        }
        state.change_address.as_ref().map(|address| ChangeOutput {
            amount: state.change_amount as u64,
            address: address.clone(),
        })
    }

    fn wallet_selected(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.wallet = Some(name.to_string());
        state.change_address = None;
    }

    /// Fetches the wallet's own address to use as change destination,
    /// dropping the response if the selection moved on meanwhile.
    pub async fn load(&self, wallet: String) {
        let res = self.backend.get_address(&wallet).await;
        let mut state = self.state.lock().unwrap();
        if state.wallet.as_deref() != Some(wallet.as_str()) {
            return;
        }
        match res {
            Ok(address) => {
                state.change_address = Some(address);
            }
            Err(e) => {
                state.change_address = None;
                state.warning = Some(e.into());
            }
        }
    }
}

impl Pane for SendPane {
    fn attach(&self, bus: &EventBus) {
        let pane = self.clone();
        bus.subscribe(Topic::WalletSelected, move |event| {
            if let Event::WalletSelected(wallet) = event {
                pane.wallet_selected(&wallet.name);
                let pane = pane.clone();
                let name = wallet.name.clone();
                tokio::spawn(async move { pane.load(name).await });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mock;
    use serde_json::json;

    fn pane_with_address(wallet: &str, address: &str) -> SendPane {
        let backend = mock::backend(vec![(
            Some(json!({"method": "get_address", "params": {"wallet_name": wallet}})),
            Ok(json!(address)),
        )]);
        SendPane::new(backend)
    }

    #[tokio::test]
    async fn change_goes_back_to_the_wallets_own_address() {
        let pane = pane_with_address("alice", "alice-addr");
        pane.wallet_selected("alice");
        pane.load("alice".to_string()).await;

        pane.set_change_amount(100);
        let change = pane.change().unwrap();
        assert_eq!(change.recipient(), "100,alice-addr");
    }

    #[tokio::test]
    async fn zero_change_hides_the_section() {
        let pane = pane_with_address("alice", "alice-addr");
        pane.wallet_selected("alice");
        pane.load("alice".to_string()).await;

        pane.set_change_amount(0);
        assert_eq!(pane.change(), None);
        assert!(pane.warning().is_none());
    }

    #[tokio::test]
    async fn negative_change_means_insufficient_funds() {
        let pane = pane_with_address("alice", "alice-addr");
        pane.wallet_selected("alice");
        pane.load("alice".to_string()).await;

        pane.set_change_amount(-50);
        assert_eq!(pane.change(), None);
        assert!(matches!(pane.warning(), Some(Error::InsufficientFunds)));
    }

    #[tokio::test]
    async fn stale_change_address_is_dropped() {
        let pane = pane_with_address("alice", "alice-addr");
        pane.wallet_selected("alice");
        pane.wallet_selected("bob");
        pane.load("alice".to_string()).await;
        pane.set_change_amount(100);
        assert_eq!(pane.change(), None);
    }
}
