use std::sync::{Arc, Mutex};

use crate::app::{
    bus::{Event, EventBus, Topic},
    error::Error,
    state::Pane,
};
use crate::backend::Backend;

#[derive(Default)]
struct ReceiveState {
    wallet: Option<String>,
    address: Option<String>,
    warning: Option<Error>,
}

/// Shows the receive address of the selected wallet.
#[derive(Clone)]
pub struct ReceivePane {
    backend: Arc<dyn Backend + Send + Sync>,
    state: Arc<Mutex<ReceiveState>>,
}

impl ReceivePane {
    pub fn new(backend: Arc<dyn Backend + Send + Sync>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(ReceiveState::default())),
        }
    }

    pub fn wallet(&self) -> Option<String> {
        self.state.lock().unwrap().wallet.clone()
    }

    pub fn address(&self) -> Option<String> {
        self.state.lock().unwrap().address.clone()
    }

    pub fn warning(&self) -> Option<Error> {
        self.state.lock().unwrap().warning.clone()
    }

    fn wallet_selected(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.wallet = Some(name.to_string());
        state.address = None;
        state.warning = None;
    }

    /// Fetches the receive address of `wallet`. The response is dropped if
    /// the pane moved to another wallet while the call was in flight.
    pub async fn load(&self, wallet: String) {
        let res = self.backend.get_address(&wallet).await;
        let mut state = self.state.lock().unwrap();
        if state.wallet.as_deref() != Some(wallet.as_str()) {
            return;
        }
        match res {
            Ok(address) => {
                state.address = Some(address);
                state.warning = None;
            }
            Err(e) => {
                state.address = None;
                state.warning = Some(e.into());
            }
        }
    }
}

impl Pane for ReceivePane {
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
