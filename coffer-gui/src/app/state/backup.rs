use std::sync::{Arc, Mutex};

use tracing::info;

use crate::app::{
    bus::{Event, EventBus, Topic},
    error::Error,
    state::Pane,
};
use crate::backend::Backend;

#[derive(Default)]
struct BackupState {
    wallet: Option<String>,
    mnemonic: Option<String>,
    warning: Option<Error>,
}

/// Reveals the mnemonic of the selected wallet, against its decryptor,
/// so the user can write a backup down.
///
/// A decrypted mnemonic never survives navigation: any tab change clears
/// it, whichever pane became visible.
#[derive(Clone)]
pub struct BackupPane {
    backend: Arc<dyn Backend + Send + Sync>,
    state: Arc<Mutex<BackupState>>,
}

impl BackupPane {
    pub fn new(backend: Arc<dyn Backend + Send + Sync>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(BackupState::default())),
        }
    }

    pub fn wallet(&self) -> Option<String> {
        self.state.lock().unwrap().wallet.clone()
    }

    pub fn mnemonic(&self) -> Option<String> {
        self.state.lock().unwrap().mnemonic.clone()
    }

    pub fn warning(&self) -> Option<Error> {
        self.state.lock().unwrap().warning.clone()
    }

    pub fn clear_mnemonic(&self) {
        let mut state = self.state.lock().unwrap();
        if state.mnemonic.take().is_some() {
            info!("displayed mnemonic cleared");
        }
    }

    fn wallet_selected(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.wallet = Some(name.to_string());
        state.mnemonic = None;
        state.warning = None;
    }

    /// Asks the backend to decrypt the selected wallet's mnemonic. A wrong
    /// decryptor is surfaced as the pane warning.
    pub async fn reveal(&self, decryptor: &str) -> Result<(), Error> {
        let wallet = {
            let mut state = self.state.lock().unwrap();
            state.mnemonic = None;
            state.warning = None;
            state.wallet.clone().ok_or(Error::NoWalletSelected)?
        };
        self.load_mnemonic(wallet, decryptor).await
    }

    /// A response for a wallet that is no longer the displayed one is
    /// dropped.
    async fn load_mnemonic(&self, wallet: String, decryptor: &str) -> Result<(), Error> {
        let res = self.backend.get_mnemonic(&wallet, decryptor).await;
        let mut state = self.state.lock().unwrap();
        if state.wallet.as_deref() != Some(wallet.as_str()) {
            return Ok(());
        }
        match res {
            Ok(mnemonic) => {
                state.mnemonic = Some(mnemonic);
                Ok(())
            }
            Err(e) => {
                let e = Error::from(e);
                state.warning = Some(e.clone());
                Err(e)
            }
        }
    }
}

impl Pane for BackupPane {
    fn attach(&self, bus: &EventBus) {
        let pane = self.clone();
        bus.subscribe(Topic::WalletSelected, move |event| {
            if let Event::WalletSelected(wallet) = event {
                pane.wallet_selected(&wallet.name);
            }
        });
        let pane = self.clone();
        bus.subscribe(Topic::TabChanged, move |_| {
            pane.clear_mnemonic();
        });
    }
}
