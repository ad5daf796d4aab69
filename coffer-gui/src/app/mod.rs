pub mod bus;
pub mod config;
pub mod create;
pub mod error;
pub mod nav;
pub mod state;
pub mod view;
pub mod wallets;

pub use error::Error;

use std::sync::Arc;

use bus::EventBus;
use create::CreateForm;
use nav::{Navigation, PaneContent, TabControl};
use state::{BackupPane, Pane, ReceivePane, SendPane};
use wallets::WalletList;

use crate::backend::Backend;

/// The shell: one navigation, one wallet list, one creation form and the
/// wallet-scoped panes, all talking over a shared [`EventBus`].
///
/// Dependencies are injected here and nowhere else; panes know the bus and
/// the backend, never each other.
pub struct App {
    bus: EventBus,
    nav: Navigation,
    wallets: WalletList,
    create: CreateForm,
    receive: ReceivePane,
    backup: BackupPane,
    send: SendPane,
}

impl App {
    pub fn new(backend: Arc<dyn Backend + Send + Sync>) -> App {
        let bus = EventBus::new();
        let nav = Navigation::new(bus.clone());
        let wallets = WalletList::new(backend.clone(), bus.clone());
        let create = CreateForm::new(backend.clone(), wallets.clone());
        let receive = ReceivePane::new(backend.clone());
        let backup = BackupPane::new(backend.clone());
        let send = SendPane::new(backend);
        receive.attach(&bus);
        backup.attach(&bus);
        send.attach(&bus);
        App {
            bus,
            nav,
            wallets,
            create,
            receive,
            backup,
            send,
        }
    }

    /// Registers a (tab, pane) pair of host surfaces with the navigation.
    pub fn register_tab(
        &self,
        control: Box<dyn TabControl>,
        content: Box<dyn PaneContent>,
        key: &str,
    ) {
        self.nav.register_pane(control, content, key);
    }

    /// Loads the wallet list. Whether to prompt for wallet creation when
    /// none exists is the caller's call: check [`WalletList::selected`]
    /// afterwards.
    pub async fn bootstrap(&self) -> Result<(), Error> {
        self.wallets.refresh().await
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn nav(&self) -> &Navigation {
        &self.nav
    }

    pub fn wallets(&self) -> &WalletList {
        &self.wallets
    }

    pub fn create(&self) -> &CreateForm {
        &self.create
    }

    pub fn receive(&self) -> &ReceivePane {
        &self.receive
    }

    pub fn backup(&self) -> &BackupPane {
        &self.backup
    }

    pub fn send(&self) -> &SendPane {
        &self.send
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::nav::Trigger;
    use crate::utils::mock;
    use serde_json::json;

    struct NoopControl;
    struct NoopContent;

    impl TabControl for NoopControl {
        fn set_active(&mut self, _active: bool) {}
        fn connect_trigger(&mut self, _trigger: Trigger) {}
    }

    impl PaneContent for NoopContent {
        fn set_visible(&mut self, _visible: bool) {}
    }

    fn register_tabs(app: &App) {
        for key in ["wallets", "receive", "send", "backup"].iter() {
            app.register_tab(Box::new(NoopControl), Box::new(NoopContent), key);
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn bootstrap_selects_a_wallet_and_fills_the_panes() {
        let backend = mock::backend(vec![
            (
                Some(json!({"method": "get_wallet_list", "params": null})),
                Ok(json!(["bob", "alice"])),
            ),
            (
                Some(json!({"method": "get_address", "params": {"wallet_name": "alice"}})),
                Ok(json!("alice-addr")),
            ),
            (
                Some(json!({"method": "get_address", "params": {"wallet_name": "alice"}})),
                Ok(json!("alice-addr")),
            ),
        ]);
        let app = App::new(backend);
        register_tabs(&app);
        app.nav().activate("wallets").unwrap();

        app.bootstrap().await.unwrap();
        settle().await;

        assert_eq!(app.wallets().selected().map(|w| w.name), Some("alice".into()));
        assert_eq!(app.receive().address(), Some("alice-addr".to_string()));
        app.send().set_change_amount(10);
        assert_eq!(app.send().change().map(|c| c.recipient()), Some("10,alice-addr".into()));

        // Re-selecting the current wallet must not refetch anything: the
        // replay backend would panic on an unexpected request.
        app.wallets().select("alice").unwrap();
        settle().await;
    }

    #[tokio::test]
    async fn navigating_away_from_backup_clears_the_mnemonic() {
        let backend = mock::backend(vec![
            (
                Some(json!({"method": "get_wallet_list", "params": null})),
                Ok(json!(["alice"])),
            ),
            (
                Some(json!({"method": "get_address", "params": {"wallet_name": "alice"}})),
                Ok(json!("alice-addr")),
            ),
            (
                Some(json!({"method": "get_address", "params": {"wallet_name": "alice"}})),
                Ok(json!("alice-addr")),
            ),
            (
                Some(json!({"method": "get_mnemonic", "params": {"wallet_name": "alice", "decryptor": "pw"}})),
                Ok(json!("abandon about")),
            ),
        ]);
        let app = App::new(backend);
        register_tabs(&app);
        app.bootstrap().await.unwrap();
        settle().await;

        app.nav().activate("backup").unwrap();
        app.backup().reveal("pw").await.unwrap();
        assert!(app.backup().mnemonic().is_some());

        app.nav().activate("receive").unwrap();
        assert_eq!(app.backup().mnemonic(), None);
    }

    #[tokio::test]
    async fn empty_backend_leaves_the_shell_without_a_selection() {
        let backend = mock::backend(vec![(
            Some(json!({"method": "get_wallet_list", "params": null})),
            Ok(json!([])),
        )]);
        let app = App::new(backend);
        register_tabs(&app);
        app.bootstrap().await.unwrap();
        settle().await;

        assert_eq!(app.wallets().selected(), None);
        assert_eq!(app.receive().wallet(), None);
    }
}
