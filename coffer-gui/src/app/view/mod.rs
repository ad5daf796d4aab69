//! Stateless rendering of the pane states, for the host to place in its
//! content regions.

use crate::app::create::CreateForm;
use crate::app::state::{BackupPane, ReceivePane, SendPane};
use crate::app::wallets::WalletIdentity;

pub fn wallet_row(wallet: &WalletIdentity, selected: bool) -> String {
    format!("{} {}", if selected { "(*)" } else { "( )" }, wallet.name)
}

pub fn receive(pane: &ReceivePane) -> String {
    let mut out = String::from("Receive\n");
    match (pane.address(), pane.wallet()) {
        (Some(address), _) => out.push_str(&format!("address: {}\n", address)),
        (None, Some(wallet)) => out.push_str(&format!("loading address of '{}'...\n", wallet)),
        (None, None) => out.push_str("no wallet selected\n"),
    }
    if let Some(warning) = pane.warning() {
        out.push_str(&format!("error: {}\n", warning));
    }
    out
}

pub fn backup(pane: &BackupPane) -> String {
    let mut out = String::from("Backup\n");
    match pane.wallet() {
        Some(wallet) => out.push_str(&format!("wallet: {}\n", wallet)),
        None => out.push_str("no wallet selected\n"),
    }
    match pane.mnemonic() {
        Some(mnemonic) => out.push_str(&format!("mnemonic: {}\n", mnemonic)),
        None => out.push_str("enter the decryptor to reveal the mnemonic\n"),
    }
    if let Some(warning) = pane.warning() {
        out.push_str(&format!("error: {}\n", warning));
    }
    out
}

pub fn send(pane: &SendPane) -> String {
    let mut out = String::from("Send\n");
    match pane.change() {
        Some(change) => out.push_str(&format!("change: {}\n", change.recipient())),
        None => out.push_str("no change\n"),
    }
    if let Some(warning) = pane.warning() {
        out.push_str(&format!("error: {}\n", warning));
    }
    out
}

pub fn create_form(form: &CreateForm) -> String {
    let mut out = String::from("New wallet\n");
    let draft = form.draft();
    out.push_str(&format!("name: {}\n", draft.name));
    if let Some(mnemonic) = form.pending_backup() {
        out.push_str(&format!(
            "write this mnemonic down before continuing: {}\n",
            mnemonic
        ));
    }
    if let Some(error) = form.error() {
        out.push_str(&format!("error: {}\n", error));
    }
    for warning in form.warnings() {
        out.push_str(&format!("warning: {}\n", warning));
    }
    out
}
