use std::sync::{Arc, Mutex};

use tracing::info;

use crate::app::wallets::WalletList;
use crate::backend::{Backend, BackendError};

/// Characters a wallet name may not contain, since the backend uses the
/// name as a filename.
const FORBIDDEN_NAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Random,
    DirectMnemonic,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Random
    }
}

/// The wallet-creation form contents. Transient; only ever sent to the
/// backend after passing [`validate`].
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub name: String,
    pub password: String,
    pub mode: Mode,
    pub mnemonic: String,
}

#[derive(Debug, Clone)]
pub enum Error {
    BlankName,
    InvalidFilename,
    DuplicateName,
    Backend(BackendError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "Name must not be blank"),
            Self::InvalidFilename => write!(f, "Name must be a valid filename"),
            Self::DuplicateName => write!(f, "Wallet name already in use, must be unique"),
            Self::Backend(e) => write!(f, "{}", e),
        }
    }
}

impl From<BackendError> for Error {
    fn from(error: BackendError) -> Self {
        Error::Backend(error)
    }
}

impl From<crate::app::error::Error> for Error {
    fn from(error: crate::app::error::Error) -> Self {
        match error {
            crate::app::error::Error::Backend(e) => Error::Backend(e),
            other => Error::Backend(BackendError::Unexpected(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    NameWhitespace,
    PasswordWhitespace,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NameWhitespace => {
                write!(f, "Name has leading or trailing space, did you really mean to?")
            }
            Self::PasswordWhitespace => {
                write!(
                    f,
                    "Password has leading or trailing space, did you really mean to?"
                )
            }
        }
    }
}

/// Gate applied to a draft before submission. Reports the first failure
/// only: blank name, then filename validity, then name collision with the
/// loaded wallet set (exact, case-sensitive).
pub fn validate(draft: &Draft, existing: &[String]) -> Result<(), Error> {
    if draft.name.is_empty() {
        return Err(Error::BlankName);
    }
    if !is_valid_filename(&draft.name) {
        return Err(Error::InvalidFilename);
    }
    if existing.iter().any(|n| *n == draft.name) {
        return Err(Error::DuplicateName);
    }
    Ok(())
}

fn is_valid_filename(name: &str) -> bool {
    if name.chars().any(|c| FORBIDDEN_NAME_CHARS.contains(&c)) {
        return false;
    }
    if name.starts_with('.') {
        return false;
    }
    // Reserved device names, as a whole leading component: "con" and
    // "con.bak" are out, "console" is fine.
    let component = name.split('.').next().unwrap_or("").to_ascii_lowercase();
    if matches!(component.as_str(), "nul" | "prn" | "con") {
        return false;
    }
    if component.len() == 4
        && (component.starts_with("lpt") || component.starts_with("com"))
        && component.ends_with(|c: char| c.is_ascii_digit())
    {
        return false;
    }
    true
}

/// Advisory only, never blocks submission.
pub fn warnings(draft: &Draft) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if draft.name != draft.name.trim() {
        warnings.push(Warning::NameWhitespace);
    }
    if draft.password != draft.password.trim() {
        warnings.push(Warning::PasswordWhitespace);
    }
    warnings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// The wallet was restored from the draft mnemonic.
    Restored,
    /// A wallet was created from fresh entropy; its mnemonic is held in
    /// [`CreateForm::pending_backup`] until the user confirms the backup.
    Created,
}

#[derive(Default)]
struct FormState {
    draft: Draft,
    error: Option<Error>,
    warnings: Vec<Warning>,
    pending_backup: Option<String>,
}

/// Stateful controller behind the wallet-creation form.
///
/// Edits recompute the advisory warnings; submission validates against the
/// loaded wallet set, routes the draft to the matching backend operation
/// and, once the wallet exists (and any fresh mnemonic has been backed
/// up), refreshes the list and selects the new wallet.
#[derive(Clone)]
pub struct CreateForm {
    backend: Arc<dyn Backend + Send + Sync>,
    wallets: WalletList,
    state: Arc<Mutex<FormState>>,
}

impl CreateForm {
    pub fn new(backend: Arc<dyn Backend + Send + Sync>, wallets: WalletList) -> Self {
        Self {
            backend,
            wallets,
            state: Arc::new(Mutex::new(FormState::default())),
        }
    }

    pub fn edit_name(&self, name: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.draft.name = name.into();
        state.warnings = warnings(&state.draft);
    }

    pub fn edit_password(&self, password: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.draft.password = password.into();
        state.warnings = warnings(&state.draft);
    }

    pub fn edit_mnemonic(&self, mnemonic: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.draft.mnemonic = mnemonic.into();
    }

    /// Switching back to random creation drops any pasted mnemonic.
    pub fn set_mode(&self, mode: Mode) {
        let mut state = self.state.lock().unwrap();
        state.draft.mode = mode;
        if mode == Mode::Random {
            state.draft.mnemonic.clear();
        }
    }

    pub fn draft(&self) -> Draft {
        self.state.lock().unwrap().draft.clone()
    }

    pub fn error(&self) -> Option<Error> {
        self.state.lock().unwrap().error.clone()
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.state.lock().unwrap().warnings.clone()
    }

    /// Mnemonic of a freshly created wallet, held until the user confirms
    /// it is backed up.
    pub fn pending_backup(&self) -> Option<String> {
        self.state.lock().unwrap().pending_backup.clone()
    }

    pub async fn submit(&self) -> Result<Submitted, Error> {
        let draft = {
            let mut state = self.state.lock().unwrap();
            state.error = None;
            state.draft.clone()
        };
        if let Err(e) = validate(&draft, &self.wallets.names()) {
            self.state.lock().unwrap().error = Some(e.clone());
            return Err(e);
        }
        let submitted = match draft.mode {
            Mode::DirectMnemonic => self
                .backend
                .restore_wallet(&draft.name, &draft.password, &draft.mnemonic)
                .await
                .map(|_| Submitted::Restored),
            Mode::Random => self
                .backend
                .create_new_random_wallet(&draft.name, &draft.password)
                .await
                .map(|mnemonic| {
                    self.state.lock().unwrap().pending_backup = Some(mnemonic);
                    Submitted::Created
                }),
        };
        match submitted {
            Ok(Submitted::Restored) => {
                info!("wallet '{}' restored", draft.name);
                self.finish(&draft.name).await?;
                Ok(Submitted::Restored)
            }
            Ok(Submitted::Created) => {
                info!("wallet '{}' created, waiting for mnemonic backup", draft.name);
                Ok(Submitted::Created)
            }
            Err(e) => {
                let e = Error::from(e);
                self.state.lock().unwrap().error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// The user acknowledged the backup of the fresh mnemonic: drop it and
    /// move the shell onto the new wallet.
    pub async fn confirm_backup(&self) -> Result<(), Error> {
        let name = {
            let mut state = self.state.lock().unwrap();
            if state.pending_backup.take().is_none() {
                return Ok(());
            }
            state.draft.name.clone()
        };
        self.finish(&name).await
    }

    async fn finish(&self, name: &str) -> Result<(), Error> {
        self.wallets.refresh().await?;
        self.wallets.select(name)?;
        self.state.lock().unwrap().draft = Draft::default();
        Ok(())
    }
}
