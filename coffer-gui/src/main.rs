use std::collections::HashMap;
use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::error;

use coffer_gui::{
    app::{
        config::{self, Config},
        create::Mode,
        nav::{PaneContent, TabControl, Trigger},
        view, App,
    },
    args::{parse_args, Arg},
    backend::client::{jsonrpc::JsonRpcClient, Cofferd},
    logger, VERSION,
};

/// A tab rendered as a terminal section header. The trigger is shared with
/// the command loop, which fires it on `tab <key>` the way a click would.
struct TermTab {
    key: String,
    trigger: Arc<Mutex<Option<Trigger>>>,
}

impl TabControl for TermTab {
    fn set_active(&mut self, active: bool) {
        if active {
            println!("=== {} ===", self.key);
        }
    }

    fn connect_trigger(&mut self, trigger: Trigger) {
        *self.trigger.lock().unwrap() = Some(trigger);
    }
}

/// Content regions have no terminal geometry; `show` prints the active
/// pane on demand instead.
struct TermPane;

impl PaneContent for TermPane {
    fn set_visible(&mut self, _visible: bool) {}
}

const HELP: &str = "\
commands:
  tabs                                 list tabs
  tab <key>                            switch tab
  wallets                              list wallets
  select <name>                        select a wallet
  new <name> [password]                create a wallet from fresh entropy
  restore <name> <password> <words..>  restore a wallet from a mnemonic
  ack                                  confirm the mnemonic backup
  reveal [password]                    decrypt the selected wallet's mnemonic
  change <amount>                      set the change amount of the draft tx
  show                                 print the active pane
  quit";

#[tokio::main]
async fn main() {
    let args = match parse_args(std::env::args().collect(), VERSION) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let datadir: PathBuf = args
        .into_iter()
        .map(|Arg::DatadirPath(path)| path)
        .next()
        .map(Ok)
        .unwrap_or_else(config::default_datadir)
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            process::exit(1);
        });
    if let Err(e) = std::fs::create_dir_all(&datadir) {
        eprintln!("Failed to create datadir {}: {}", datadir.display(), e);
        process::exit(1);
    }

    let config = match Config::from_file(&datadir.join(config::DEFAULT_FILE_NAME)) {
        Ok(config) => config,
        Err(config::ConfigError::NotFound) => Config::default(),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let log_level = match logger::parse_log_level() {
        Ok(Some(level)) => level,
        Ok(None) => config.log_level().unwrap_or_else(|e| {
            eprintln!("{}", e);
            process::exit(1);
        }),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    if let Err(e) = logger::setup_logger(log_level, &datadir) {
        eprintln!("{}", e);
        process::exit(1);
    }

    let socket = config.socket_path(&datadir);
    let backend = Arc::new(Cofferd::new(JsonRpcClient::new(&socket)));
    let app = App::new(backend);

    let mut triggers: HashMap<String, Arc<Mutex<Option<Trigger>>>> = HashMap::new();
    for key in ["wallets", "receive", "send", "backup"].iter() {
        let trigger = Arc::new(Mutex::new(None));
        app.register_tab(
            Box::new(TermTab {
                key: key.to_string(),
                trigger: trigger.clone(),
            }),
            Box::new(TermPane),
            key,
        );
        triggers.insert(key.to_string(), trigger);
    }
    if let Err(e) = app.nav().activate("wallets") {
        error!("{}", e);
    }

    match app.bootstrap().await {
        Ok(()) => {
            if app.wallets().selected().is_none() {
                println!("No wallets yet, create one with: new <name> [password]");
            }
        }
        Err(e) => eprintln!("Could not load wallets from cofferd at {}: {}", socket.display(), e),
    }
    println!("{}", HELP);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["help"] => println!("{}", HELP),
            ["quit"] | ["exit"] => break,
            ["tabs"] => {
                let active = app.nav().active();
                for key in app.nav().keys() {
                    let marker = if Some(&key) == active.as_ref() { "*" } else { " " };
                    println!("{} {}", marker, key);
                }
            }
            ["tab", key] => match triggers.get(*key) {
                Some(trigger) => {
                    if let Some(trigger) = trigger.lock().unwrap().as_ref() {
                        trigger();
                    }
                }
                None => eprintln!("no such tab: {}", key),
            },
            ["wallets"] => {
                let selected = app.wallets().selected();
                for wallet in app.wallets().wallets() {
                    println!(
                        "{}",
                        view::wallet_row(&wallet, Some(&wallet) == selected.as_ref())
                    );
                }
            }
            ["select", name] => {
                if let Err(e) = app.wallets().select(name) {
                    eprintln!("{}", e);
                }
            }
            ["new", name, rest @ ..] => {
                let form = app.create();
                form.set_mode(Mode::Random);
                form.edit_name(*name);
                form.edit_password(rest.first().copied().unwrap_or(""));
                match form.submit().await {
                    Ok(_) => print!("{}", view::create_form(form)),
                    Err(e) => eprintln!("{}", e),
                }
            }
            ["restore", name, password, mnemonic @ ..] => {
                let form = app.create();
                form.set_mode(Mode::DirectMnemonic);
                form.edit_name(*name);
                form.edit_password(*password);
                form.edit_mnemonic(mnemonic.join(" "));
                match form.submit().await {
                    Ok(_) => println!("wallet '{}' restored", name),
                    Err(e) => eprintln!("{}", e),
                }
            }
            ["ack"] => {
                if let Err(e) = app.create().confirm_backup().await {
                    eprintln!("{}", e);
                }
            }
            ["reveal", rest @ ..] => {
                if let Err(e) = app.backup().reveal(rest.first().copied().unwrap_or("")).await {
                    eprintln!("{}", e);
                }
            }
            ["change", amount] => match amount.parse() {
                Ok(amount) => app.send().set_change_amount(amount),
                Err(e) => eprintln!("{}", e),
            },
            ["show"] => {
                // Leave in-flight fetches a beat to settle.
                tokio::time::sleep(Duration::from_millis(150)).await;
                match app.nav().active().as_deref() {
                    Some("receive") => print!("{}", view::receive(app.receive())),
                    Some("send") => print!("{}", view::send(app.send())),
                    Some("backup") => print!("{}", view::backup(app.backup())),
                    Some("wallets") => {
                        let selected = app.wallets().selected();
                        for wallet in app.wallets().wallets() {
                            println!(
                                "{}",
                                view::wallet_row(&wallet, Some(&wallet) == selected.as_ref())
                            );
                        }
                        print!("{}", view::create_form(app.create()));
                    }
                    _ => {}
                }
            }
            _ => eprintln!("unknown command, try 'help'"),
        }
    }
}
