use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};

use linkdeck::cache::ToggleOutcome;
use linkdeck::model::{CanonicalStore, Entry, RemoteConfig, SavePolicy, fallback_path_for};
use linkdeck::remote::{RemoteClient, Subscription, TreeStore};
use linkdeck::session::{Notice, RemoteEvent, SyncController};
use linkdeck::store::LocalStore;
use linkdeck::validate::{UrlIssue, is_valid_url};

use crate::{Commands, PolicyCommands, RemoteCommands};

pub(crate) fn handle_command(home: &Path, command: Commands) -> Result<()> {
    if let Commands::Init { force } = command {
        let store = LocalStore::init(home, force)?;
        println!("Initialized linkdeck store at {}", store.root().display());
        return Ok(());
    }

    let store = LocalStore::open(home)?;
    match command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Remote { command } => handle_remote_command(&store, command)?,
        Commands::Policy { command } => handle_policy_command(&store, command)?,
        Commands::List { json } => {
            let session = Session::load(&store)?;
            print_entries(session.controller.view(), json)?;
        }
        Commands::Set { key, url, path } => {
            let key = key.trim().to_string();
            if url.is_none() && path.is_none() {
                anyhow::bail!("nothing to change (pass --url and/or --path)");
            }
            let mut session = Session::load(&store)?;
            let c = &mut session.controller;
            c.start_edit()?;
            if c.view().contains_key(&key) {
                if let Some(url) = &url {
                    c.set_url(&key, url)?;
                }
                if let Some(path) = &path {
                    c.set_path(&key, path)?;
                }
            } else {
                let entry = Entry {
                    url: url.unwrap_or_default(),
                    path: path.unwrap_or_else(|| fallback_path_for(&key)),
                };
                c.add_entry(&key, entry)?;
                println!("Added {}", key);
            }
            session.save(&store)?;
        }
        Commands::Toggle { key } => {
            let mut session = Session::load(&store)?;
            session.controller.start_edit()?;
            let outcome = session.controller.toggle(&key)?;
            session.save(&store)?;
            match outcome {
                ToggleOutcome::Deactivated => println!("{} disabled (url kept for re-enable)", key),
                ToggleOutcome::Restored => println!("{} enabled", key),
                ToggleOutcome::NothingToRestore => println!(
                    "{} has no previous url to restore; set one with `linkdeck set {} --url ...`",
                    key, key
                ),
            }
        }
        Commands::Reset => {
            let mut session = Session::load(&store)?;
            session.controller.reset_to_defaults()?;
            session.save(&store)?;
        }
        Commands::Check { strict } => {
            let session = Session::load(&store)?;
            let warnings = session.controller.warnings();
            for w in &warnings {
                println!("{}", w);
            }
            let invalid = warnings
                .iter()
                .filter(|w| w.issue == UrlIssue::Unparseable)
                .count();
            if warnings.is_empty() {
                println!("All urls valid");
            }
            if strict && invalid > 0 {
                anyhow::bail!("{} invalid url(s)", invalid);
            }
        }
        Commands::Watch { count, json } => watch(&store, count, json)?,
    }

    Ok(())
}

fn handle_remote_command(store: &LocalStore, command: RemoteCommands) -> Result<()> {
    match command {
        RemoteCommands::Show { json } => {
            let cfg = store.read_config()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&cfg.remote).context("serialize remote json")?
                );
            } else if let Some(remote) = cfg.remote {
                println!("url: {}", remote.base_url);
                println!("path: {}", remote.tree_path);
            } else {
                println!("No remote configured");
            }
        }
        RemoteCommands::Set { url, path } => {
            if !is_valid_url(&url) {
                anyhow::bail!("invalid remote url {:?}", url);
            }
            let mut cfg = store.read_config()?;
            cfg.remote = Some(RemoteConfig {
                base_url: url.trim_end_matches('/').to_string(),
                tree_path: path,
            });
            store.write_config(&cfg)?;
            println!("Remote configured");
        }
    }
    Ok(())
}

fn handle_policy_command(store: &LocalStore, command: PolicyCommands) -> Result<()> {
    match command {
        PolicyCommands::Show => {
            println!("{}", store.read_config()?.save_policy);
        }
        PolicyCommands::Set { policy } => {
            let policy: SavePolicy = policy.parse()?;
            let mut cfg = store.read_config()?;
            cfg.save_policy = policy;
            store.write_config(&cfg)?;
            println!("Save policy set to {}", policy);
        }
    }
    Ok(())
}

/// A controller loaded with the current remote tree and the persisted recall.
struct Session {
    client: RemoteClient,
    controller: SyncController,
    notices: Receiver<Notice>,
}

impl Session {
    fn load(store: &LocalStore) -> Result<Self> {
        let cfg = store.read_config()?;
        let remote = store.require_remote()?;
        let recall = store.recall_for(&remote)?;
        let client = RemoteClient::new(remote)?;
        let snapshot = client.read()?;

        let (tx, notices) = mpsc::channel();
        let mut controller = SyncController::new(cfg.save_policy, tx).with_recall(recall);
        controller.handle_event(RemoteEvent::Snapshot(snapshot));

        for notice in notices.try_iter() {
            eprintln!("{}", notice);
        }

        Ok(Self {
            client,
            controller,
            notices,
        })
    }

    fn save(&mut self, store: &LocalStore) -> Result<()> {
        self.controller.save_with(&self.client)?;

        let mut failure = None;
        for notice in self.notices.try_iter() {
            match notice {
                Notice::WriteFailed(err) => failure = Some(err),
                Notice::SavedWithWarnings { .. } => eprintln!("warning: {}", notice),
                other => println!("{}", other),
            }
        }
        if let Some(err) = failure {
            anyhow::bail!("save failed: {}", err);
        }

        store
            .save_recall(self.client.remote(), self.controller.cache().last_known_active())
            .context("persist last-known-active urls")?;
        Ok(())
    }
}

fn watch(store: &LocalStore, count: Option<usize>, json: bool) -> Result<()> {
    let cfg = store.read_config()?;
    let remote = store.require_remote()?;
    let client: Arc<dyn TreeStore + Send + Sync> = Arc::new(RemoteClient::new(remote.clone())?);

    let (notice_tx, notices) = mpsc::channel();
    let mut controller = SyncController::new(cfg.save_policy, notice_tx)
        .with_recall(store.recall_for(&remote)?);

    let (tx, rx) = mpsc::channel();
    let _subscription = Subscription::spawn(client, tx);

    let mut seen = 0usize;
    while count.is_none_or(|n| seen < n) {
        let event = rx.recv().context("subscription ended")?;
        let is_snapshot = matches!(event, RemoteEvent::Snapshot(_));
        controller.handle_event(event);
        for notice in notices.try_iter() {
            eprintln!("{}", notice);
        }
        if !is_snapshot {
            continue;
        }

        seen += 1;
        if !json {
            println!("-- revision {}", controller.last_revision().unwrap_or_default());
        }
        print_entries(controller.view(), json)?;
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct EntryRow<'a> {
    url: &'a str,
    path: &'a str,
    active: bool,
    valid: bool,
}

fn print_entries(entries: &CanonicalStore, json: bool) -> Result<()> {
    if json {
        let rows: std::collections::BTreeMap<&str, EntryRow<'_>> = entries
            .iter()
            .map(|(k, e)| {
                (
                    k.as_str(),
                    EntryRow {
                        url: &e.url,
                        path: &e.path,
                        active: e.is_active(),
                        valid: is_valid_url(&e.url),
                    },
                )
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string(&rows).context("serialize entries json")?
        );
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries");
        return Ok(());
    }
    let width = entries.keys().map(|k| k.len()).max().unwrap_or(0);
    for (key, e) in entries {
        let state = if e.is_active() { "on " } else { "off" };
        let flag = if e.is_active() && !is_valid_url(&e.url) {
            " (invalid)"
        } else {
            ""
        };
        println!(
            "{:<width$}  {}  {}{} -> {}",
            key,
            state,
            if e.url.is_empty() { "-" } else { e.url.as_str() },
            flag,
            e.path,
            width = width
        );
    }
    Ok(())
}
