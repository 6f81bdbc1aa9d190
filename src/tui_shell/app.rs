use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use time::OffsetDateTime;

use crate::cache::ToggleOutcome;
use crate::model::{CanonicalStore, Entry, RemoteConfig, SavePolicy, fallback_path_for};
use crate::remote::{RemoteClient, Subscription, TreeStore};
use crate::session::{EditState, Notice, RemoteEvent, SessionError, SyncController};
use crate::store::LocalStore;

use super::input::Input;

mod event_loop;
mod render;
mod runtime;

pub(super) use runtime::run;

const LOG_LIMIT: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum LogKind {
    Info,
    Warn,
    Error,
}

#[derive(Clone, Debug)]
pub(super) struct LogLine {
    pub(super) at: OffsetDateTime,
    pub(super) kind: LogKind,
    pub(super) text: String,
}

/// What the text field is currently collecting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Prompt {
    Url { key: String },
    Path { key: String },
    NewKey,
}

impl Prompt {
    pub(super) fn label(&self) -> String {
        match self {
            Prompt::Url { key } => format!("url for {}>", key),
            Prompt::Path { key } => format!("path for {}>", key),
            Prompt::NewKey => "new entry name>".to_string(),
        }
    }
}

/// Where recall and policy changes are written back to, when the app runs against a real store.
pub(super) struct Persistence {
    store: LocalStore,
    remote: RemoteConfig,
}

pub(super) struct App {
    pub(super) controller: SyncController,
    notices: Receiver<Notice>,
    events_tx: Sender<RemoteEvent>,
    events: Receiver<RemoteEvent>,
    tree: Arc<dyn TreeStore + Send + Sync>,
    _subscription: Subscription,
    persistence: Option<Persistence>,

    pub(super) remote_label: String,
    pub(super) selected: usize,
    pub(super) prompt: Option<Prompt>,
    pub(super) input: Input,
    pub(super) log: Vec<LogLine>,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn load(opts: &crate::tui::TuiRunOptions) -> Result<Self> {
        let store = LocalStore::open(&opts.home)?;
        let cfg = store.read_config()?;
        let remote = store.require_remote()?;
        let recall = store.recall_for(&remote)?;
        let client = RemoteClient::new(remote.clone())?;

        let mut app = Self::new(Arc::new(client), cfg.save_policy, recall, Duration::from_secs(20));
        app.remote_label = format!("{} {}", remote.base_url, remote.tree_path);
        app.persistence = Some(Persistence { store, remote });
        Ok(app)
    }

    pub(super) fn new(
        tree: Arc<dyn TreeStore + Send + Sync>,
        policy: SavePolicy,
        recall: CanonicalStore,
        poll: Duration,
    ) -> Self {
        let (notice_tx, notices) = mpsc::channel();
        let (events_tx, events) = mpsc::channel();
        let controller = SyncController::new(policy, notice_tx).with_recall(recall);
        let subscription = Subscription::spawn_with_poll(tree.clone(), events_tx.clone(), poll);

        Self {
            controller,
            notices,
            events_tx,
            events,
            tree,
            _subscription: subscription,
            persistence: None,
            remote_label: String::new(),
            selected: 0,
            prompt: None,
            input: Input::default(),
            log: Vec::new(),
            quit: false,
        }
    }

    /// Feed queued remote events to the controller and surface its notices.
    pub(super) fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.controller.handle_event(event);
        }

        let notices: Vec<Notice> = self.notices.try_iter().collect();
        for notice in notices {
            let kind = match &notice {
                Notice::Saved { .. } => LogKind::Info,
                Notice::RemoteEmpty | Notice::RemoteChanged | Notice::SavedWithWarnings { .. } => {
                    LogKind::Warn
                }
                Notice::ReadFailed(_) | Notice::WriteFailed(_) => LogKind::Error,
            };
            let saved = matches!(
                notice,
                Notice::Saved { .. } | Notice::SavedWithWarnings { .. }
            );
            self.push_log(kind, notice.to_string());
            if saved {
                self.persist_recall();
            }
        }

        let len = self.controller.view().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub(super) fn selected_key(&self) -> Option<String> {
        self.controller.view().keys().nth(self.selected).cloned()
    }

    pub(super) fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(super) fn move_down(&mut self) {
        let len = self.controller.view().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub(super) fn status_label(&self) -> &'static str {
        if self.controller.save_pending() {
            "saving"
        } else {
            match self.controller.state() {
                EditState::Viewing => "viewing",
                EditState::Editing => "editing",
            }
        }
    }

    pub(super) fn start_edit(&mut self) {
        match self.controller.start_edit() {
            Ok(()) => self.push_log(LogKind::Info, "editing (s save, Esc discard)".to_string()),
            Err(err) => self.push_session_error(err),
        }
    }

    pub(super) fn cancel_edit(&mut self) {
        match self.controller.cancel() {
            Ok(()) => self.push_log(LogKind::Info, "changes discarded".to_string()),
            Err(err) => self.push_session_error(err),
        }
    }

    pub(super) fn toggle_selected(&mut self) {
        let Some(key) = self.selected_key() else {
            return;
        };
        match self.controller.toggle(&key) {
            Ok(ToggleOutcome::Deactivated) => {
                self.push_log(LogKind::Info, format!("{} disabled", key))
            }
            Ok(ToggleOutcome::Restored) => self.push_log(LogKind::Info, format!("{} enabled", key)),
            Ok(ToggleOutcome::NothingToRestore) => self.push_log(
                LogKind::Warn,
                format!("{} has no previous url; press Enter to set one", key),
            ),
            Err(err) => self.push_session_error(err),
        }
    }

    pub(super) fn open_prompt(&mut self, prompt: Prompt) {
        if !self.controller.is_editing() {
            self.push_session_error(SessionError::NotEditing);
            return;
        }
        let initial = match &prompt {
            Prompt::Url { key } => self.controller.view().get(key).map(|e| e.url.clone()),
            Prompt::Path { key } => self.controller.view().get(key).map(|e| e.path.clone()),
            Prompt::NewKey => None,
        };
        self.input.set(initial.as_deref().unwrap_or(""));
        self.prompt = Some(prompt);
    }

    pub(super) fn close_prompt(&mut self) {
        self.prompt = None;
        self.input.clear();
    }

    pub(super) fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let text = self.input.buf.clone();
        self.input.clear();

        let res = match &prompt {
            Prompt::Url { key } => self.controller.set_url(key, text.trim()),
            Prompt::Path { key } => self.controller.set_path(key, text.trim()),
            Prompt::NewKey => {
                let key = text.trim().to_string();
                let entry = Entry::new("", fallback_path_for(&key));
                self.controller.add_entry(&key, entry).map(|()| {
                    if let Some(pos) = self.controller.view().keys().position(|k| *k == key) {
                        self.selected = pos;
                    }
                })
            }
        };
        if let Err(err) = res {
            self.push_session_error(err);
        }
    }

    pub(super) fn reset_to_defaults(&mut self) {
        match self.controller.reset_to_defaults() {
            Ok(()) => self.push_log(
                LogKind::Info,
                "factory entries staged (s save, Esc discard)".to_string(),
            ),
            Err(err) => self.push_session_error(err),
        }
    }

    /// Reserve a save and hand the write to a worker; the result comes back as an event.
    pub(super) fn save(&mut self) {
        let ticket = match self.controller.begin_save() {
            Ok(ticket) => ticket,
            Err(err) => {
                self.push_session_error(err);
                return;
            }
        };

        let id = ticket.id;
        let tree = self.tree.clone();
        let events = self.events_tx.clone();
        let spawned = std::thread::Builder::new()
            .name("linkdeck-save".to_string())
            .spawn(move || {
                let result = tree.write(&ticket.tree).map_err(|err| format!("{:#}", err));
                let _ = events.send(RemoteEvent::SaveFinished {
                    ticket: ticket.id,
                    result,
                });
            });
        if let Err(err) = spawned {
            tracing::error!(error = %err, "could not start save worker");
            let _ = self.controller.finish_save(id, Err(err.to_string()));
            return;
        }
        self.push_log(LogKind::Info, "saving...".to_string());
    }

    pub(super) fn cycle_policy(&mut self) {
        let next = match self.controller.policy() {
            SavePolicy::Permissive => SavePolicy::Strict,
            SavePolicy::Strict => SavePolicy::Permissive,
        };
        self.controller.set_policy(next);
        if let Some(p) = &self.persistence {
            let res = p.store.read_config().and_then(|mut cfg| {
                cfg.save_policy = next;
                p.store.write_config(&cfg)
            });
            if let Err(err) = res {
                self.push_log(LogKind::Error, format!("could not store policy: {:#}", err));
                return;
            }
        }
        self.push_log(LogKind::Info, format!("save policy: {}", next));
    }

    pub(super) fn push_log(&mut self, kind: LogKind, text: String) {
        self.log.push(LogLine {
            at: OffsetDateTime::now_utc(),
            kind,
            text,
        });
        if self.log.len() > LOG_LIMIT {
            let excess = self.log.len() - LOG_LIMIT;
            self.log.drain(..excess);
        }
    }

    fn push_session_error(&mut self, err: SessionError) {
        let kind = match err {
            SessionError::InvalidEntries(_) => LogKind::Error,
            _ => LogKind::Warn,
        };
        self.push_log(kind, err.to_string());
    }

    fn persist_recall(&mut self) {
        let Some(p) = &self.persistence else {
            return;
        };
        let res = p
            .store
            .save_recall(&p.remote, self.controller.cache().last_known_active());
        if let Err(err) = res {
            self.push_log(
                LogKind::Error,
                format!("could not store remembered urls: {:#}", err),
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
