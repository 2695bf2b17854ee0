use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use miniurl_core::link::{self, LinkClient as _, LinkError, LinkRequest, ShortLink, ValidationErrors};
use miniurl_providers::tinyurl::{config::TinyUrlConfig, TinyUrlClient};
use ratatui::layout::Rect;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing::{error, info};
use unicode_segmentation::UnicodeSegmentation;

pub mod form;
pub mod history;

use crate::persist::HistoryStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Url,
    Alias,
    Tags,
    ExpiresAt,
    Description,
    History,
}

/// Transient status-line message, e.g. after a clipboard copy.
pub struct Notice {
    pub text: String,
    since: Instant,
}

impl Notice {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            since: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.since.elapsed() > Duration::from_secs(3)
    }
}

pub struct App {
    pub form: LinkRequest,
    pub errors: ValidationErrors,
    pub result: Option<ShortLink>,
    pub history: Vec<ShortLink>,
    pub url_history: Vec<String>,
    pub url_history_index: Option<usize>,
    pub focus: Focus,
    pub field_cursor: usize,
    pub loading: bool,
    pub show_history: bool,
    pub history_selected: usize,
    pub history_scroll: u16,
    pub history_area: Option<Rect>,
    pub notice: Option<Notice>,
    pub should_quit: bool,
    pub dirty: bool,
    outcome_rx: Option<Receiver<Result<ShortLink, LinkError>>>,
    store: HistoryStore,
}

impl App {
    pub fn new() -> Self {
        let mut s = Self::with_store(HistoryStore::open_default());
        // Pre-fill the domain from provider config when one is available.
        if let Ok(cfg) = TinyUrlConfig::from_env_and_file() {
            s.form.domain = cfg.domain;
        }
        if let Ok(Some(p)) = crate::persist::load_state() {
            s.show_history = p.show_history;
        }
        s
    }

    pub fn with_store(store: HistoryStore) -> Self {
        let history = store.load();
        Self {
            form: LinkRequest::default(),
            errors: ValidationErrors::default(),
            result: None,
            history,
            url_history: Vec::new(),
            url_history_index: None,
            focus: Focus::Url,
            field_cursor: 0,
            loading: false,
            show_history: false,
            history_selected: 0,
            history_scroll: 0,
            history_area: None,
            notice: None,
            should_quit: false,
            dirty: true,
            outcome_rx: None,
            store,
        }
    }

    /// Validate, then hand the request to a worker thread. The loading flag is
    /// the only single-flight guard; the UI disables submit while it is set.
    pub fn submit(&mut self) {
        if self.loading {
            return;
        }
        let errs = link::validate(&self.form);
        if errs.blocks_submit() {
            self.errors = errs;
            self.dirty = true;
            return;
        }
        self.errors.clear();
        let url_text = self.form.url.trim().to_string();
        self.record_url_history(&url_text);

        self.loading = true;
        let (tx, rx) = std::sync::mpsc::channel::<Result<ShortLink, LinkError>>();
        self.outcome_rx = Some(rx);
        let req = self.form.clone();
        info!(target: "tui", "submit: domain={} alias_chars={}", req.domain, req.alias.trim().chars().count());
        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = tx.send(Err(LinkError::Other(format!("runtime: {}", e))));
                    return;
                }
            };
            rt.block_on(async move {
                let cfg = match TinyUrlConfig::from_env_and_file() {
                    Ok(c) => c,
                    Err(e) => {
                        error!(target: "tui", "submit config error: {}", e);
                        let _ = tx.send(Err(LinkError::Other(format!("config: {}", e))));
                        return;
                    }
                };
                let client = match TinyUrlClient::new(cfg) {
                    Ok(c) => c,
                    Err(e) => {
                        error!(target: "tui", "submit client build error: {}", e);
                        let _ = tx.send(Err(LinkError::Other(format!("client: {}", e))));
                        return;
                    }
                };
                let _ = tx.send(client.create_link(&req).await);
            });
        });
        self.dirty = true;
    }

    /// Apply one submission outcome. Success rewrites history and clears the
    /// submitted fields; failure surfaces the single api message and leaves
    /// the form exactly as typed.
    pub fn finish_submit(&mut self, outcome: Result<ShortLink, LinkError>) {
        self.loading = false;
        match outcome {
            Ok(created) => {
                info!(target: "tui", "created {}", created.tiny_url);
                self.append_history(created.clone());
                self.result = Some(created);
                self.form.clear_submitted();
                self.field_cursor = 0;
                self.errors.clear();
            }
            Err(e) => {
                error!(target: "tui", "create failed: {}", e);
                self.errors.api = Some(e.to_string());
            }
        }
        self.dirty = true;
    }

    pub fn reset_result(&mut self) {
        self.result = None;
        self.set_focus(Focus::Url);
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        if !self.show_history && matches!(self.focus, Focus::History) {
            self.set_focus(Focus::Url);
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.field_cursor = self
            .active_field()
            .map(|s| s.graphemes(true).count())
            .unwrap_or(0);
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = if self.result.is_some() {
            Vec::new()
        } else {
            vec![
                Focus::Url,
                Focus::Alias,
                Focus::Tags,
                Focus::ExpiresAt,
                Focus::Description,
            ]
        };
        if self.show_history {
            order.push(Focus::History);
        }
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        if order.is_empty() {
            return;
        }
        let next = order
            .iter()
            .position(|f| *f == self.focus)
            .map(|p| (p + 1) % order.len())
            .unwrap_or(0);
        self.set_focus(order[next]);
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        if order.is_empty() {
            return;
        }
        let prev = order
            .iter()
            .position(|f| *f == self.focus)
            .map(|p| (p + order.len() - 1) % order.len())
            .unwrap_or(0);
        self.set_focus(order[prev]);
    }

    // The caret is shown only while a form field is being edited.
    pub fn editing_field(&self) -> bool {
        self.result.is_none() && !matches!(self.focus, Focus::History)
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if !matches!(key.kind, KeyEventKind::Press) {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::F(2) => {
                self.toggle_history();
                let _ = crate::persist::save_state(&crate::persist::SavedState::from(&*self));
            }
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            _ => {
                if self.show_history && matches!(self.focus, Focus::History) {
                    self.on_key_history(key);
                } else if self.result.is_some() {
                    self.on_key_result(key);
                } else {
                    self.on_key_form(key);
                }
            }
        }
        self.dirty = true;
    }

    fn on_key_history(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.history_select_up(),
            KeyCode::Down => self.history_select_down(),
            KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('C') => self.copy_selected(),
            KeyCode::Char('n') | KeyCode::Char('N') if self.result.is_some() => {
                self.reset_result();
            }
            _ => {}
        }
    }

    fn on_key_result(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => self.copy_result(),
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => self.reset_result(),
            _ => {}
        }
    }

    fn on_key_form(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.delete_left_grapheme(),
            KeyCode::Delete => self.delete_right_grapheme(),
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor_home();
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor_end();
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.delete_prev_word();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.kill_to_start();
            }
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.kill_to_end();
            }
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor_home(),
            KeyCode::End => self.cursor_end(),
            KeyCode::Up if matches!(self.focus, Focus::Url) => self.url_history_prev(),
            KeyCode::Down if matches!(self.focus, Focus::Url) => self.url_history_next(),
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    let mut buf = [0u8; 4];
                    let s = ch.encode_utf8(&mut buf);
                    self.insert_text(s);
                }
            }
            _ => {}
        }
    }

    pub fn paste(&mut self, s: &str) {
        if !self.editing_field() {
            return;
        }
        // Form fields are single-line.
        let flat = s.replace(['\r', '\n'], " ");
        self.insert_text(&flat);
        self.dirty = true;
    }

    pub fn on_tick(&mut self) {
        if let Some(n) = &self.notice {
            if n.expired() {
                self.notice = None;
                self.dirty = true;
            }
        }
        if let Some(rx) = &self.outcome_rx {
            match rx.try_recv() {
                Ok(outcome) => {
                    self.outcome_rx = None;
                    self.finish_submit(outcome);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.outcome_rx = None;
                    self.loading = false;
                    self.errors.api = Some("request worker exited unexpectedly".to_string());
                    self.dirty = true;
                }
            }
        }
    }
}
