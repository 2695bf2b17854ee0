use miniurl_core::link::ShortLink;
use tracing::{info, warn};

use super::{App, Notice};
use crate::strings::NOTICE_COPIED;
use crate::ui::HISTORY_ENTRY_LINES;

impl App {
    /// Prepend and rewrite the persisted list. A failed write is logged and
    /// the in-memory list keeps going.
    pub fn append_history(&mut self, created: ShortLink) {
        self.history.insert(0, created);
        self.history_selected = 0;
        self.history_scroll = 0;
        if let Err(e) = self.store.save(&self.history) {
            warn!(target: "tui", "history save failed: {:#}", e);
        }
    }

    pub fn history_select_up(&mut self) {
        if self.history_selected > 0 {
            self.history_selected -= 1;
        }
        self.ensure_history_visible();
    }

    pub fn history_select_down(&mut self) {
        if self.history_selected + 1 < self.history.len() {
            self.history_selected += 1;
        }
        self.ensure_history_visible();
    }

    // Entries rendered per panel view, from the area measured at last draw.
    pub fn history_view_rows(&self) -> usize {
        self.history_area
            .map(|a| (a.height.saturating_sub(2) / HISTORY_ENTRY_LINES) as usize)
            .unwrap_or(0)
    }

    pub fn ensure_history_visible(&mut self) {
        let rows = self.history_view_rows().max(1);
        let start = self.history_scroll as usize;
        if self.history_selected < start {
            self.history_scroll = self.history_selected as u16;
        } else if self.history_selected >= start + rows {
            self.history_scroll = (self.history_selected + 1 - rows) as u16;
        }
    }

    pub fn copy_selected(&mut self) {
        let Some(text) = self
            .history
            .get(self.history_selected)
            .map(|l| l.tiny_url.clone())
        else {
            return;
        };
        self.copy_text(&text);
    }

    pub fn copy_result(&mut self) {
        let Some(text) = self.result.as_ref().map(|l| l.tiny_url.clone()) else {
            return;
        };
        self.copy_text(&text);
    }

    fn copy_text(&mut self, text: &str) {
        match crate::clipboard::copy(text) {
            Ok(()) => {
                info!(target: "tui", "copied {} to clipboard", text);
                self.notice = Some(Notice::new(NOTICE_COPIED));
            }
            // Best effort only; the failure stays in the log.
            Err(e) => warn!(target: "tui", "clipboard copy failed: {:#}", e),
        }
        self.dirty = true;
    }
}
