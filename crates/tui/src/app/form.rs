use unicode_segmentation::UnicodeSegmentation;

use super::{App, Focus};

impl App {
    pub fn active_field(&self) -> Option<&String> {
        match self.focus {
            Focus::Url => Some(&self.form.url),
            Focus::Alias => Some(&self.form.alias),
            Focus::Tags => Some(&self.form.tags),
            Focus::ExpiresAt => Some(&self.form.expires_at),
            Focus::Description => Some(&self.form.description),
            Focus::History => None,
        }
    }

    fn active_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Url => Some(&mut self.form.url),
            Focus::Alias => Some(&mut self.form.alias),
            Focus::Tags => Some(&mut self.form.tags),
            Focus::ExpiresAt => Some(&mut self.form.expires_at),
            Focus::Description => Some(&mut self.form.description),
            Focus::History => None,
        }
    }

    fn active_len(&self) -> usize {
        self.active_field()
            .map(|s| s.graphemes(true).count())
            .unwrap_or(0)
    }

    // Every mutation below counts as an edit and discards stale errors.

    pub fn insert_text(&mut self, s: &str) {
        let cursor = self.field_cursor;
        let Some(field) = self.active_field_mut() else {
            return;
        };
        let parts: Vec<&str> = field.graphemes(true).collect();
        let idx = cursor.min(parts.len());
        let mut next = String::with_capacity(field.len() + s.len());
        for g in &parts[..idx] {
            next.push_str(g);
        }
        next.push_str(s);
        for g in &parts[idx..] {
            next.push_str(g);
        }
        *field = next;
        let added = s.graphemes(true).count();
        let total = field.graphemes(true).count();
        self.field_cursor = (idx + added).min(total);
        self.errors.clear();
    }

    pub fn delete_left_grapheme(&mut self) {
        let cursor = self.field_cursor;
        if cursor == 0 {
            return;
        }
        let Some(field) = self.active_field_mut() else {
            return;
        };
        let mut parts: Vec<&str> = field.graphemes(true).collect();
        let idx = cursor.min(parts.len());
        if idx == 0 {
            return;
        }
        parts.remove(idx - 1);
        *field = parts.concat();
        self.field_cursor = idx - 1;
        self.errors.clear();
    }

    pub fn delete_right_grapheme(&mut self) {
        let cursor = self.field_cursor;
        let Some(field) = self.active_field_mut() else {
            return;
        };
        let mut parts: Vec<&str> = field.graphemes(true).collect();
        let idx = cursor.min(parts.len());
        if idx < parts.len() {
            parts.remove(idx);
            *field = parts.concat();
            self.errors.clear();
        }
    }

    pub fn delete_prev_word(&mut self) {
        let cursor = self.field_cursor;
        if cursor == 0 {
            return;
        }
        let Some(field) = self.active_field_mut() else {
            return;
        };
        let parts: Vec<&str> = field.graphemes(true).collect();
        let end = cursor.min(parts.len());
        let mut i = end;
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        let mut newp = parts.clone();
        newp.drain(i..end);
        *field = newp.concat();
        self.field_cursor = i;
        self.errors.clear();
    }

    pub fn kill_to_start(&mut self) {
        let cursor = self.field_cursor;
        if cursor == 0 {
            return;
        }
        let Some(field) = self.active_field_mut() else {
            return;
        };
        let mut parts: Vec<&str> = field.graphemes(true).collect();
        let end = cursor.min(parts.len());
        parts.drain(..end);
        *field = parts.concat();
        self.field_cursor = 0;
        self.errors.clear();
    }

    pub fn kill_to_end(&mut self) {
        let cursor = self.field_cursor;
        let Some(field) = self.active_field_mut() else {
            return;
        };
        let mut parts: Vec<&str> = field.graphemes(true).collect();
        let start = cursor.min(parts.len());
        if start == parts.len() {
            return;
        }
        parts.drain(start..);
        *field = parts.concat();
        self.errors.clear();
    }

    pub fn cursor_left(&mut self) {
        if self.field_cursor > 0 {
            self.field_cursor -= 1;
        }
    }

    pub fn cursor_right(&mut self) {
        let len = self.active_len();
        if self.field_cursor < len {
            self.field_cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.field_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.field_cursor = self.active_len();
    }

    // Record a submitted URL for Up/Down recall, skipping exact repeats.
    pub fn record_url_history(&mut self, text: &str) {
        if let Some(last) = self.url_history.last() {
            if last == text {
                self.url_history_index = None;
                return;
            }
        }
        self.url_history.push(text.to_string());
        self.url_history_index = None;
    }

    pub fn url_history_prev(&mut self) {
        if self.url_history.is_empty() {
            return;
        }
        let idx = match self.url_history_index {
            None => self.url_history.len().saturating_sub(1),
            Some(0) => 0,
            Some(i) => i.saturating_sub(1),
        };
        self.url_history_index = Some(idx);
        self.form.url = self.url_history[idx].clone();
        self.field_cursor = self.form.url.graphemes(true).count();
        self.errors.clear();
    }

    pub fn url_history_next(&mut self) {
        let Some(i) = self.url_history_index else {
            return;
        };
        if i + 1 < self.url_history.len() {
            self.url_history_index = Some(i + 1);
            self.form.url = self.url_history[i + 1].clone();
        } else {
            self.url_history_index = None;
            self.form.url.clear();
        }
        self.field_cursor = self.form.url.graphemes(true).count();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{App, Focus};
    use crate::persist::HistoryStore;
    use tempfile::TempDir;

    fn app() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let app = App::with_store(HistoryStore::at(dir.path().join("history.json")));
        (app, dir)
    }

    #[test]
    fn insert_and_delete_track_the_cursor() {
        let (mut a, _dir) = app();
        a.insert_text("https://e.co");
        assert_eq!(a.form.url, "https://e.co");
        a.cursor_home();
        a.delete_right_grapheme();
        assert_eq!(a.form.url, "ttps://e.co");
        a.cursor_end();
        a.delete_left_grapheme();
        assert_eq!(a.form.url, "ttps://e.c");
    }

    #[test]
    fn edits_land_in_the_focused_field() {
        let (mut a, _dir) = app();
        a.set_focus(Focus::Alias);
        a.insert_text("abcde");
        assert_eq!(a.form.alias, "abcde");
        assert!(a.form.url.is_empty());
    }

    #[test]
    fn kill_to_start_drops_the_prefix() {
        let (mut a, _dir) = app();
        a.insert_text("https://example.com");
        a.kill_to_start();
        assert_eq!(a.form.url, "");
        assert_eq!(a.field_cursor, 0);
    }

    #[test]
    fn delete_prev_word_stops_at_whitespace() {
        let (mut a, _dir) = app();
        a.set_focus(Focus::Description);
        a.insert_text("landing page");
        a.delete_prev_word();
        assert_eq!(a.form.description, "landing ");
    }

    #[test]
    fn url_recall_walks_backwards_and_forwards() {
        let (mut a, _dir) = app();
        a.record_url_history("https://one.example");
        a.record_url_history("https://two.example");
        a.url_history_prev();
        assert_eq!(a.form.url, "https://two.example");
        a.url_history_prev();
        assert_eq!(a.form.url, "https://one.example");
        a.url_history_next();
        assert_eq!(a.form.url, "https://two.example");
        a.url_history_next();
        assert_eq!(a.form.url, "");
    }

    #[test]
    fn grapheme_editing_handles_multibyte_input() {
        let (mut a, _dir) = app();
        a.set_focus(Focus::Description);
        a.insert_text("café");
        a.delete_left_grapheme();
        assert_eq!(a.form.description, "caf");
    }
}
