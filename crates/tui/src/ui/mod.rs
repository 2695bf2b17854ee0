use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::strings::{
    build_status_line, history_created, history_original, truncate_to_width, HINT_HISTORY,
    HINT_RESULT, HISTORY_EMPTY, LABEL_ALIAS, LABEL_DESCRIPTION, LABEL_EXPIRES, LABEL_TAGS,
    LABEL_URL, SUBMIT_LOADING, SUBMIT_READY, TITLE_FORM, TITLE_HISTORY, TITLE_RESULT,
};
use crate::theme::THEME;

// Lines per history entry: tiny url, original, created, separator.
pub const HISTORY_ENTRY_LINES: u16 = 4;

pub fn draw(f: &mut Frame, app: &mut App) {
    let mut constraints: Vec<Constraint> = vec![Constraint::Min(40)];
    if app.show_history {
        constraints.push(Constraint::Length(44));
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(f.area());

    draw_main(f, chunks[0], app);
    if app.show_history {
        app.history_area = Some(chunks[1]);
        draw_history(f, chunks[1], app);
    } else {
        app.history_area = None;
    }
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0]);
    if app.result.is_some() {
        draw_result(f, chunks[1], app);
    } else {
        draw_form(f, chunks[1], app);
    }
    draw_status(f, chunks[2], app);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let accent = Style::default()
        .fg(THEME.accent)
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::raw("Effortlessly "),
        Span::styled("shorten", accent),
        Span::raw(" those long, pesky URLs with a "),
        Span::styled("single keystroke", accent),
    ]);
    let para = Paragraph::new(line).wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn draw_form(f: &mut Frame, area: Rect, app: &App) {
    let focused_form = app.editing_field();
    let border_style = if focused_form {
        Style::default().fg(THEME.border_focus)
    } else {
        Style::default().fg(THEME.border_inactive)
    };
    let title = Span::styled(
        TITLE_FORM,
        Style::default()
            .fg(THEME.accent)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let value_width = inner.width.saturating_sub(2);
    let rows: [(Focus, &str, &String, Option<&str>); 5] = [
        (Focus::Url, LABEL_URL, &app.form.url, app.errors.url.as_deref()),
        (
            Focus::Alias,
            LABEL_ALIAS,
            &app.form.alias,
            app.errors.alias.as_deref(),
        ),
        (Focus::Tags, LABEL_TAGS, &app.form.tags, None),
        (Focus::ExpiresAt, LABEL_EXPIRES, &app.form.expires_at, None),
        (
            Focus::Description,
            LABEL_DESCRIPTION,
            &app.form.description,
            None,
        ),
    ];

    let mut lines: Vec<Line> = Vec::new();
    let mut caret: Option<Position> = None;
    for (focus, label, value, error) in rows {
        let focused = focused_form && app.focus == focus;
        let label_style = if focused {
            Style::default()
                .fg(THEME.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(THEME.label)
        };
        lines.push(Line::from(Span::styled(label, label_style)));

        let prefix_style = if focused {
            Style::default().fg(THEME.accent)
        } else {
            Style::default().fg(THEME.border_inactive)
        };
        let cursor = if focused { app.field_cursor } else { 0 };
        let (visible, caret_x) = visible_slice(value, cursor, value_width);
        if focused {
            let y = inner.y + lines.len() as u16;
            if y < inner.y + inner.height {
                caret = Some(Position {
                    x: inner.x + 2 + caret_x,
                    y,
                });
            }
        }
        lines.push(Line::from(vec![
            Span::styled("> ", prefix_style),
            Span::raw(visible),
        ]));

        if let Some(msg) = error {
            lines.push(Line::from(Span::styled(
                msg.to_string(),
                Style::default().fg(THEME.error),
            )));
        }
    }

    lines.push(Line::default());
    let submit_style = if app.loading {
        Style::default()
            .fg(THEME.border_inactive)
            .add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
            .fg(THEME.accent)
            .add_modifier(Modifier::BOLD)
    };
    let submit = if app.loading {
        SUBMIT_LOADING
    } else {
        SUBMIT_READY
    };
    lines.push(Line::from(Span::styled(submit, submit_style)));
    if let Some(api) = &app.errors.api {
        lines.push(Line::from(Span::styled(
            api.clone(),
            Style::default().fg(THEME.error),
        )));
    }

    let para = Paragraph::new(lines);
    f.render_widget(para, inner);
    if let Some(pos) = caret {
        f.set_cursor_position(pos);
    }
}

fn draw_result(f: &mut Frame, area: Rect, app: &App) {
    let Some(created) = &app.result else {
        return;
    };
    let title = Span::styled(
        TITLE_RESULT,
        Style::default()
            .fg(THEME.accent)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border_focus));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let label = Style::default().fg(THEME.label);
    let lines = vec![
        Line::from(Span::styled("Long URL", label)),
        Line::from(Span::raw(created.url.clone())),
        Line::default(),
        Line::from(Span::styled("Mini URL", label)),
        Line::from(Span::styled(
            created.tiny_url.clone(),
            Style::default()
                .fg(THEME.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            history_created(&created.created_at),
            Style::default().fg(THEME.border_inactive),
        )),
        Line::default(),
        Line::from(Span::styled(
            HINT_RESULT,
            Style::default().fg(THEME.border_inactive),
        )),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(para, inner);
}

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let focused = matches!(app.focus, Focus::History);
    let title = Span::styled(
        TITLE_HISTORY,
        Style::default()
            .fg(THEME.accent)
            .add_modifier(Modifier::BOLD),
    );
    let border_style = if focused {
        Style::default().fg(THEME.border_focus)
    } else {
        Style::default().fg(THEME.border_inactive)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width.saturating_sub(3) as usize;
    let per_view = (inner.height / HISTORY_ENTRY_LINES).max(1) as usize;
    let start = app.history_scroll as usize;

    let mut lines: Vec<Line> = Vec::new();
    if app.history.is_empty() {
        lines.push(Line::from(Span::styled(
            HISTORY_EMPTY,
            Style::default().fg(THEME.border_inactive),
        )));
    }
    for (i, entry) in app.history.iter().enumerate().skip(start).take(per_view) {
        let selected = i == app.history_selected;
        let marker = if selected { "> " } else { "  " };
        let tiny_style = if selected && focused {
            Style::default()
                .fg(THEME.selected_fg)
                .bg(THEME.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default()
                .fg(THEME.border_focus)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(THEME.accent)
                .add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, truncate_to_width(&entry.tiny_url, width)),
            tiny_style,
        )));
        lines.push(Line::from(Span::raw(format!(
            "  {}",
            truncate_to_width(&history_original(&entry.url), width)
        ))));
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_to_width(&history_created(&entry.created_at), width)),
            Style::default().fg(THEME.border_inactive),
        )));
        lines.push(Line::default());
    }
    let para = Paragraph::new(lines);
    f.render_widget(para, inner);

    if focused && inner.height > 1 {
        let hint_area = Rect {
            x: inner.x,
            y: inner.y + inner.height - 1,
            width: inner.width,
            height: 1,
        };
        let hint = Paragraph::new(Line::from(Span::styled(
            HINT_HISTORY,
            Style::default().fg(THEME.border_inactive),
        )));
        f.render_widget(hint, hint_area);
    }

    if app.history.len() > per_view {
        let mut sb_state = ScrollbarState::new(app.history.len()).position(start);
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(sb, inner, &mut sb_state);
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let notice = app.notice.as_ref().map(|n| n.text.as_str());
    let text = build_status_line(app.loading, app.history.len(), notice, area.width);
    let style = if notice.is_some() {
        Style::default()
            .fg(THEME.border_focus)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(THEME.border_inactive)
    };
    let para = Paragraph::new(Line::from(Span::styled(text, style)));
    f.render_widget(para, area);
}

// Window a single-line value so the caret stays visible, returning the slice
// and the caret's column offset within it.
fn visible_slice(value: &str, cursor: usize, width: u16) -> (String, u16) {
    let width = width.max(1) as usize;
    let parts: Vec<&str> = value.graphemes(true).collect();
    let cursor = cursor.min(parts.len());

    // Walk back from the caret until the window is full, keeping one column
    // free for the caret itself.
    let mut start = cursor;
    let mut used = 0usize;
    while start > 0 {
        let w = UnicodeWidthStr::width(parts[start - 1]);
        if used + w >= width {
            break;
        }
        used += w;
        start -= 1;
    }

    let mut out = String::new();
    let mut shown = 0usize;
    for g in &parts[start..] {
        let w = UnicodeWidthStr::width(*g);
        if shown + w > width {
            break;
        }
        out.push_str(g);
        shown += w;
    }
    let caret_x = parts[start..cursor]
        .iter()
        .map(|g| UnicodeWidthStr::width(*g))
        .sum::<usize>() as u16;
    (out, caret_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_are_shown_whole() {
        let (s, x) = visible_slice("abc", 3, 10);
        assert_eq!(s, "abc");
        assert_eq!(x, 3);
    }

    #[test]
    fn long_values_scroll_to_keep_the_caret_visible() {
        let value = "https://example.com/a/very/long/path";
        let (s, x) = visible_slice(value, value.len(), 10);
        assert!(UnicodeWidthStr::width(s.as_str()) <= 10);
        assert!(s.ends_with("path"));
        assert!(x <= 10);
    }

    #[test]
    fn caret_in_the_middle_keeps_its_offset() {
        let (s, x) = visible_slice("abcdef", 2, 10);
        assert_eq!(s, "abcdef");
        assert_eq!(x, 2);
    }

    #[test]
    fn fullwidth_graphemes_count_double() {
        let (s, _) = visible_slice("ＡＢＣ", 3, 4);
        assert!(UnicodeWidthStr::width(s.as_str()) <= 4);
    }
}
