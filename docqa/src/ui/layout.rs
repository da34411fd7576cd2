//! Screen layout for docqa.
//!
//! Pure layout arithmetic, recomputed inside every `terminal.draw()` so the
//! frame always matches the current terminal size.
//!
//! ```text
//! ┌ banner (only while the backend is unreachable) ───────────┐
//! ┌ Document ────────────────────────────────────────────────┐
//! ┌ Summary ───────────────┐┌ Suggestions (when shown) ───────┐
//! │                        │├ Chat ───────────────────────────┤
//! │                        │├ Question ───────────────────────┤
//! └────────────────────────┘└────────────────────────────────┘
//!  status bar
//! ```
//!
//! Below 90 columns the summary and chat columns stack vertically. Without a
//! ready document the chat column is collapsed to zero width.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Every rect one frame draws into. Zero-sized rects are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Areas {
    pub banner: Rect,
    pub source: Rect,
    pub summary: Rect,
    pub suggestions: Rect,
    pub chat: Rect,
    pub question: Rect,
    pub status_bar: Rect,
}

const STACK_BELOW_COLS: u16 = 90;

pub fn compute_layout(frame: &Frame, state: &AppState) -> Areas {
    let area = frame.area();
    let banner_height = u16::from(state.workflow.banner.is_some());

    let [banner, source, main_area, status_bar] = area.layout(&Layout::vertical([
        Constraint::Length(banner_height),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    if !state.workflow.chat_visible() {
        return Areas { banner, source, summary: main_area, status_bar, ..Areas::default() };
    }

    let split = if area.width >= STACK_BELOW_COLS {
        Layout::horizontal([
            Constraint::Percentage(state.summary_pct),
            Constraint::Fill(1),
        ])
    } else {
        Layout::vertical([
            Constraint::Percentage(state.summary_pct),
            Constraint::Fill(1),
        ])
    };
    let [summary, chat_column] = main_area.layout(&split.spacing(Spacing::Overlap(1)));

    let suggestions_height = if state.workflow.suggestions_visible() {
        let rows = state.workflow.session().suggestions.items().len().max(1) as u16;
        (rows + 2).min(chat_column.height / 3)
    } else {
        0
    };
    let [suggestions, chat, question] = chat_column.layout(
        &Layout::vertical([
            Constraint::Length(suggestions_height),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .spacing(Spacing::Overlap(1)),
    );

    Areas { banner, source, summary, suggestions, chat, question, status_bar }
}

/// Inner rect of a bordered panel.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered panel block: thick border when focused.
///
/// `MergeStrategy::Fuzzy` because `Exact` draws wrong junctions when Thick
/// and Plain borders meet.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Rows `lines` occupy when wrapped to `width` columns. Approximates word
/// wrapping by character width; good enough for scroll clamping.
pub fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let width = usize::from(width);
    let rows: usize = lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_glyph(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

/// Mode indicator, progress spinner, the latest notice, and the backend URL.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::EditSource => (" OPEN ", theme.status_mode_insert),
        Mode::EditQuestion => (" ASK ", theme.status_mode_insert),
        Mode::Suggestions => (" PICK ", theme.status_mode_normal),
        Mode::Normal | Mode::Help => (" NORMAL ", theme.status_mode_normal),
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];

    let wf = &state.workflow;
    if wf.busy() {
        spans.push(Span::styled(
            format!(" {} ", spinner_glyph(wf.spinner_frame())),
            Style::default().fg(theme.spinner),
        ));
    } else {
        spans.push(Span::raw(" "));
    }

    if let Some(notice) = &wf.notice {
        let style = match notice.level {
            docqa_core::workflow::NoticeLevel::Error => Style::default().fg(theme.notice_error),
            docqa_core::workflow::NoticeLevel::Info => Style::default(),
        };
        spans.push(Span::styled(notice.text.clone(), style));
    }

    let backend = backend_label(state);
    let [left, right] = area.layout(&Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(backend.chars().count() as u16 + 2),
    ]));

    let bar = Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), left);
    frame.render_widget(Paragraph::new(format!("{backend} ")).style(bar).right_aligned(), right);
}

/// `service version @ url` once a health check has answered, else just the URL.
fn backend_label(state: &AppState) -> String {
    let url = &state.backend_url;
    let Some(health) = &state.workflow.health else {
        return url.clone();
    };
    let parts: Vec<&str> = [health.service.as_deref(), health.version.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        url.clone()
    } else {
        format!("{} @ {url}", parts.join(" "))
    }
}
