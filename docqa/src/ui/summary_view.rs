//! Summary panel: rendered summary, inline load errors, and document metadata.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use docqa_core::types::{format_count, Metadata, SummaryStatistics};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, spinner_glyph, wrapped_height};
use crate::ui::markdown::{render_markdown, render_plain};

const WELCOME: &str = "Press `o` to open a PDF path or web URL, or paste/drop a file onto the terminal.";

pub fn render_summary(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Summary;
    let wf = &state.workflow;

    let title = if wf.summary_loading() {
        format!("Summary {}", spinner_glyph(wf.spinner_frame()))
    } else {
        "Summary".to_owned()
    };
    let block = panel_block(title, is_focused, theme);
    let inner = inner_rect(area);

    let mut lines: Vec<Line<'static>> = Vec::new();
    if let Some(err) = &wf.summary_error {
        lines.push(Line::styled(err.clone(), Style::default().fg(theme.chat_error)));
        lines.push(Line::default());
    }

    match &wf.session().summary {
        Some(summary) => {
            let (body, is_markdown) = summary.body();
            if is_markdown {
                lines.extend(render_markdown(body, theme));
            } else {
                lines.extend(render_plain(body));
            }
            lines.push(Line::default());
            lines.extend(metadata_lines(&summary.metadata, theme));
            if let Some(stats) = &summary.statistics {
                lines.extend(statistics_lines(stats, theme));
            }
        }
        None if wf.analyzing() => {
            lines.push(Line::styled(
                format!("{} Analyzing document...", spinner_glyph(wf.spinner_frame())),
                Style::default().fg(theme.spinner),
            ));
        }
        None => lines.push(Line::styled(WELCOME, Style::default().fg(theme.chat_placeholder))),
    }

    let max_scroll = wrapped_height(&lines, inner.width).saturating_sub(inner.height);
    state.summary_scroll = state.summary_scroll.min(max_scroll);

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.summary_scroll, 0)),
        area,
    );
}

/// `Label: value` rows under the summary.
pub fn metadata_lines(metadata: &Metadata, theme: &Theme) -> Vec<Line<'static>> {
    let label_style = Style::default().fg(theme.metadata_label).add_modifier(Modifier::BOLD);
    metadata
        .display_rows()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![Span::styled(format!("{label}: "), label_style), Span::raw(value)])
        })
        .collect()
}

fn statistics_lines(stats: &SummaryStatistics, theme: &Theme) -> Vec<Line<'static>> {
    let label_style = Style::default().fg(theme.metadata_label).add_modifier(Modifier::BOLD);
    if stats.summary_length == 0 {
        return Vec::new();
    }
    vec![Line::from(vec![
        Span::styled("Summary length: ", label_style),
        Span::raw(format!("{} characters", format_count(stats.summary_length))),
    ])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::types::SourceType;

    #[test]
    fn metadata_rows_render_as_label_value_lines() {
        let metadata = Metadata {
            source_type: SourceType::Pdf,
            word_count: 1200,
            filename: Some("report.pdf".into()),
            ..Default::default()
        };
        let lines = metadata_lines(&metadata, &Theme::dark());
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["Source: PDF", "File: report.pdf", "Words: 1,200"]);
    }
}
