//! Help overlay: a centered modal listing every keybinding.

use ratatui::{
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

/// Draws the help box over the panels, scrolled by `help_scroll` rows.
/// Skipped on terminals narrower than 60 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  (j/k scroll, ? or Esc to dismiss) ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Document"),
        Line::from("  o             Open a PDF path or http(s) URL"),
        Line::from("  (paste)       Pasting or dropping a path/URL opens it"),
        Line::from("  r             Refresh the summary"),
        Line::from("  n             New chat (forget the current document)"),
        Line::from(""),
        Line::from("Questions"),
        Line::from("  i / Enter     Type a question; Enter sends it"),
        Line::from("  s             Pick from suggested questions (s again hides them)"),
        Line::from("  c             Preview the passages the question would use"),
        Line::from("  x             Clear the conversation"),
        Line::from(""),
        Line::from("Suggestions"),
        Line::from("  j / k         Move the highlight"),
        Line::from("  Enter         Copy into the question box (not sent)"),
        Line::from("  Esc           Back"),
        Line::from(""),
        Line::from("Navigation"),
        Line::from("  j / k         Scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from("  Ctrl-f / b    Scroll full page down / up"),
        Line::from("  H / L / Tab   Switch between summary and chat"),
        Line::from("  < / >         Shrink / grow the summary panel"),
        Line::from(""),
        Line::from("General"),
        Line::from("  Enter / Esc   Dismiss an error"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q / Ctrl-c    Quit"),
    ])
}
