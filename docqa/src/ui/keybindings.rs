//! Keybinding dispatcher for docqa.
//!
//! Translates crossterm key, mouse and paste events into `AppState` mutations
//! and returns a `KeyAction` telling the event loop what to do next. An open
//! error modal or context preview swallows keys first; otherwise the
//! dispatcher branches on `state.mode`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use docqa_core::workflow::{Notice, NoticeLevel, DEFAULT_MAX_CONTEXTS};
use docqa_core::Command;
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// What the event loop should do after a key.
#[derive(Debug, PartialEq)]
pub enum KeyAction {
    Continue,
    /// Hand these requests to the API worker.
    Dispatch(Vec<Command>),
    Quit,
}

impl From<Vec<Command>> for KeyAction {
    fn from(commands: Vec<Command>) -> Self {
        if commands.is_empty() {
            KeyAction::Continue
        } else {
            KeyAction::Dispatch(commands)
        }
    }
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    if state.workflow.modal.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.workflow.dismiss_modal();
        }
        return KeyAction::Continue;
    }
    if state.workflow.context_preview.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('c')) {
            state.workflow.dismiss_context();
        }
        return KeyAction::Continue;
    }
    match state.mode {
        Mode::Help => handle_help(key, state),
        Mode::EditSource => handle_edit_source(key, state),
        Mode::EditQuestion => handle_edit_question(key, state),
        Mode::Suggestions => handle_suggestions(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char('o') => {
            state.source_input.clear();
            state.mode = Mode::EditSource;
            KeyAction::Continue
        }
        KeyCode::Char('i') | KeyCode::Enter => {
            if state.workflow.chat_visible() {
                state.mode = Mode::EditQuestion;
                state.focus = PanelFocus::Chat;
            } else {
                state.workflow.notice = Some(Notice {
                    level: NoticeLevel::Error,
                    text: "Analyze a document first.".to_owned(),
                });
            }
            KeyAction::Continue
        }
        KeyCode::Char('r') => state.workflow.refresh_summary().into(),
        KeyCode::Char('s') => {
            // An already visible list just takes focus; hiding is `s` inside it.
            let commands = if state.workflow.suggestions_visible() {
                Vec::new()
            } else {
                state.workflow.toggle_suggestions()
            };
            if state.workflow.suggestions_visible() {
                state.suggestion_cursor = 0;
                state.mode = Mode::Suggestions;
            }
            commands.into()
        }
        KeyCode::Char('c') => {
            let question = state.workflow.question_input.clone();
            state
                .workflow
                .preview_context(&question, DEFAULT_MAX_CONTEXTS)
                .unwrap_or_default()
                .into()
        }
        KeyCode::Char('n') => {
            state.workflow.new_chat();
            state.reset_view();
            KeyAction::Continue
        }
        KeyCode::Char('x') => {
            state.workflow.clear_chat();
            state.chat_follow = true;
            KeyAction::Continue
        }
        KeyCode::Char('H') | KeyCode::Char('L') | KeyCode::Tab => {
            state.toggle_focus();
            KeyAction::Continue
        }
        KeyCode::Char('<') => {
            state.shrink_summary_panel();
            KeyAction::Continue
        }
        KeyCode::Char('>') => {
            state.grow_summary_panel();
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::Help;
            KeyAction::Continue
        }
        KeyCode::Char('q') => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

/// j / k / g / G and the Ctrl page keys. `None` when the key is not a scroll key.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::PageDown => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        KeyCode::PageUp => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Text entry
// ---------------------------------------------------------------------------

/// Applies a line-editing key to `buf`. Returns `false` for keys it ignores.
fn edit_line(key: KeyEvent, buf: &mut String) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => buf.clear(),
        KeyCode::Char('w') if ctrl => {
            let trimmed = buf.trim_end().len();
            buf.truncate(trimmed);
            let cut = buf.rfind(char::is_whitespace).map_or(0, |i| i + 1);
            buf.truncate(cut);
        }
        KeyCode::Char(c) if !ctrl => buf.push(c),
        KeyCode::Backspace => {
            buf.pop();
        }
        _ => return false,
    }
    true
}

fn handle_edit_source(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        KeyCode::Enter => {
            state.mode = Mode::Normal;
            let raw = state.source_input.clone();
            if raw.trim().is_empty() {
                return KeyAction::Continue;
            }
            submit_source(&raw, state)
        }
        _ => {
            edit_line(key, &mut state.source_input);
            KeyAction::Continue
        }
    }
}

fn handle_edit_question(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        KeyCode::Enter => match state.workflow.submit_question() {
            Ok(commands) => {
                if !commands.is_empty() {
                    state.chat_follow = true;
                }
                commands.into()
            }
            Err(_) => KeyAction::Continue,
        },
        _ => {
            edit_line(key, &mut state.workflow.question_input);
            KeyAction::Continue
        }
    }
}

fn submit_source(raw: &str, state: &mut AppState) -> KeyAction {
    match state.workflow.submit_source(raw) {
        Ok(commands) => {
            state.source_input.clear();
            state.reset_view();
            commands.into()
        }
        // The workflow has already put the reason in the modal.
        Err(_) => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

fn handle_suggestions(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.suggestion_next(),
        KeyCode::Char('k') | KeyCode::Up => state.suggestion_prev(),
        KeyCode::Enter => state.choose_highlighted_suggestion(),
        KeyCode::Char('s') => {
            state.mode = Mode::Normal;
            return state.workflow.toggle_suggestions().into();
        }
        KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    if !state.workflow.suggestions_visible() && state.mode == Mode::Suggestions {
        state.mode = Mode::Normal;
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Help
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Paste and mouse
// ---------------------------------------------------------------------------

/// Bracketed paste. While editing, the text is inserted on one line; in
/// Normal mode it is treated as a dropped file or URL and submitted.
pub fn handle_paste(text: &str, state: &mut AppState) -> KeyAction {
    let flat = text.replace(['\r', '\n'], " ");
    match state.mode {
        Mode::EditSource => {
            state.source_input.push_str(flat.trim());
            KeyAction::Continue
        }
        Mode::EditQuestion => {
            state.workflow.question_input.push_str(&flat);
            KeyAction::Continue
        }
        Mode::Normal
            if state.workflow.modal.is_none() && state.workflow.context_preview.is_none() =>
        {
            let trimmed = flat.trim();
            if trimmed.is_empty() {
                KeyAction::Continue
            } else {
                submit_source(trimmed, state)
            }
        }
        _ => KeyAction::Continue,
    }
}

/// Click to focus a panel; the wheel scrolls the focused panel or the help.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let [summary, chat] = state.panel_rects;
            if summary.contains(pos) {
                state.focus = PanelFocus::Summary;
            } else if chat.width > 0 && chat.contains(pos) {
                state.focus = PanelFocus::Chat;
            }
        }
        MouseEventKind::ScrollUp if state.mode == Mode::Help => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown if state.mode == Mode::Help => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}
