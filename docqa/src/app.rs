//! Central application state for docqa.
//!
//! Wraps the core [`Workflow`] with everything that only matters to the
//! terminal: input mode, panel focus, scroll offsets, cached viewport
//! heights, and the text being edited. No rendering lives here.

use docqa_core::Workflow;
use ratatui::layout::Rect;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a PDF path or URL into the source line.
    EditSource,
    /// Typing into the question box.
    EditQuestion,
    Help,
    /// Suggestion list has keyboard focus.
    Suggestions,
}

/// Which panel receives scroll keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Summary,
    Chat,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Summary => PanelFocus::Chat,
            PanelFocus::Chat => PanelFocus::Summary,
        }
    }
}

pub struct AppState {
    pub workflow: Workflow,
    pub mode: Mode,
    pub focus: PanelFocus,

    /// Text in the source line while in [`Mode::EditSource`].
    pub source_input: String,
    /// Highlighted row in the suggestion list.
    pub suggestion_cursor: usize,

    pub summary_scroll: u16,
    /// Offset from the top of the chat transcript; ignored while `chat_follow`.
    pub chat_scroll: u16,
    /// Keep the newest message in view.
    pub chat_follow: bool,
    pub help_scroll: u16,

    /// Inner heights cached after each render for page-wise scrolling.
    pub summary_viewport_height: u16,
    pub chat_viewport_height: u16,
    /// Transcript height from the last render, for clamping `chat_scroll`.
    pub chat_content_height: u16,

    /// Width percentage of the summary panel when chat is shown. Default: 50.
    pub summary_pct: u16,
    /// `[summary, chat]` outer rects from the last render, for mouse focus.
    pub panel_rects: [Rect; 2],

    /// Backend URL, shown in the status bar.
    pub backend_url: String,
}

impl AppState {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            workflow: Workflow::new(),
            mode: Mode::default(),
            focus: PanelFocus::default(),
            source_input: String::new(),
            suggestion_cursor: 0,
            summary_scroll: 0,
            chat_scroll: 0,
            chat_follow: true,
            help_scroll: 0,
            summary_viewport_height: 0,
            chat_viewport_height: 0,
            chat_content_height: 0,
            summary_pct: 50,
            panel_rects: [Rect::default(); 2],
            backend_url: backend_url.into(),
        }
    }

    /// Resets per-document view state after a new document or a new chat.
    pub fn reset_view(&mut self) {
        self.summary_scroll = 0;
        self.chat_scroll = 0;
        self.chat_follow = true;
        self.suggestion_cursor = 0;
        if !self.workflow.chat_visible() {
            self.focus = PanelFocus::Summary;
        }
    }

    fn chat_max_scroll(&self) -> u16 {
        self.chat_content_height.saturating_sub(self.chat_viewport_height)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Summary => {
                self.summary_scroll = self.summary_scroll.saturating_add(lines);
            }
            PanelFocus::Chat => {
                let max = self.chat_max_scroll();
                let from = if self.chat_follow { max } else { self.chat_scroll };
                self.chat_scroll = from.saturating_add(lines).min(max);
                self.chat_follow = self.chat_scroll >= max;
            }
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Summary => {
                self.summary_scroll = self.summary_scroll.saturating_sub(lines);
            }
            PanelFocus::Chat => {
                let from = if self.chat_follow { self.chat_max_scroll() } else { self.chat_scroll };
                self.chat_scroll = from.saturating_sub(lines);
                self.chat_follow = false;
            }
        }
    }

    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Summary => self.summary_scroll = 0,
            PanelFocus::Chat => {
                self.chat_scroll = 0;
                self.chat_follow = false;
            }
        }
    }

    /// Summary: offset is clamped by the renderer. Chat: resume following.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Summary => self.summary_scroll = u16::MAX,
            PanelFocus::Chat => self.chat_follow = true,
        }
    }

    fn viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Summary => self.summary_viewport_height,
            PanelFocus::Chat => self.chat_viewport_height,
        }
    }

    /// Half the cached viewport height, at least one row.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.viewport_height() / 2).max(1));
    }

    pub fn full_page_down(&mut self) {
        self.scroll_down(self.viewport_height().max(1));
    }

    pub fn full_page_up(&mut self) {
        self.scroll_up(self.viewport_height().max(1));
    }

    /// Moves focus, but never onto a hidden chat panel.
    pub fn toggle_focus(&mut self) {
        let next = self.focus.toggle();
        if next == PanelFocus::Chat && !self.workflow.chat_visible() {
            return;
        }
        self.focus = next;
    }

    /// Shrinks the summary panel by 5%, not below 20%.
    pub fn shrink_summary_panel(&mut self) {
        const MIN: u16 = 20;
        const STEP: u16 = 5;
        self.summary_pct = self.summary_pct.saturating_sub(STEP).max(MIN);
    }

    /// Grows the summary panel by 5%, not above 80%.
    pub fn grow_summary_panel(&mut self) {
        const MAX: u16 = 80;
        const STEP: u16 = 5;
        self.summary_pct = (self.summary_pct + STEP).min(MAX);
    }

    pub fn suggestion_next(&mut self) {
        let len = self.workflow.session().suggestions.items().len();
        if len > 0 {
            self.suggestion_cursor = (self.suggestion_cursor + 1) % len;
        }
    }

    pub fn suggestion_prev(&mut self) {
        let len = self.workflow.session().suggestions.items().len();
        if len > 0 {
            self.suggestion_cursor = (self.suggestion_cursor + len - 1) % len;
        }
    }

    /// Copies the highlighted suggestion into the question box and starts
    /// editing it. The question is not sent.
    pub fn choose_highlighted_suggestion(&mut self) {
        if self.workflow.choose_suggestion(self.suggestion_cursor) {
            self.mode = Mode::EditQuestion;
            self.focus = PanelFocus::Chat;
        } else {
            self.mode = Mode::Normal;
        }
    }
}
