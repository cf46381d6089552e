//! Application state for the TUI.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use loglens_core::{Notice, Session};

/// How long a notice stays on screen
const NOTICE_TTL_SECS: i64 = 6;

/// Which input field receives typed characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// Log file path field (left panel)
    #[default]
    File,
    /// Question field (right panel)
    Question,
}

/// Main application state.
pub struct App {
    /// Client session (insights, conversation, workflows)
    pub session: Session,
    /// Focused input field
    pub focus: Focus,
    /// Text of the file path field
    pub file_input: String,
    /// Notice currently on screen
    pub notice: Option<Notice>,
    /// Lines scrolled up from the bottom of the chat
    pub chat_scroll: u16,
    /// Set when the user asks to quit
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, initial_file: Option<PathBuf>) -> Self {
        let mut app = Self {
            session,
            focus: Focus::default(),
            file_input: String::new(),
            notice: None,
            chat_scroll: 0,
            should_quit: false,
        };

        if let Some(path) = initial_file {
            app.file_input = path.display().to_string();
            app.session.select_file(path);
            app.focus = Focus::Question;
        }

        app
    }

    /// Apply workflow completions and expire the current notice.
    pub fn tick(&mut self) {
        for notice in self.session.poll() {
            self.show(notice);
        }

        let expired = self
            .notice
            .as_ref()
            .is_some_and(|n| n.is_expired(Utc::now(), Duration::seconds(NOTICE_TTL_SECS)));
        if expired {
            self.notice = None;
        }
    }

    /// Whether the send affordance is disabled
    pub fn send_disabled(&self) -> bool {
        self.session.state().is_awaiting_answer()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('e') => self.export(),
                KeyCode::Char('u') => self.upload(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
            KeyCode::Enter => match self.focus {
                Focus::File => self.upload(),
                Focus::Question => self.send_question(),
            },
            KeyCode::Backspace => self.edit_focused(|text| {
                text.pop();
            }),
            KeyCode::Char(c) => self.edit_focused(|text| text.push(c)),
            KeyCode::PageUp => self.chat_scroll = self.chat_scroll.saturating_add(5),
            KeyCode::PageDown => self.chat_scroll = self.chat_scroll.saturating_sub(5),
            KeyCode::End => self.chat_scroll = 0,
            _ => {}
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::File => Focus::Question,
            Focus::Question => Focus::File,
        };
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        match self.focus {
            Focus::File => edit(&mut self.file_input),
            Focus::Question => {
                let mut text = self.session.state().pending_question().to_string();
                edit(&mut text);
                self.session.set_pending_question(text);
            }
        }
    }

    /// Select the typed path (if any) and upload the selected file.
    fn upload(&mut self) {
        let path = self.file_input.trim();
        if !path.is_empty() {
            self.session.select_file(PathBuf::from(path));
        }
        if let Some(notice) = self.session.upload() {
            self.show(notice);
        }
    }

    fn send_question(&mut self) {
        if self.send_disabled() {
            return;
        }
        if self.session.submit_question() {
            self.chat_scroll = 0;
        }
    }

    fn export(&mut self) {
        self.session.export();
    }

    fn show(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}
