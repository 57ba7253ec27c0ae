use crate::config::Theme;
use crate::model::{EnhancementReport, EnhancementResult, Presentation, Status};
use ratatui::style::Color;

pub const TAB_COMPOSE: usize = 0;
pub const TAB_RESULT: usize = 1;
pub const TAB_HELP: usize = 2;
pub const TAB_COUNT: usize = 3;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which input field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    None,
    Resume,
    Role,
    PdfPath,
}

pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub key: Color,
    pub error: Color,
    pub ok: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            muted: Color::DarkGray,
            key: Color::Magenta,
            error: Color::Red,
            ok: Color::Green,
        },
        Theme::Dark => Palette {
            fg: Color::Gray,
            bg: Color::Black,
            accent: Color::Yellow,
            muted: Color::DarkGray,
            key: Color::Magenta,
            error: Color::LightRed,
            ok: Color::LightGreen,
        },
    }
}

#[derive(Default)]
pub struct UiState {
    pub tab: usize,
    pub focus: Focus,
    pub resume_text: String,
    pub target_role: String,
    pub pdf_path: String,
    pub info: String,
    pub presentation: Presentation,
    pub theme: Theme,
    pub resume_scroll: u16,
    pub result_scroll: u16,
    pub spinner_frame: usize,
    /// Role sent with the most recent submission, used for reports.
    pub submitted_role: Option<String>,
    /// Report for the result on screen; `l`/`x` export this.
    pub report: Option<EnhancementReport>,
    pub last_exported_path: Option<String>,
}

impl UiState {
    /// Apply a new presentation snapshot. Returns the result if it was not seen before.
    pub fn apply_presentation(&mut self, next: Presentation) -> Option<EnhancementResult> {
        let fresh = if next.generation != self.presentation.generation {
            next.result.clone()
        } else {
            None
        };

        if next.status == Status::Error && next.notice != self.presentation.notice {
            if let Some(notice) = next.notice.as_ref() {
                self.info = notice.clone();
            }
        }
        if let Some(r) = fresh.as_ref() {
            self.info = format!(
                "Enhanced resume ready ({} suggestion{})",
                r.suggestions.len(),
                if r.suggestions.len() == 1 { "" } else { "s" }
            );
            self.tab = TAB_RESULT;
            self.result_scroll = 0;
        }

        self.presentation = next;
        fresh
    }

    /// Buffer for the focused field, if any.
    fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::None => None,
            Focus::Resume => Some(&mut self.resume_text),
            Focus::Role => Some(&mut self.target_role),
            Focus::PdfPath => Some(&mut self.pdf_path),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let single_line = self.focus != Focus::Resume;
        if let Some(buf) = self.focused_buffer() {
            if c == '\n' && single_line {
                return;
            }
            buf.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.focused_buffer() {
            buf.pop();
        }
    }

    /// Paste goes into the focused field, or into the resume text when nothing is focused.
    pub fn paste(&mut self, text: &str) {
        if self.focus == Focus::None {
            self.focus = Focus::Resume;
            self.tab = TAB_COMPOSE;
        }
        let single_line = self.focus != Focus::Resume;
        if let Some(buf) = self.focused_buffer() {
            if single_line {
                buf.push_str(text.replace(['\r', '\n'], " ").trim());
            } else {
                buf.push_str(&text.replace("\r\n", "\n"));
            }
        }
    }

    pub fn fill_sample(&mut self, role: &str, text: &str) {
        self.resume_text = text.to_string();
        self.target_role = role.to_string();
        self.pdf_path.clear();
        self.resume_scroll = 0;
        self.tab = TAB_COMPOSE;
        self.info = format!("Loaded sample resume: {role}");
    }

    pub fn clear_inputs(&mut self) {
        self.resume_text.clear();
        self.target_role.clear();
        self.pdf_path.clear();
        self.resume_scroll = 0;
        self.info = "Cleared".into();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }

    pub fn scroll_up(&mut self, n: u16) {
        let s = self.active_scroll();
        *s = s.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: u16) {
        let s = self.active_scroll();
        *s = s.saturating_add(n);
    }

    fn active_scroll(&mut self) -> &mut u16 {
        if self.tab == TAB_RESULT {
            &mut self.result_scroll
        } else {
            &mut self.resume_scroll
        }
    }
}
