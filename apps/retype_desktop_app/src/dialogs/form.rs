use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{EXIT_STATUS, NO_VALUE_STATUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field,
    Submit,
    Cancel,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Field => Focus::Submit,
            Focus::Submit => Focus::Cancel,
            Focus::Cancel => Focus::Field,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Field => Focus::Cancel,
            Focus::Submit => Focus::Field,
            Focus::Cancel => Focus::Submit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Continue,
    Submit(String),
    Cancel,
}

/// What the dialog shows before it closes, and what it hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closing {
    pub statuses: Vec<String>,
    pub value: Option<String>,
}

impl FormEvent {
    /// Empty submissions behave like cancel after a "no value" notice.
    pub fn closing(self) -> Option<Closing> {
        match self {
            FormEvent::Continue => None,
            FormEvent::Submit(text) if text.is_empty() => Some(Closing {
                statuses: vec![NO_VALUE_STATUS.to_string(), EXIT_STATUS.to_string()],
                value: None,
            }),
            FormEvent::Submit(text) => Some(Closing {
                statuses: vec![format!("Submitted value: {}", text)],
                value: Some(text),
            }),
            FormEvent::Cancel => Some(Closing {
                statuses: vec![EXIT_STATUS.to_string()],
                value: None,
            }),
        }
    }
}

/// Single-line text field with Submit / Cancel buttons.
#[derive(Debug, Clone)]
pub struct PromptForm {
    chars: Vec<char>,
    cursor: usize,
    focus: Focus,
}

impl Default for PromptForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptForm {
    pub fn new() -> Self {
        Self {
            chars: Vec::new(),
            cursor: 0,
            focus: Focus::Field,
        }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => FormEvent::Cancel,
                _ => FormEvent::Continue,
            };
        }

        match key.code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Enter => {
                return match self.focus {
                    Focus::Field | Focus::Submit => FormEvent::Submit(self.text()),
                    Focus::Cancel => FormEvent::Cancel,
                }
            }
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            _ if self.focus != Focus::Field => {
                if key.code == KeyCode::Char(' ') {
                    return match self.focus {
                        Focus::Submit => FormEvent::Submit(self.text()),
                        _ => FormEvent::Cancel,
                    };
                }
            }
            KeyCode::Char(c) => {
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.chars.len(),
            _ => {}
        }

        FormEvent::Continue
    }
}
