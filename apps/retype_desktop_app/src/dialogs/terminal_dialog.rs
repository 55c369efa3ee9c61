use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, QueueableCommand};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use super::{Closing, Focus, FormEvent, InputPrompt, PromptForm, PromptRequest};
use crate::core::error::PromptError;

const MAX_WIDTH: u16 = 64;
const MIN_WIDTH: u16 = 24;
const FIELD_PREFIX: &str = "> ";

/// Modal form drawn on stderr's alternate screen.
///
/// Falls back to plain line reads when stdin or stderr is not a terminal.
pub struct TerminalDialog {
    feedback_delay: Duration,
}

impl TerminalDialog {
    pub fn new(feedback_delay: Duration) -> Self {
        Self { feedback_delay }
    }

    fn is_interactive() -> bool {
        io::stdin().is_terminal() && io::stderr().is_terminal()
    }

    fn pause(&self) {
        if !self.feedback_delay.is_zero() {
            std::thread::sleep(self.feedback_delay);
        }
    }

    fn prompt_interactive(&self, request: &PromptRequest) -> io::Result<Closing> {
        let _guard = ScreenGuard::acquire()?;
        let mut stderr = io::stderr();
        let mut form = PromptForm::new();

        let closing = loop {
            render_form(&mut stderr, request, &form)?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
                continue;
            }
            if let Some(closing) = form.handle_key(key).closing() {
                break closing;
            }
        };

        for status in &closing.statuses {
            render_status(&mut stderr, &request.title, status)?;
            self.pause();
        }

        Ok(closing)
    }

    fn prompt_fallback(&self, request: &PromptRequest) -> io::Result<Closing> {
        self.prompt_lines(&mut io::stdin().lock(), &mut io::stderr().lock(), request)
    }

    /// Line-based prompt: one line is the submitted value, EOF is cancel.
    fn prompt_lines(
        &self,
        reader: &mut impl BufRead,
        writer: &mut impl Write,
        request: &PromptRequest,
    ) -> io::Result<Closing> {
        write!(writer, "{}: {} ", request.title, request.message)?;
        writer.flush()?;

        let mut line = String::new();
        let event = if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            FormEvent::Cancel
        } else {
            FormEvent::Submit(line.trim_end_matches(['\n', '\r']).to_string())
        };

        // Only Continue maps to None, and it is never produced here.
        let closing = event.closing().unwrap_or(Closing {
            statuses: Vec::new(),
            value: None,
        });
        for status in &closing.statuses {
            writeln!(writer, "{}", status)?;
            self.pause();
        }

        Ok(closing)
    }

    /// Returns `true` when confirmed, `false` when dismissed with Esc or Ctrl+C.
    fn show_message(&self, title: &str, message: &str, is_error: bool) -> io::Result<bool> {
        if !Self::is_interactive() {
            let label = if is_error { "error" } else { "info" };
            eprintln!("[{}] {}: {}", label, title, message);
            return Ok(true);
        }

        let _guard = ScreenGuard::acquire()?;
        let mut stderr = io::stderr();

        loop {
            render_message(&mut stderr, title, message, is_error)?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(confirmed) = message_choice(key) {
                return Ok(confirmed);
            }
        }
    }
}

fn message_choice(key: KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(false),
        KeyCode::Esc => Some(false),
        KeyCode::Enter | KeyCode::Char(' ') => Some(true),
        _ => None,
    }
}

impl InputPrompt for TerminalDialog {
    fn prompt(&mut self, request: &PromptRequest) -> Result<Option<String>, PromptError> {
        let closing = if Self::is_interactive() {
            self.prompt_interactive(request)?
        } else {
            self.prompt_fallback(request)?
        };
        Ok(closing.value)
    }

    fn acknowledge(&mut self, title: &str, message: &str) -> Result<bool, PromptError> {
        Ok(self.show_message(title, message, false)?)
    }

    fn notify_error(&mut self, title: &str, message: &str) -> Result<(), PromptError> {
        self.show_message(title, message, true)?;
        Ok(())
    }
}

/// Raw mode plus alternate screen, restored on drop.
struct ScreenGuard;

impl ScreenGuard {
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(io::stderr(), EnterAlternateScreen, Hide)?;
        Ok(guard)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stderr(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn dialog_width() -> u16 {
    terminal::size()
        .map(|(cols, _)| cols)
        .unwrap_or(80)
        .clamp(MIN_WIDTH, MAX_WIDTH)
}

fn inner_width(width: u16) -> usize {
    width.saturating_sub(4) as usize
}

fn draw_top(out: &mut impl Write, width: u16, title: &str) -> io::Result<()> {
    let title = clip(title, width.saturating_sub(6) as usize);
    let fill = (width as usize).saturating_sub(5 + title.chars().count());
    out.queue(Clear(ClearType::All))?
        .queue(MoveTo(0, 0))?
        .queue(Print(format!("┌─ {} {}┐", title, "─".repeat(fill))))?;
    Ok(())
}

fn draw_row<W, F>(out: &mut W, row: u16, width: u16, content: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    out.queue(MoveTo(0, row))?.queue(Print("│ "))?;
    content(out)?;
    out.queue(MoveTo(width.saturating_sub(1), row))?
        .queue(Print("│"))?;
    Ok(())
}

fn draw_bottom(out: &mut impl Write, row: u16, width: u16, hint: &str) -> io::Result<()> {
    let fill = "─".repeat((width as usize).saturating_sub(2));
    out.queue(MoveTo(0, row))?
        .queue(Print(format!("└{}┘", fill)))?
        .queue(MoveTo(0, row + 1))?
        .queue(PrintStyledContent(hint.dim()))?;
    Ok(())
}

fn render_form(
    out: &mut impl Write,
    request: &PromptRequest,
    form: &PromptForm,
) -> io::Result<()> {
    let width = dialog_width();
    let inner = inner_width(width);
    draw_top(out, width, &request.title)?;

    let mut row = 1;
    for line in wrap_words(&request.message, inner) {
        draw_row(out, row, width, |out| {
            out.queue(Print(line))?;
            Ok(())
        })?;
        row += 1;
    }

    let chars: Vec<char> = form.text().chars().collect();
    let visible = inner.saturating_sub(FIELD_PREFIX.len()).max(1);
    let (start, end) = field_window(chars.len(), form.cursor(), visible);
    let field_focused = form.focus() == Focus::Field;
    draw_row(out, row, width, |out| {
        out.queue(Print(FIELD_PREFIX))?;
        for (idx, c) in chars.iter().enumerate().take(end).skip(start) {
            if field_focused && idx == form.cursor() {
                out.queue(PrintStyledContent(c.to_string().reverse()))?;
            } else {
                out.queue(Print(c))?;
            }
        }
        if field_focused && form.cursor() == chars.len() {
            out.queue(PrintStyledContent(" ".reverse()))?;
        }
        Ok(())
    })?;
    row += 2;

    draw_row(out, row, width, |out| {
        button(out, "[ Submit ]", form.focus() == Focus::Submit)?;
        out.queue(Print("  "))?;
        button(out, "[ Cancel ]", form.focus() == Focus::Cancel)?;
        Ok(())
    })?;

    draw_bottom(out, row + 1, width, "Enter: submit  Tab: switch  Esc: cancel")?;
    out.flush()
}

fn render_status(out: &mut impl Write, title: &str, status: &str) -> io::Result<()> {
    let width = dialog_width();
    draw_top(out, width, title)?;
    let mut row = 1;
    for line in wrap_words(status, inner_width(width)) {
        draw_row(out, row, width, |out| {
            out.queue(Print(line))?;
            Ok(())
        })?;
        row += 1;
    }
    draw_bottom(out, row, width, "")?;
    out.flush()
}

fn render_message(
    out: &mut impl Write,
    title: &str,
    message: &str,
    is_error: bool,
) -> io::Result<()> {
    let width = dialog_width();
    draw_top(out, width, title)?;

    let mut row = 1;
    for line in wrap_words(message, inner_width(width)) {
        draw_row(out, row, width, |out| {
            if is_error {
                out.queue(PrintStyledContent(line.red()))?;
            } else {
                out.queue(Print(line))?;
            }
            Ok(())
        })?;
        row += 1;
    }
    row += 1;

    draw_row(out, row, width, |out| button(out, "[ OK ]", true))?;
    draw_bottom(out, row + 1, width, "Enter: OK  Esc: cancel")?;
    out.flush()
}

fn button(out: &mut impl Write, label: &str, focused: bool) -> io::Result<()> {
    if focused {
        out.queue(PrintStyledContent(label.reverse()))?;
    } else {
        out.queue(Print(label))?;
    }
    Ok(())
}

/// Char range of the field shown in `visible` columns, keeping the cursor cell
/// (which may sit one past the end) on screen.
fn field_window(len: usize, cursor: usize, visible: usize) -> (usize, usize) {
    let start = (cursor + 1).saturating_sub(visible);
    (start, len.min(start + visible))
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
