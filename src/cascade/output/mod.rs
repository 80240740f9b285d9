//! # Output Layer
//!
//! Everything a command writes or reads goes through [`Output`]: plain lines,
//! colored text, help, error lines, tables, key lists and prompts. The handle is
//! threaded through the dispatch context, so there is no process-wide "current
//! command" to look help up from.
//!
//! Tests swap stdout/stdin for in-memory buffers with [`Output::capture`].

pub mod render;
pub mod styles;

use crate::config::ColorMode;
use crate::error::Result;
use console::Term;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

pub use styles::Color;

const DEFAULT_ERROR_LABEL: &str = "ERROR: ";

/// Answers accepted by [`Output::confirm`], compared exactly.
pub const AFFIRMATIVE_ANSWERS: &[&str] = &["1", "yes", "y", "ok"];

pub struct Output {
    writer: Box<dyn Write>,
    reader: Box<dyn BufRead>,
    colors: bool,
    error_label: String,
}

impl Output {
    pub fn new(writer: Box<dyn Write>, reader: Box<dyn BufRead>, colors: bool) -> Self {
        Self {
            writer,
            reader,
            colors,
            error_label: DEFAULT_ERROR_LABEL.to_string(),
        }
    }

    /// stdout and stdin, with colors resolved from `mode`.
    pub fn stdio(mode: ColorMode) -> Self {
        Self::new(
            Box::new(io::stdout()),
            Box::new(io::BufReader::new(io::stdin())),
            colors_for(mode),
        )
    }

    /// An output writing into memory and reading answers from `input`.
    pub fn capture(input: &str) -> (Self, Captured) {
        let captured = Captured::default();
        let output = Self::new(
            Box::new(captured.clone()),
            Box::new(io::Cursor::new(input.as_bytes().to_vec())),
            false,
        );
        (output, captured)
    }

    pub fn with_error_label(mut self, label: impl Into<String>) -> Self {
        self.error_label = label.into();
        self
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    pub fn set_colors(&mut self, colors: bool) {
        self.colors = colors;
    }

    pub fn color_text(&self, text: &str, color: Color) -> String {
        styles::paint(text, color, self.colors)
    }

    /// Writes `message` followed by a newline.
    pub fn info(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }

    /// Writes `message` without a trailing newline.
    pub fn write(&mut self, message: &str) -> Result<()> {
        write!(self.writer, "{}", message)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn debug(&mut self, message: &str) -> Result<()> {
        tracing::debug!(target: "cascade::output", "{}", message);
        self.info(message)
    }

    /// Writes help text with its common indentation removed.
    pub fn show_help(&mut self, help: &str) -> Result<()> {
        let text = render::normalize_help(help);
        writeln!(self.writer, "{}", text)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes `\n<label><message>\n` with the label in red.
    pub fn error_line(&mut self, message: &str) -> Result<()> {
        let label = styles::paint(&self.error_label, styles::names::ERROR_LABEL, self.colors);
        writeln!(self.writer, "\n{}{}", label, message)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
        for line in render::table_lines(headers, rows, self.colors) {
            writeln!(self.writer, "{}", line)?;
        }
        Ok(())
    }

    pub fn key_list<K, V>(&mut self, pairs: &[(K, V)]) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for line in render::key_list_lines(pairs, self.colors) {
            writeln!(self.writer, "{}", line)?;
        }
        Ok(())
    }

    /// Reads one line, optionally after writing a prompt. The answer is trimmed.
    pub fn input(&mut self, prompt: &str) -> Result<String> {
        let prompt = prompt.trim();
        if !prompt.is_empty() {
            write!(self.writer, "{} ", prompt)?;
            self.writer.flush()?;
        }

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.input(prompt)?;
        Ok(AFFIRMATIVE_ANSWERS.contains(&answer.as_str()))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Resolves a color mode against the attached terminal.
pub fn colors_for(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => Term::stdout().features().colors_supported(),
    }
}

/// Shared in-memory sink handed out by [`Output::capture`].
#[derive(Clone, Default)]
pub struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
