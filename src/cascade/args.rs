//! # Argument Tokenizer
//!
//! Turns raw process arguments into three containers:
//!
//! - **flags**: `-v`, `--dry-run` (lower-cased, set semantics)
//! - **options**: `--env=prod`, `-e='prod'` (lower-cased key, last one wins;
//!   `--env=` with nothing after `=` is the flag `env`)
//! - **positionals**: everything else, in the order given
//!
//! Options are only recognized in the joined `name=value` form. `--env prod`
//! is the flag `env` followed by the positional `prod`, unless the caller opts
//! into [`Grammar::Lookahead`].
//!
//! Names start with a letter, so `--` alone is a positional. There is no
//! support for bundled short flags: `-abc` is the single flag `abc`.

use crate::config::{Grammar, Settings};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

// The patterns are constants, a failure to compile is a programming error.
static OPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^--?([a-zA-Z][a-zA-Z-]*)=(.*)$").expect("static regex must compile")
});
static FLAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^--?([a-zA-Z][a-zA-Z-]*)$").expect("static regex must compile"));

/// The result of tokenizing one invocation level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    flags: BTreeSet<String>,
    options: BTreeMap<String, String>,
    positionals: Vec<String>,
}

impl ParsedArguments {
    pub fn new(
        flags: BTreeSet<String>,
        options: BTreeMap<String, String>,
        positionals: Vec<String>,
    ) -> Self {
        Self {
            flags,
            options,
            positionals,
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    pub fn set_flags(&mut self, flags: BTreeSet<String>) {
        self.flags = flags;
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn set_options(&mut self, options: BTreeMap<String, String>) {
        self.options = options;
    }

    /// True if any positional equals `value` exactly.
    pub fn has_positional(&self, value: &str) -> bool {
        self.positionals.iter().any(|p| p == value)
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    pub fn set_positionals(&mut self, positionals: Vec<String>) {
        self.positionals = positionals;
    }

    /// Removes and returns the first positional.
    pub fn shift(&mut self) -> Option<String> {
        if self.positionals.is_empty() {
            None
        } else {
            Some(self.positionals.remove(0))
        }
    }

    /// The arguments a nested command receives: the command word removed,
    /// flags and options unchanged.
    pub fn shifted(&self) -> Self {
        let mut child = self.clone();
        child.shift();
        child
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Option(String, String),
    Flag(String),
    Positional(String),
}

fn classify(raw: &str) -> Token {
    if let Some(caps) = OPTION_RE.captures(raw) {
        let name = caps[1].to_lowercase();
        // An empty right-hand side never makes an option
        if caps[2].is_empty() {
            return Token::Flag(name);
        }
        return Token::Option(name, strip_quotes(&caps[2]).to_string());
    }
    if let Some(caps) = FLAG_RE.captures(raw) {
        return Token::Flag(caps[1].to_lowercase());
    }
    Token::Positional(raw.to_string())
}

/// Removes one layer of matching `"` or `'` around a value.
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Tokenizes with the default joined-only grammar.
pub fn tokenize<I, S>(raw: I) -> ParsedArguments
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokenize_with(raw, Grammar::Joined)
}

pub fn tokenize_with<I, S>(raw: I, grammar: Grammar) -> ParsedArguments
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokenize_keeping(raw, grammar, &[])
}

/// Tokenizes with the grammar from `settings`. The help and no-colors flags
/// stay flags under lookahead instead of swallowing the next token.
pub fn tokenize_for<I, S>(raw: I, settings: &Settings) -> ParsedArguments
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let bare = [settings.help_flag.as_str(), settings.no_colors_flag.as_str()];
    tokenize_keeping(raw, settings.grammar, &bare)
}

fn tokenize_keeping<I, S>(raw: I, grammar: Grammar, bare: &[&str]) -> ParsedArguments
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedArguments::default();
    let mut tokens = raw
        .into_iter()
        .map(|s| classify(s.as_ref()))
        .peekable();

    while let Some(token) = tokens.next() {
        match token {
            Token::Option(name, value) => {
                parsed.options.insert(name, value);
            }
            Token::Flag(name) => {
                let value = match grammar {
                    Grammar::Lookahead if !bare.contains(&name.as_str()) => {
                        tokens.next_if(|next| matches!(next, Token::Positional(_)))
                    }
                    _ => None,
                };
                match value {
                    Some(Token::Positional(value)) => {
                        parsed.options.insert(name, strip_quotes(&value).to_string());
                    }
                    _ => {
                        parsed.flags.insert(name);
                    }
                }
            }
            Token::Positional(value) => parsed.positionals.push(value),
        }
    }

    tracing::trace!(
        flags = ?parsed.flags,
        options = ?parsed.options,
        positionals = ?parsed.positionals,
        "tokenized arguments"
    );
    parsed
}

/// Tokenizes the current process arguments, skipping the program name.
pub fn tokenize_env(settings: &Settings) -> ParsedArguments {
    tokenize_for(std::env::args().skip(1), settings)
}

/// Splits a command line written as one string on whitespace.
pub fn split_command_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
