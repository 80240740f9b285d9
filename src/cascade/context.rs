//! # Dispatch Context
//!
//! One [`Context`] exists per resolution level. It owns that level's
//! [`ParsedArguments`], a [`Frame`] describing the running command, and the
//! [`CallStructure`] of every command visited before it. It also lends out the
//! shared [`Output`], so helpers that need "the current command" (help,
//! assertions) get it from the context instead of global state.
//!
//! The call structure holds value snapshots, not references to live command
//! instances: a parent is still running (mutably borrowed) while its children
//! execute, and a snapshot of its identifier, namespace and arguments is what
//! upward lookups need.

use crate::app::App;
use crate::args::{self, ParsedArguments};
use crate::dispatch::{self, ManualRun};
use crate::error::{CascadeError, Result};
use crate::output::{Color, Output};

/// Snapshot of one visited command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    identifier: String,
    namespace: String,
    args: ParsedArguments,
}

impl Frame {
    pub fn new(
        identifier: impl Into<String>,
        namespace: impl Into<String>,
        args: ParsedArguments,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            namespace: namespace.into(),
            args,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn args(&self) -> &ParsedArguments {
        &self.args
    }
}

/// Ancestry of a command, root first and immediate parent last.
///
/// Extending produces a new structure; a structure handed to a child is never
/// modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStructure {
    frames: Vec<Frame>,
}

impl CallStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extended(&self, frame: Frame) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        frames.extend(self.frames.iter().cloned());
        frames.push(frame);
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The immediate parent, or with a filter the nearest ancestor with that identifier.
    pub fn parent(&self, filter: Option<&str>) -> Result<&Frame> {
        let found = match filter {
            None => self.frames.last(),
            Some(name) => self.frames.iter().rev().find(|f| f.identifier == name),
        };
        found.ok_or_else(|| CascadeError::NoParentInChain {
            filter: filter.map(str::to_string),
        })
    }
}

pub struct Context<'a> {
    app: &'a App,
    output: &'a mut Output,
    call_structure: CallStructure,
    frame: Frame,
    help: String,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        app: &'a App,
        output: &'a mut Output,
        call_structure: CallStructure,
        frame: Frame,
    ) -> Self {
        Self {
            app,
            output,
            call_structure,
            frame,
            help: String::new(),
        }
    }

    /// Context for a nested command: the command word shifted off, flags and
    /// options unchanged, this frame appended to the ancestry.
    pub(crate) fn nested(&mut self, identifier: String) -> Context<'_> {
        let args = self.frame.args.shifted();
        Context::new(
            self.app,
            &mut *self.output,
            self.call_structure.extended(self.frame.clone()),
            Frame::new(identifier.clone(), identifier, args),
        )
    }

    /// Context for a manual run: namespace reset to the root command.
    pub(crate) fn rooted(&mut self, args: ParsedArguments) -> Context<'_> {
        let root = self.app.settings().root.clone();
        Context::new(
            self.app,
            &mut *self.output,
            self.call_structure.extended(self.frame.clone()),
            Frame::new(root.clone(), root, args),
        )
    }

    pub(crate) fn app(&self) -> &'a App {
        self.app
    }

    pub(crate) fn set_help(&mut self, help: &str) {
        self.help = help.to_string();
    }

    pub fn identifier(&self) -> &str {
        &self.frame.identifier
    }

    pub fn namespace(&self) -> &str {
        &self.frame.namespace
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn call_structure(&self) -> &CallStructure {
        &self.call_structure
    }

    pub fn args(&self) -> &ParsedArguments {
        &self.frame.args
    }

    pub fn set_args(&mut self, args: ParsedArguments) {
        self.frame.args = args;
    }

    pub(crate) fn args_mut(&mut self) -> &mut ParsedArguments {
        &mut self.frame.args
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.frame.args.has_flag(flag)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.frame.args.option(name)
    }

    pub fn positionals(&self) -> &[String] {
        self.frame.args.positionals()
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.frame.args.positional(index)
    }

    pub fn get_parent(&self, filter: Option<&str>) -> Result<&Frame> {
        self.call_structure.parent(filter)
    }

    pub fn parent(&self) -> Result<&Frame> {
        self.get_parent(None)
    }

    pub fn parent_named(&self, identifier: &str) -> Result<&Frame> {
        self.get_parent(Some(identifier))
    }

    /// Runs another command line from the root, synchronously.
    pub fn manual_run(&mut self, run: impl Into<ManualRun>) -> Result<()> {
        dispatch::manual_run(self, run.into())
    }

    /// Parses `line` with the application's grammar, without running anything.
    pub fn parse(&self, line: &str) -> ParsedArguments {
        args::tokenize_for(args::split_command_line(line), self.app.settings())
    }

    pub fn output(&mut self) -> &mut Output {
        &mut *self.output
    }

    pub fn info(&mut self, message: &str) -> Result<()> {
        self.output.info(message)
    }

    pub fn debug(&mut self, message: &str) -> Result<()> {
        self.output.debug(message)
    }

    pub fn color_text(&self, text: &str, color: Color) -> String {
        self.output.color_text(text, color)
    }

    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
        self.output.table(headers, rows)
    }

    pub fn key_list<K, V>(&mut self, pairs: &[(K, V)]) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.output.key_list(pairs)
    }

    pub fn input(&mut self, prompt: &str) -> Result<String> {
        self.output.input(prompt)
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.output.confirm(prompt)
    }

    /// Writes the running command's help.
    pub fn show_help(&mut self) -> Result<()> {
        self.output.show_help(&self.help)
    }

    /// Writes help and ends the dispatch.
    pub fn stop_with_help(&mut self) -> Result<()> {
        self.show_help()?;
        Err(CascadeError::HelpShown { requested: false })
    }

    /// Ends the dispatch with an error message.
    pub fn bail<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(CascadeError::Bail(message.into()))
    }

    fn missing(&mut self, what: String) -> Result<()> {
        self.show_help()?;
        Err(CascadeError::MissingArgument(what))
    }

    /// Requires at least `count` positionals.
    pub fn assert_num_positionals(&mut self, count: usize) -> Result<()> {
        if self.positionals().len() < count {
            return self.missing(format!("expected {} positional arguments", count));
        }
        Ok(())
    }

    pub fn assert_has_positional(&mut self, value: &str) -> Result<()> {
        if !self.frame.args.has_positional(value) {
            return self.missing(format!("argument {}", value));
        }
        Ok(())
    }

    pub fn assert_has_flag(&mut self, flag: &str) -> Result<()> {
        if !self.has_flag(flag) {
            return self.missing(format!("flag --{}", flag));
        }
        Ok(())
    }

    pub fn assert_has_option(&mut self, name: &str) -> Result<()> {
        if !self.frame.args.has_option(name) {
            return self.missing(format!("option --{}=<value>", name));
        }
        Ok(())
    }
}
