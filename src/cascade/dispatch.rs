//! # Command Resolution
//!
//! [`resolve`] runs exactly once per command instance and walks this path:
//!
//! ```text
//! CREATED → INITIALIZING → HOOK_DISPATCH → DELEGATED | LOCAL_METHOD | DEFAULT | HELP_SHOWN
//! ```
//!
//! The first positional (the command word) decides the branch, in order:
//!
//! 1. a registered nested command `<namespace>_<Word>` takes over with the
//!    word shifted off and this command appended to the call structure;
//! 2. a method the command routed for the word runs with the word shifted off;
//! 3. the command's default `run` action.
//!
//! Before that, hooks run for every flag, then every option, then every
//! positional the command routed a hook for.
//!
//! A `--help` flag replaces branches 2 and 3 with the command's help.
//!
//! [`manual_run`] re-enters the same machinery from inside a running command.

use crate::args::{self, ParsedArguments};
use crate::command::{Command, Method, Routes};
use crate::context::Context;
use crate::error::{CascadeError, Result};
use crate::registry::nested_identifier;
use std::collections::{BTreeMap, BTreeSet};

enum Target<C> {
    Method(String, Method<C>),
    Default,
}

pub(crate) fn resolve<C: Command>(mut command: C, mut ctx: Context<'_>) -> Result<()> {
    ctx.set_help(command.help());

    tracing::debug!(
        command = ctx.identifier(),
        depth = ctx.call_structure().len(),
        "initializing"
    );
    command.initialize(&mut ctx)?;

    let routes = Routes::<C>::for_command();
    run_hooks(&mut command, &mut ctx, &routes)?;

    let target = match ctx.positional(0).map(str::to_lowercase) {
        Some(word) => {
            let child_id = nested_identifier(ctx.namespace(), &word);
            if let Some(child) = ctx.app().registry().build(&child_id) {
                tracing::debug!(from = ctx.identifier(), to = %child_id, "delegating");
                let child_ctx = ctx.nested(child_id);
                return child.resolve_and_run(child_ctx);
            }

            match routes.find_method(&word) {
                Some(method) => {
                    ctx.args_mut().shift();
                    Target::Method(word, method)
                }
                None => Target::Default,
            }
        }
        None => Target::Default,
    };

    let help_flag = &ctx.app().settings().help_flag;
    if ctx.has_flag(help_flag) {
        tracing::debug!(command = ctx.identifier(), "help requested");
        ctx.show_help()?;
        return Err(CascadeError::HelpShown { requested: true });
    }

    match target {
        Target::Method(word, method) => {
            tracing::debug!(command = ctx.identifier(), method = %word, "running method");
            method(&mut command, &mut ctx)
        }
        Target::Default => {
            if command.requires_args() && ctx.positionals().is_empty() {
                tracing::debug!(command = ctx.identifier(), "arguments required");
                return ctx.stop_with_help();
            }
            tracing::debug!(command = ctx.identifier(), "running default action");
            command.run(&mut ctx)
        }
    }
}

fn run_hooks<C: Command>(command: &mut C, ctx: &mut Context<'_>, routes: &Routes<C>) -> Result<()> {
    let flags: Vec<String> = ctx.args().flags().iter().cloned().collect();
    for flag in flags {
        if let Some(hook) = routes.flag_hook(&flag) {
            tracing::trace!(command = ctx.identifier(), flag = %flag, "flag hook");
            hook(command, ctx)?;
        }
    }

    let options: Vec<(String, String)> = ctx
        .args()
        .options()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    for (name, value) in options {
        if let Some(hook) = routes.option_hook(&name) {
            tracing::trace!(command = ctx.identifier(), option = %name, "option hook");
            hook(command, ctx, &value)?;
        }
    }

    let words: Vec<String> = ctx.positionals().iter().map(|p| p.to_lowercase()).collect();
    for word in words {
        if let Some(hook) = routes.argument_hook(&word) {
            tracing::trace!(command = ctx.identifier(), argument = %word, "argument hook");
            hook(command, ctx)?;
        }
    }
    Ok(())
}

/// Whether a manual run takes the caller's flags or options, or a given set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inheritance<T> {
    Inherit,
    Override(T),
}

/// A command line to run from inside another command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualRun {
    tokens: Vec<String>,
    merge_positionals: bool,
    flags: Inheritance<BTreeSet<String>>,
    options: Inheritance<BTreeMap<String, String>>,
}

impl ManualRun {
    /// A command line given as one string, split on whitespace.
    pub fn line(line: &str) -> Self {
        Self::tokens(args::split_command_line(line))
    }

    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            merge_positionals: true,
            flags: Inheritance::Inherit,
            options: Inheritance::Inherit,
        }
    }

    /// Append the caller's remaining positionals after the supplied ones (default on).
    pub fn merge_positionals(mut self, merge: bool) -> Self {
        self.merge_positionals = merge;
        self
    }

    pub fn flags(mut self, flags: Inheritance<BTreeSet<String>>) -> Self {
        self.flags = flags;
        self
    }

    pub fn options(mut self, options: Inheritance<BTreeMap<String, String>>) -> Self {
        self.options = options;
        self
    }

    /// Builds the arguments of the new run. Flags and options written in the
    /// command line itself are always kept, and override inherited option values.
    fn arguments(self, caller: &ParsedArguments, supplied: ParsedArguments) -> ParsedArguments {
        let mut positionals = supplied.positionals().to_vec();
        if self.merge_positionals {
            positionals.extend(caller.positionals().iter().cloned());
        }

        let mut flags = match self.flags {
            Inheritance::Inherit => caller.flags().clone(),
            Inheritance::Override(flags) => flags,
        };
        flags.extend(supplied.flags().iter().cloned());

        let mut options = match self.options {
            Inheritance::Inherit => caller.options().clone(),
            Inheritance::Override(options) => options,
        };
        options.extend(
            supplied
                .options()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        ParsedArguments::new(flags, options, positionals)
    }
}

impl From<&str> for ManualRun {
    fn from(line: &str) -> Self {
        ManualRun::line(line)
    }
}

impl From<Vec<String>> for ManualRun {
    fn from(tokens: Vec<String>) -> Self {
        ManualRun::tokens(tokens)
    }
}

pub(crate) fn manual_run(ctx: &mut Context<'_>, run: ManualRun) -> Result<()> {
    let app = ctx.app();
    let supplied = args::tokenize_for(&run.tokens, app.settings());
    let args = run.arguments(ctx.args(), supplied);

    let root = &app.settings().root;
    let handler = app
        .registry()
        .build(root)
        .ok_or_else(|| CascadeError::UnknownRoot(root.clone()))?;

    tracing::debug!(
        caller = ctx.identifier(),
        positionals = ?args.positionals(),
        "manual run"
    );
    handler.resolve_and_run(ctx.rooted(args))
}
