//! # Commands and Route Tables
//!
//! A command is any type implementing [`Command`]. Besides its default
//! [`Command::run`] action, a command can declare four kinds of routes in
//! [`Command::routes`]:
//!
//! - **methods**: a command word handled locally (`app deploy` → `run_deploy`)
//! - **flag hooks**: called whenever a flag is present (`--verbose`)
//! - **option hooks**: called with the value whenever an option is present
//!   (`--env=prod`)
//! - **argument hooks**: called for each positional equal to the word
//!   (`app sub` → the `sub` hook), whether or not the word names a command
//!
//! Nested commands are not declared here. They are registered in the
//! [`Registry`](crate::registry::Registry) under `<namespace>_<Word>` and found
//! by convention.

use crate::context::Context;
use crate::dispatch;
use crate::error::Result;
use std::collections::BTreeMap;

/// Help shown by commands that do not provide their own.
pub const DEFAULT_HELP: &str = "Invalid input";

pub type Method<C> = fn(&mut C, &mut Context<'_>) -> Result<()>;
pub type FlagHook<C> = fn(&mut C, &mut Context<'_>) -> Result<()>;
pub type OptionHook<C> = fn(&mut C, &mut Context<'_>, &str) -> Result<()>;
pub type ArgumentHook<C> = fn(&mut C, &mut Context<'_>) -> Result<()>;

pub trait Command: 'static {
    fn help(&self) -> &str {
        DEFAULT_HELP
    }

    /// When true, an invocation without positionals shows help instead of running.
    fn requires_args(&self) -> bool {
        false
    }

    /// Runs once, before hooks and resolution.
    fn initialize(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    fn routes(_routes: &mut Routes<Self>)
    where
        Self: Sized,
    {
    }

    /// The default action, used when no nested command or method matches.
    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.stop_with_help()
    }
}

/// Type-erased entry point, so the registry can hold any command.
pub trait Handler {
    fn resolve_and_run(self: Box<Self>, ctx: Context<'_>) -> Result<()>;
}

impl<C: Command> Handler for C {
    fn resolve_and_run(self: Box<Self>, ctx: Context<'_>) -> Result<()> {
        dispatch::resolve(*self, ctx)
    }
}

/// Methods and hooks declared by one command type. Keys are lower-case.
pub struct Routes<C> {
    methods: BTreeMap<String, Method<C>>,
    flag_hooks: BTreeMap<String, FlagHook<C>>,
    option_hooks: BTreeMap<String, OptionHook<C>>,
    argument_hooks: BTreeMap<String, ArgumentHook<C>>,
}

impl<C> Default for Routes<C> {
    fn default() -> Self {
        Self {
            methods: BTreeMap::new(),
            flag_hooks: BTreeMap::new(),
            option_hooks: BTreeMap::new(),
            argument_hooks: BTreeMap::new(),
        }
    }
}

impl<C: Command> Routes<C> {
    pub fn for_command() -> Self {
        let mut routes = Self::default();
        C::routes(&mut routes);
        routes
    }
}

impl<C> Routes<C> {
    pub fn method(&mut self, word: &str, method: Method<C>) -> &mut Self {
        self.methods.insert(word.to_lowercase(), method);
        self
    }

    pub fn on_flag(&mut self, flag: &str, hook: FlagHook<C>) -> &mut Self {
        self.flag_hooks.insert(flag.to_lowercase(), hook);
        self
    }

    pub fn on_option(&mut self, name: &str, hook: OptionHook<C>) -> &mut Self {
        self.option_hooks.insert(name.to_lowercase(), hook);
        self
    }

    pub fn on_argument(&mut self, word: &str, hook: ArgumentHook<C>) -> &mut Self {
        self.argument_hooks.insert(word.to_lowercase(), hook);
        self
    }

    pub fn find_method(&self, word: &str) -> Option<Method<C>> {
        self.methods.get(word).copied()
    }

    pub fn flag_hook(&self, flag: &str) -> Option<FlagHook<C>> {
        self.flag_hooks.get(flag).copied()
    }

    pub fn option_hook(&self, name: &str) -> Option<OptionHook<C>> {
        self.option_hooks.get(name).copied()
    }

    pub fn argument_hook(&self, word: &str) -> Option<ArgumentHook<C>> {
        self.argument_hooks.get(word).copied()
    }

    pub fn method_words(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}
