//! # Cascade Architecture
//!
//! Cascade turns a raw argument vector into one executed command, resolving
//! nested subcommands by **naming convention** instead of a central `match`.
//! Each command only knows its own methods and hooks; the tree emerges from the
//! identifiers commands are registered under.
//!
//! ## The Resolution Path
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Tokenizer (args.rs)                                         │
//! │  raw tokens → flags / options / positionals                  │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Root command (App::dispatch)                                │
//! │  initialize → flag/option hooks → inspect the command word   │
//! └──────────────────────────────────────────────────────────────┘
//!          │                     │                     │
//!          ▼                     ▼                     ▼
//!   App_<Word> registered   method routed         default run()
//!   → recurse, word shifted  → word shifted
//!     off, call structure
//!     extended by one
//! ```
//!
//! ## Naming Convention
//!
//! A command running in namespace `App` that sees the command word `deploy`
//! first looks for a registered command `App_Deploy`. Nested commands use their
//! own identifier as namespace, so `app deploy canary` reaches `App_Deploy_Canary`.
//!
//! ```rust
//! use cascade::{App, Command, Context, Output, Result, Routes, Settings};
//!
//! #[derive(Default)]
//! struct Root;
//!
//! impl Root {
//!     fn run_hello(&mut self, ctx: &mut Context<'_>) -> Result<()> {
//!         let name = ctx.positional(0).unwrap_or("world").to_string();
//!         ctx.info(&format!("hello {}", name))
//!     }
//! }
//!
//! impl Command for Root {
//!     fn routes(routes: &mut Routes<Self>) {
//!         routes.method("hello", Self::run_hello);
//!     }
//! }
//!
//! let app = App::new(Settings::default()).register::<Root>("App");
//! let (mut output, captured) = Output::capture("");
//! app.dispatch(["hello", "cascade"], &mut output).unwrap();
//! assert_eq!(captured.contents(), "hello cascade\n");
//! ```
//!
//! ## Ending a Run
//!
//! Nothing below [`App::main`] exits the process. Help, failed assertions and
//! [`Context::bail`] all come back as [`CascadeError`] values, so the engine
//! can be embedded in a long-running host. `App::main` is the one place that
//! prints the error line and picks the exit code.
//!
//! ## Module Overview
//!
//! - [`args`]: tokenizer and [`ParsedArguments`]
//! - [`command`]: the [`Command`] trait and per-command [`Routes`]
//! - [`registry`]: identifier → factory table and the naming convention
//! - [`context`]: [`Context`], [`Frame`] and [`CallStructure`]
//! - [`dispatch`]: resolution and manual runs
//! - [`app`]: [`App`], the embeddable and process entry points
//! - [`output`]: help, colors, tables, key lists and prompts
//! - [`config`]: [`Settings`]
//! - [`error`]: error types

pub mod app;
pub mod args;
pub mod command;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod registry;

pub use app::App;
pub use args::{tokenize, tokenize_for, tokenize_with, ParsedArguments};
pub use command::{Command, Routes, DEFAULT_HELP};
pub use config::{ColorMode, Grammar, Settings};
pub use context::{CallStructure, Context, Frame};
pub use dispatch::{Inheritance, ManualRun};
pub use error::{CascadeError, Result};
pub use output::{Captured, Color, Output};
pub use registry::Registry;
