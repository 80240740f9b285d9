use crate::args::{self, ParsedArguments};
use crate::command::Command;
use crate::config::Settings;
use crate::context::{CallStructure, Context, Frame};
use crate::error::{CascadeError, Result};
use crate::output::Output;
use crate::registry::Registry;

/// A registry of commands plus the settings they are dispatched with.
pub struct App {
    registry: Registry,
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            registry: Registry::new(),
            settings,
        }
    }

    pub fn register<C: Command + Default>(mut self, identifier: &str) -> Self {
        self.registry.register::<C>(identifier);
        self
    }

    pub fn register_with<C, F>(mut self, identifier: &str, factory: F) -> Self
    where
        C: Command,
        F: Fn() -> C + 'static,
    {
        self.registry.register_with(identifier, factory);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Tokenizes `raw` and dispatches it from the root command.
    ///
    /// Never exits the process: every way the run can end is returned.
    pub fn dispatch<I, S>(&self, raw: I, output: &mut Output) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = args::tokenize_for(raw, &self.settings);
        self.dispatch_parsed(parsed, output)
    }

    pub fn dispatch_parsed(&self, args: ParsedArguments, output: &mut Output) -> Result<()> {
        if args.has_flag(&self.settings.no_colors_flag) {
            output.set_colors(false);
        }

        let root = &self.settings.root;
        let handler = self
            .registry
            .build(root)
            .ok_or_else(|| CascadeError::UnknownRoot(root.clone()))?;

        let frame = Frame::new(root.clone(), root.clone(), args);
        let ctx = Context::new(self, output, CallStructure::new(), frame);
        handler.resolve_and_run(ctx)
    }

    /// Writes the error line for anything that did not already print help.
    pub fn report(&self, err: &CascadeError, output: &mut Output) -> Result<()> {
        if err.help_already_shown() {
            return Ok(());
        }
        output.error_line(&err.to_string())
    }

    /// Process entry point: dispatches `std::env::args`, reports and exits.
    pub fn main(&self) -> ! {
        let mut output = Output::stdio(self.settings.colors)
            .with_error_label(self.settings.error_label.clone());
        let parsed = args::tokenize_env(&self.settings);

        let result = self.dispatch_parsed(parsed, &mut output);
        std::process::exit(self.finish(result, &mut output))
    }

    /// Reports the outcome of a dispatch, flushes, and returns the exit code.
    /// Output failures at this point go to stderr and do not change the code.
    pub fn finish(&self, result: Result<()>, output: &mut Output) -> i32 {
        let code = match result {
            Ok(()) => 0,
            Err(err) => {
                tracing::debug!(error = %err, "dispatch ended early");
                if let Err(report_err) = self.report(&err, output) {
                    eprintln!("Error: {}", report_err);
                }
                err.exit_code()
            }
        };

        if let Err(flush_err) = output.flush() {
            eprintln!("Error: {}", flush_err);
        }
        code
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
