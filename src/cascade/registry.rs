use crate::command::{Command, Handler};
use std::collections::HashMap;

type Factory = Box<dyn Fn() -> Box<dyn Handler>>;

/// Identifier → constructor table for every command an application knows.
///
/// Nested commands are found by convention: the command word `deploy` read
/// by a command in namespace `App` resolves to the identifier `App_Deploy`.
#[derive(Default)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: Command + Default>(&mut self, identifier: &str) -> &mut Self {
        self.register_with(identifier, C::default)
    }

    pub fn register_with<C, F>(&mut self, identifier: &str, factory: F) -> &mut Self
    where
        C: Command,
        F: Fn() -> C + 'static,
    {
        let boxed: Factory = Box::new(move || -> Box<dyn Handler> { Box::new(factory()) });
        if self.factories.insert(identifier.to_string(), boxed).is_some() {
            tracing::warn!(identifier, "command registered twice, keeping the latest");
        }
        self
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Constructs a fresh instance of the command registered under `identifier`.
    pub fn build(&self, identifier: &str) -> Option<Box<dyn Handler>> {
        self.factories.get(identifier).map(|factory| factory())
    }

    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// `App` + `deploy` → `App_Deploy`.
pub fn nested_identifier(namespace: &str, word: &str) -> String {
    format!("{}_{}", namespace, capitalize(&word.to_lowercase()))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
