use std::collections::HashMap;

use crate::cli::core::CommandError;

/// Command arguments split into positionals and `--name value` options.
///
/// A `--name` followed by another option or by nothing is stored with an empty
/// value, which commands treat as a switch or as "clear this field".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    positionals: Vec<String>,
    options: HashMap<String, String>,
}

impl ParsedArgs {
    pub fn parse(args: &[&str]) -> Self {
        let mut parsed = Self::default();
        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            if let Some(name) = arg.strip_prefix("--").filter(|name| !name.is_empty()) {
                if let Some((name, value)) = name.split_once('=') {
                    parsed.options.insert(name.to_ascii_lowercase(), value.to_string());
                    continue;
                }
                let value = match iter.peek() {
                    Some(next) if !next.starts_with("--") => {
                        iter.next().map(|value| value.to_string()).unwrap_or_default()
                    }
                    _ => String::new(),
                };
                parsed.options.insert(name.to_ascii_lowercase(), value);
            } else {
                parsed.positionals.push(arg.to_string());
            }
        }
        parsed
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn require(&self, index: usize, usage: &str) -> Result<&str, CommandError> {
        self.positional(index).ok_or_else(|| CommandError::usage(usage))
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn has(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Rejects options outside `allowed`.
    pub fn expect_only(&self, allowed: &[&str]) -> Result<(), CommandError> {
        let mut unknown: Vec<&str> = self
            .options
            .keys()
            .map(String::as_str)
            .filter(|name| !allowed.contains(name))
            .collect();
        unknown.sort_unstable();
        match unknown.first() {
            None => Ok(()),
            Some(name) => Err(CommandError::InvalidArguments(format!(
                "unknown option `--{name}`; expected one of: {}",
                allowed
                    .iter()
                    .map(|name| format!("--{name}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Parses a 1-based day number.
    pub fn day_number(&self, index: usize, usage: &str) -> Result<usize, CommandError> {
        let raw = self.require(index, usage)?;
        raw.parse::<usize>()
            .ok()
            .filter(|day| *day > 0)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "`{raw}` is not a day number; days start at 1"
                ))
            })
    }
}
