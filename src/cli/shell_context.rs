use std::path::{Path, PathBuf};

use strsim::levenshtein;
use tabi_config::{Config, ConfigManager};
use tabi_storage_json::{canonical_name, JsonEntityStore, StoragePaths};
use tracing::debug;
use uuid::Uuid;

use crate::cli::commands;
use crate::cli::core::{CliError, CliMode, CommandError, CommandResult, LoopControl};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::core::trip_manager::TripManager;

/// Book opened when the configuration names none.
pub const DEFAULT_BOOK: &str = "trips";

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: TripManager<JsonEntityStore>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub base_dir: PathBuf,
    pub current_plan: Option<Uuid>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, &Config::base_dir())
    }

    /// Builds a context whose config, books, and backups all live under `base`.
    pub fn with_base_dir(mode: CliMode, base: &Path) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let book = config
            .last_opened_book
            .clone()
            .unwrap_or_else(|| DEFAULT_BOOK.to_string());
        let store = JsonEntityStore::open_with_retention(
            storage_paths(&config, base),
            &book,
            config.backup_retention,
        )?;
        let manager = TripManager::new(store)?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            manager,
            config_manager,
            config,
            base_dir: base.to_path_buf(),
            current_plan: None,
            last_command: None,
            running: true,
        };
        context.apply_output_preferences();
        debug!(base = %base.display(), book = %book, "shell context ready");
        Ok(context)
    }

    pub fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            style: self.config.output_style,
            color: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
    }

    pub fn storage_paths(&self) -> StoragePaths {
        storage_paths(&self.config, &self.base_dir)
    }

    pub fn book_name(&self) -> &str {
        self.manager.store().book_name()
    }

    /// Switches to another trip book and remembers it for the next session.
    pub fn open_book(&mut self, name: &str) -> CommandResult {
        let store = JsonEntityStore::open_with_retention(
            self.storage_paths(),
            name,
            self.config.backup_retention,
        )?;
        self.manager.replace_store(store)?;
        self.current_plan = None;
        self.config.last_opened_book = Some(canonical_name(name));
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        let plan = self
            .current_plan
            .and_then(|id| self.manager.book().plan(id))
            .map(|plan| plan.title.as_str());
        match plan {
            Some(title) => format!("tabi [{}:{}]> ", self.book_name(), title),
            None => format!("tabi [{}]> ", self.book_name()),
        }
    }

    /// The open plan, if it still exists.
    pub fn current_plan_id(&self) -> Result<Uuid, CommandError> {
        self.current_plan
            .filter(|id| self.manager.book().plan(*id).is_some())
            .ok_or(CommandError::NoPlanOpen)
    }

    /// Resolves an explicit plan reference, or falls back to the open plan.
    pub fn resolve_plan(&self, key: Option<&str>) -> Result<Uuid, CommandError> {
        match key {
            Some(key) => Ok(self.manager.find_plan(key)?.id),
            None => self.current_plan_id(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.config.locale
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NoPlanOpen => {
                output::error(CommandError::NoPlanOpen);
                output::hint("Try `plan list` to see your trips.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(first) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = first.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, first, &args)
    }
}

fn storage_paths(config: &Config, base: &Path) -> StoragePaths {
    StoragePaths {
        data_root: config.resolve_data_root(base),
        backup_root: config.resolve_backup_root(base),
    }
}

/// Runs `lines` against a fresh script-mode context rooted at `base`.
#[cfg(test)]
pub(crate) fn process_script(base: &Path, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        match context.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(context)
}
