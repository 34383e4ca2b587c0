pub mod book;
pub mod budget;
pub mod config;
pub mod day;
pub mod item;
pub mod plan;
pub mod system;
pub mod theme;

use tabi_core::BudgetService;
use tabi_domain::{ItemCategory, ThemeColor};

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(plan::definitions());
    commands.extend(day::definitions());
    commands.extend(item::definitions());
    commands.extend(budget::definitions());
    commands.extend(theme::definitions());
    commands.extend(book::definitions());
    commands.extend(config::definitions());
    commands
}

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

fn is_clear(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("none")
}

/// `none` or a blank value clears the amount; anything else must contain a number.
pub(crate) fn parse_amount(value: &str, field: &str) -> Result<Option<f64>, CommandError> {
    if is_clear(value) {
        return Ok(None);
    }
    if value.trim_start().starts_with('-') {
        return Err(CommandError::InvalidArguments(format!(
            "{field} must be zero or positive"
        )));
    }
    BudgetService::parse_amount(value)
        .map(Some)
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid {field} `{value}`")))
}

pub(crate) fn parse_color(value: &str) -> Result<Option<ThemeColor>, CommandError> {
    if is_clear(value) {
        return Ok(None);
    }
    ThemeColor::from_hex(value).map(Some).ok_or_else(|| {
        CommandError::InvalidArguments(format!("invalid color `{value}`; expected #RRGGBB"))
    })
}

pub(crate) fn parse_category(value: &str) -> Result<ItemCategory, CommandError> {
    let needle = value.trim();
    ItemCategory::ALL
        .iter()
        .copied()
        .find(|category| {
            category.code().eq_ignore_ascii_case(needle)
                || category.label().eq_ignore_ascii_case(needle)
        })
        .ok_or_else(|| {
            let codes: Vec<&str> = ItemCategory::ALL.iter().map(|c| c.code()).collect();
            CommandError::InvalidArguments(format!(
                "unknown category `{needle}`; expected one of: {}",
                codes.join(", ")
            ))
        })
}

/// Non-blank text, or `None` when the value clears the field.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    if is_clear(value) {
        None
    } else {
        Some(value.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_currency_text() {
        assert_eq!(parse_amount("¥12,000", "budget").unwrap(), Some(12_000.0));
        assert_eq!(parse_amount("none", "budget").unwrap(), None);
        assert!(parse_amount("-5", "cost").is_err());
        assert!(parse_amount("abc", "cost").is_err());
    }

    #[test]
    fn categories_are_strict() {
        assert_eq!(parse_category("Meal").unwrap(), ItemCategory::Meal);
        assert_eq!(parse_category("hotel").unwrap(), ItemCategory::Hotel);
        assert!(parse_category("spa").is_err());
    }

    #[test]
    fn registry_has_every_command_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            ["help", "version", "exit", "plan", "day", "item", "budget", "theme", "book", "config"]
        );
    }
}
