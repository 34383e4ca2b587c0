use tabi_domain::{ItemCategory, THEME_PRESETS, VITAMIN_PALETTE};

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "theme",
        "List theme presets, accent colors, and item categories",
        "theme [list|palette|categories]",
        cmd_theme,
    )]
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let sub = args.first().map(|value| value.to_lowercase());
    match sub.as_deref() {
        None | Some("list") => {
            output::section("Themes");
            for preset in THEME_PRESETS {
                let marker = if preset.name == context.config.default_theme {
                    "*"
                } else {
                    " "
                };
                output::line(format!(
                    "{} {:<16} {:<16} {}",
                    marker, preset.name, preset.icon, preset.color
                ));
            }
            Ok(())
        }
        Some("palette") => {
            output::section("Accent palette");
            for (index, color) in VITAMIN_PALETTE.iter().enumerate() {
                output::line(format!("  {:>2}. {}", index + 1, color));
            }
            output::info("Use `plan edit --color <hex>` to pick a custom accent.");
            Ok(())
        }
        Some("categories") => {
            output::section("Item categories");
            for category in ItemCategory::ALL {
                output::line(format!(
                    "  {:<12} {:<12} {:<16} {}",
                    category.code(),
                    category.label(),
                    category.icon(),
                    category.color()
                ));
            }
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown theme action `{other}`"
        ))),
    }
}
