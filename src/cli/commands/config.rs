use tabi_config::CONFIG_KEYS;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage preferences",
        "config [show|set <key> <value>|backup [note]|backups|restore <name>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <key> <value>; keys: {}",
                    CONFIG_KEYS.join(", ")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            context.config.set(&key, &value)?;
            context.config_manager.save(&context.config)?;
            if key == "backup_retention" {
                let retention = context.config.backup_retention;
                context.manager.store_mut().set_retention(retention);
            }
            if matches!(key.as_str(), "output_style" | "ui_color_enabled") {
                context.apply_output_preferences();
            }
            output::success(format!("{} = {}", key, context.config.get(&key)?));
            if matches!(key.as_str(), "data_root" | "backup_root") {
                output::hint("Storage locations apply the next time the shell starts.");
            }
            Ok(())
        }
        "backup" => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            output::success(format!("Configuration backup `{}` created.", name));
            Ok(())
        }
        "backups" => {
            let names = context.config_manager.list_backups()?;
            output::section("Configuration backups");
            if names.is_empty() {
                output::info("No configuration backups yet.");
            }
            for name in names {
                output::line(format!("  {}", name));
            }
            Ok(())
        }
        "restore" => {
            let name = args
                .get(1)
                .ok_or_else(|| CommandError::usage("config restore <name>"))?;
            let restored = context.config_manager.restore(name)?;
            context.config_manager.save(&restored)?;
            context.config = restored;
            context.apply_output_preferences();
            output::success(format!("Configuration restored from `{}`.", name));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`"
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for key in CONFIG_KEYS {
        output::line(format!("  {:<18} {}", key, context.config.get(key)?));
    }
    output::line(format!(
        "  {:<18} {}",
        "(file)",
        context.config_manager.config_path().display()
    ));
    Ok(())
}
