use tabi_domain::CURRENT_SCHEMA_VERSION;
use tabi_storage_json::JsonEntityStore;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "book [info]
book list
book open <name>
book backup [note]
book backups
book restore <backup-id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "book",
        "Switch trip books and manage their backups",
        USAGE,
        cmd_book,
    )]
}

fn cmd_book(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let sub = args.first().map(|value| value.to_lowercase());
    match sub.as_deref() {
        None | Some("info") => show_info(context),
        Some("list") | Some("ls") => {
            let books = JsonEntityStore::list_books(&context.storage_paths())?;
            output::section("Trip books");
            if books.is_empty() {
                output::info("No saved books yet.");
            }
            let current = context.manager.store().book_path();
            for name in books {
                let path = context.storage_paths().book_path(&name);
                let marker = if path == current { "*" } else { " " };
                output::line(format!("{} {}", marker, name));
            }
            Ok(())
        }
        Some("open") | Some("use") => {
            let name = args
                .get(1..)
                .map(|rest| rest.join(" "))
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| CommandError::usage("book open <name>"))?;
            context.open_book(&name)?;
            output::success(format!(
                "Opened book `{}` with {} plan(s).",
                context.book_name(),
                context.manager.book().plans.len()
            ));
            Ok(())
        }
        Some("backup") => {
            let note = args.get(1..).map(|rest| rest.join(" "));
            let info = context
                .manager
                .store()
                .backup(note.as_deref().filter(|note| !note.trim().is_empty()))?;
            output::success(format!("Backup `{}` created.", info.id));
            Ok(())
        }
        Some("backups") => {
            let backups = context.manager.store().list_backups()?;
            output::section(format!("Backups of {}", context.book_name()));
            if backups.is_empty() {
                output::info("No backups yet.");
            }
            for backup in backups {
                let created = backup
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown time".into());
                output::line(format!(
                    "  {:<48} {}  {} bytes",
                    backup.id, created, backup.size_bytes
                ));
            }
            Ok(())
        }
        Some("restore") => {
            let id = args
                .get(1)
                .ok_or_else(|| CommandError::usage("book restore <backup-id>"))?;
            let restored = context.manager.store_mut().restore(id)?;
            context.manager.reload()?;
            if context.current_plan_id().is_err() {
                context.current_plan = None;
            }
            output::success(format!(
                "Restored `{}` with {} plan(s).",
                id,
                restored.plans.len()
            ));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown book action `{other}`"
        ))),
    }
}

fn show_info(context: &ShellContext) -> CommandResult {
    let book = context.manager.book();
    output::section(format!("Book: {}", context.book_name()));
    output::line(format!("  File      : {}", context.manager.store().book_path().display()));
    output::line(format!("  Schema    : v{}", CURRENT_SCHEMA_VERSION));
    output::line(format!("  Plans     : {}", book.plans.len()));
    output::line(format!("  Days      : {}", book.schedules.len()));
    output::line(format!("  Items     : {}", book.items.len()));
    output::line(format!(
        "  Updated   : {}",
        book.updated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    let orphans = book.orphans();
    if !orphans.is_empty() {
        output::warning(format!(
            "{} record(s) reference a missing parent.",
            orphans.len()
        ));
    }
    Ok(())
}
