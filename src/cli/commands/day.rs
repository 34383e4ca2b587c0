use tabi_core::BudgetService;

use crate::cli::args::ParsedArgs;
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::format::{format_amount, format_day, format_time};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "day list
day show <n>
day edit <n> [--title TEXT|none] [--notes TEXT|none]
day delete <n>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "day",
        "Inspect and annotate the days of the open plan",
        USAGE,
        cmd_day,
    )]
}

fn cmd_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (sub, rest) = match args.split_first() {
        Some((sub, rest)) => (sub.to_lowercase(), rest),
        None => ("list".to_string(), &[][..]),
    };
    let parsed = ParsedArgs::parse(rest);
    match sub.as_str() {
        "list" | "ls" => list_days(context),
        "show" => show_day(context, parsed.day_number(0, "day show <n>")?),
        "edit" => edit_day(context, &parsed),
        "delete" | "rm" => delete_day(context, parsed.day_number(0, "day delete <n>")?),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown day action `{other}`"
        ))),
    }
}

fn list_days(context: &ShellContext) -> CommandResult {
    let plan_id = context.current_plan_id()?;
    let plan = context.manager.plan(plan_id)?;
    output::section(format!("Days of {}", plan.title));
    for (index, schedule) in context.manager.schedules(plan_id).into_iter().enumerate() {
        let total = BudgetService::schedule_total(context.manager.book(), schedule.id);
        output::line(format!(
            "  {:>2}. {:<12} {:<20} {:>3} item(s)  {}",
            index + 1,
            format_day(schedule.date, context.locale()),
            schedule.title.as_deref().unwrap_or(""),
            context.manager.items(schedule.id).len(),
            format_amount(total, context.currency())
        ));
    }
    Ok(())
}

fn show_day(context: &ShellContext, day: usize) -> CommandResult {
    let plan_id = context.current_plan_id()?;
    let schedule = context.manager.schedule_by_day(plan_id, day)?;
    let heading = match schedule.title.as_deref() {
        Some(title) => format!(
            "Day {} {} {}",
            day,
            format_day(schedule.date, context.locale()),
            title
        ),
        None => format!("Day {} {}", day, format_day(schedule.date, context.locale())),
    };
    output::section(heading);
    if let Some(notes) = &schedule.notes {
        output::line(format!("  Notes: {}", notes));
    }

    let items = context.manager.items(schedule.id);
    if items.is_empty() {
        output::info("Nothing planned yet. Add something with `item add`.");
        return Ok(());
    }
    for (index, item) in items.iter().enumerate() {
        let check = if item.is_completed { "x" } else { " " };
        let cost = item
            .cost
            .map(|cost| format_amount(cost, context.currency()))
            .unwrap_or_default();
        output::line(format!(
            "  {:>2}. [{}] {} {:<12} {:<24} {}",
            index + 1,
            check,
            format_time(item.time),
            item.category.label(),
            item.name,
            cost
        ));
        if let Some(memo) = &item.memo {
            output::line(format!("          {}", memo));
        }
    }
    let total = BudgetService::schedule_total(context.manager.book(), schedule.id);
    output::line(format!("  Total: {}", format_amount(total, context.currency())));
    Ok(())
}

fn edit_day(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    parsed.expect_only(&["title", "notes"])?;
    let day = parsed.day_number(0, "day edit <n> [--title TEXT] [--notes TEXT]")?;
    if !parsed.has("title") && !parsed.has("notes") {
        return Err(CommandError::usage(
            "day edit <n> [--title TEXT|none] [--notes TEXT|none]",
        ));
    }
    let plan_id = context.current_plan_id()?;
    let schedule = context.manager.schedule_by_day(plan_id, day)?;
    let schedule_id = schedule.id;
    let title = clear_or_keep(parsed.option("title"), schedule.title.as_deref());
    let notes = clear_or_keep(parsed.option("notes"), schedule.notes.as_deref());

    context
        .manager
        .update_schedule(schedule_id, title.as_deref(), notes.as_deref())?;
    output::success(format!("Day {} updated.", day));
    Ok(())
}

/// Given option wins; `none` clears; an absent option keeps the current value.
fn clear_or_keep(option: Option<&str>, current: Option<&str>) -> Option<String> {
    match option {
        Some(value) if value.trim().eq_ignore_ascii_case("none") => None,
        Some(value) => Some(value.to_string()),
        None => current.map(str::to_string),
    }
}

fn delete_day(context: &mut ShellContext, day: usize) -> CommandResult {
    let plan_id = context.current_plan_id()?;
    let schedule = context.manager.schedule_by_day(plan_id, day)?;
    let schedule_id = schedule.id;
    let items = context.manager.items(schedule_id).len();

    context.manager.delete_schedule(schedule_id)?;
    output::success(format!("Deleted day {} and {} item(s).", day, items));
    output::hint("The plan keeps its dates; editing them restores one day per date.");
    Ok(())
}
