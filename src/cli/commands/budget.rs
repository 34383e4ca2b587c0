use crate::cli::args::ParsedArgs;
use crate::cli::core::CommandResult;
use crate::cli::format::{
    format_amount, format_day, format_percent, progress_bar, status_label,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Show spending against a plan's budget",
        "budget [plan-id]",
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args);
    parsed.expect_only(&[])?;
    let plan_id = context.resolve_plan(parsed.positional(0))?;
    let plan = context.manager.plan(plan_id)?;
    let summary = context.manager.budget_summary(plan_id)?;
    let currency = context.currency();

    output::section(format!("Budget: {}", plan.title));
    match (summary.budget, summary.remaining) {
        (Some(budget), Some(remaining)) => {
            output::line(format!("  Budget    : {}", format_amount(budget, currency)));
            output::line(format!("  Used      : {}", format_amount(summary.used, currency)));
            output::line(format!("  Remaining : {}", format_amount(remaining, currency)));
            output::line(format!(
                "  Usage     : {} {} ({})",
                progress_bar(summary.percent_used, 20),
                format_percent(summary.percent_used),
                status_label(summary.status)
            ));
            if remaining < 0.0 {
                output::warning(format!(
                    "Over budget by {}.",
                    format_amount(-remaining, currency)
                ));
            }
        }
        _ => {
            output::line(format!("  Used      : {}", format_amount(summary.used, currency)));
            output::info("No budget set. Use `plan edit --budget <amount>` to add one.");
        }
    }

    output::line("  Per day:");
    for (index, day) in summary.per_day.iter().enumerate() {
        output::line(format!(
            "    {:>2}. {:<12} {}",
            index + 1,
            format_day(day.date, context.locale()),
            format_amount(day.total, currency)
        ));
    }
    if !summary.per_category.is_empty() {
        output::line("  Per category:");
        for category in &summary.per_category {
            output::line(format!(
                "    {:<12} {:>3} item(s)  {}",
                category.category.label(),
                category.items,
                format_amount(category.total, currency)
            ));
        }
    }
    Ok(())
}
