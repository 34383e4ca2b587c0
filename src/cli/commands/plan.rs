use tabi_core::{PlanDraft, ScheduleSync};
use tabi_domain::{icon_for_theme, short_id, Displayable, ThemePreset, TripFilter};
use uuid::Uuid;

use crate::cli::args::ParsedArgs;
use crate::cli::commands::{optional_text, parse_amount, parse_color};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::format::{
    format_amount, format_day, format_percent, format_range, parse_date, status_label,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "plan new <title> <start> <end> [--budget N] [--theme NAME] [--color RRGGBB] [--memo TEXT] [--tz ZONE]
plan list [upcoming|past|all]
plan open <id>
plan show [id]
plan edit [id] [--title T] [--start D] [--end D] [--budget N|none] [--theme NAME] [--color RRGGBB|none] [--memo TEXT] [--tz ZONE] [--force]
plan delete [id]";

const DRAFT_OPTIONS: [&str; 6] = ["budget", "theme", "color", "memo", "tz", "title"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "plan",
        "Create, browse, and edit trip plans",
        USAGE,
        cmd_plan,
    )]
}

fn cmd_plan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        return list_plans(context, TripFilter::Upcoming);
    };
    let parsed = ParsedArgs::parse(rest);
    match sub.to_lowercase().as_str() {
        "new" | "create" => create_plan(context, &parsed),
        "list" | "ls" => {
            let filter = match parsed.positional(0) {
                Some(value) => TripFilter::parse(value).ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "unknown filter `{value}`; expected upcoming, past, or all"
                    ))
                })?,
                None => TripFilter::Upcoming,
            };
            list_plans(context, filter)
        }
        "open" => {
            let key = parsed.require(0, "plan open <id>")?;
            let plan_id = context.resolve_plan(Some(key))?;
            context.current_plan = Some(plan_id);
            let plan = context.manager.plan(plan_id)?;
            output::success(format!("Opened `{}`.", plan.title));
            Ok(())
        }
        "show" => {
            let plan_id = context.resolve_plan(parsed.positional(0))?;
            show_plan(context, plan_id)
        }
        "edit" => edit_plan(context, &parsed),
        "delete" | "rm" => {
            let plan_id = context.resolve_plan(parsed.positional(0))?;
            delete_plan(context, plan_id)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown plan action `{other}`"
        ))),
    }
}

fn create_plan(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    const NEW_USAGE: &str = "plan new <title> <start> <end> [--budget N] [--theme NAME]";
    parsed.expect_only(&DRAFT_OPTIONS)?;
    let title = parsed.require(0, NEW_USAGE)?;
    let start = parse_date(parsed.require(1, NEW_USAGE)?)?;
    let end = parse_date(parsed.require(2, NEW_USAGE)?)?;

    let mut draft = PlanDraft::new(title, start, end)
        .with_theme(context.config.default_theme.clone())
        .with_time_zone(context.config.default_time_zone.clone());
    apply_draft_options(&mut draft, parsed)?;

    let plan_id = context.manager.create_plan(&draft)?;
    context.current_plan = Some(plan_id);
    let days = context.manager.schedules(plan_id).len();
    output::success(format!(
        "Plan `{}` created with {} day(s) [{}].",
        draft.title.trim(),
        days,
        short_id(plan_id)
    ));
    Ok(())
}

/// Copies `--budget`, `--theme`, `--color`, `--memo`, `--tz`, and `--title` onto `draft`.
fn apply_draft_options(draft: &mut PlanDraft, parsed: &ParsedArgs) -> CommandResult {
    if let Some(title) = parsed.option("title") {
        draft.title = title.to_string();
    }
    if let Some(budget) = parsed.option("budget") {
        draft.budget = parse_amount(budget, "budget")?;
    }
    if let Some(theme) = parsed.option("theme") {
        draft.theme_name = ThemePreset::find_loose(theme)
            .map(|preset| preset.name.to_string())
            .unwrap_or_else(|| theme.trim().to_string());
        // A new theme brings its own accent unless one is given explicitly.
        draft.theme_color = None;
    }
    if let Some(color) = parsed.option("color") {
        draft.theme_color = parse_color(color)?;
    }
    if let Some(memo) = parsed.option("memo") {
        draft.memo = optional_text(memo);
    }
    if let Some(zone) = parsed.option("tz") {
        draft.time_zone = optional_text(zone);
    }
    Ok(())
}

fn list_plans(context: &ShellContext, filter: TripFilter) -> CommandResult {
    let plans = context.manager.list_plans(filter);
    output::section(format!("{} plans", filter));
    if plans.is_empty() {
        output::info("No plans yet. Create one with `plan new <title> <start> <end>`.");
        return Ok(());
    }
    for plan in plans {
        let marker = if context.current_plan == Some(plan.id) {
            "*"
        } else {
            " "
        };
        output::line(format!("{marker} {}  {}", short_id(plan.id), plan.display_label()));
    }
    Ok(())
}

fn show_plan(context: &ShellContext, plan_id: Uuid) -> CommandResult {
    let plan = context.manager.plan(plan_id)?;
    let color = context.manager.plan_color(plan_id)?;
    let summary = context.manager.budget_summary(plan_id)?;
    let currency = context.currency();

    output::section(&plan.title);
    output::line(format!("  Id        : {}", plan.id));
    output::line(format!(
        "  Dates     : {} ({} day(s))",
        format_range(plan.start_date, plan.end_date),
        plan.day_count()
    ));
    output::line(format!(
        "  Theme     : {} ({}, {})",
        plan.theme_name,
        icon_for_theme(&plan.theme_name),
        color
    ));
    output::line(format!("  Time zone : {}", plan.time_zone));
    match summary.budget {
        Some(budget) => output::line(format!(
            "  Budget    : {} used of {} ({}, {})",
            format_amount(summary.used, currency),
            format_amount(budget, currency),
            format_percent(summary.percent_used),
            status_label(summary.status)
        )),
        None => output::line(format!(
            "  Spent     : {} (no budget)",
            format_amount(summary.used, currency)
        )),
    }
    if let Some(memo) = &plan.memo {
        output::line(format!("  Memo      : {}", memo));
    }

    output::line("  Days:");
    for (index, schedule) in context.manager.schedules(plan_id).into_iter().enumerate() {
        let items = context.manager.items(schedule.id);
        let done = items.iter().filter(|item| item.is_completed).count();
        output::line(format!(
            "    {:>2}. {:<12} {:<20} {}/{} done",
            index + 1,
            format_day(schedule.date, context.locale()),
            schedule.title.as_deref().unwrap_or(""),
            done,
            items.len()
        ));
    }
    Ok(())
}

fn edit_plan(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    let mut allowed = DRAFT_OPTIONS.to_vec();
    allowed.extend(["start", "end", "force"]);
    parsed.expect_only(&allowed)?;

    let plan_id = context.resolve_plan(parsed.positional(0))?;
    let mut draft = PlanDraft::from_plan(context.manager.plan(plan_id)?);
    if let Some(start) = parsed.option("start") {
        draft.start_date = parse_date(start)?;
    }
    if let Some(end) = parsed.option("end") {
        draft.end_date = parse_date(end)?;
    }
    apply_draft_options(&mut draft, parsed)?;

    if draft.end_date >= draft.start_date && !parsed.has("force") {
        let preview = context
            .manager
            .preview_dates(plan_id, draft.start_date, draft.end_date)?;
        let doomed: usize = preview
            .to_delete
            .iter()
            .map(|schedule| context.manager.items(schedule.id).len())
            .sum();
        if doomed > 0 {
            return Err(CommandError::InvalidArguments(format!(
                "new dates drop {} day(s) holding {} item(s); rerun with --force",
                preview.to_delete.len(),
                doomed
            )));
        }
    }

    let sync = context.manager.edit_plan(plan_id, &draft)?;
    output::success(format!("Plan `{}` updated.", draft.title.trim()));
    report_sync(&sync);
    Ok(())
}

fn report_sync(sync: &ScheduleSync) {
    if sync.is_noop() {
        return;
    }
    output::info(format!(
        "Days now {}: {} kept, {} added, {} removed, {} re-dated.",
        sync.day_count(),
        sync.kept.len(),
        sync.created.len(),
        sync.to_delete.len(),
        sync.restamped.len()
    ));
}

fn delete_plan(context: &mut ShellContext, plan_id: Uuid) -> CommandResult {
    let plan = context.manager.plan(plan_id)?;
    let title = plan.title.clone();
    let days = context.manager.schedules(plan_id).len();
    let items = context.manager.book().items_for_plan(plan_id).len();

    context.manager.delete_plan(plan_id)?;
    if context.current_plan == Some(plan_id) {
        context.current_plan = None;
    }
    output::success(format!(
        "Deleted `{}` with {} day(s) and {} item(s).",
        title, days, items
    ));
    Ok(())
}
