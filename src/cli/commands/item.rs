use tabi_core::ItemDraft;
use tabi_domain::GeoPoint;
use uuid::Uuid;

use crate::cli::args::ParsedArgs;
use crate::cli::commands::{optional_text, parse_amount, parse_category};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::format::{format_time, parse_time};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "item add <day> <name> [--time HH:MM] [--category C] [--cost N] [--memo T] [--address A] [--url U] [--lat N --lon N]
item edit <day> <n> [--name T] [same options as add]
item done <day> <n>
item delete <day> <n>";

const ITEM_OPTIONS: [&str; 9] = [
    "time", "category", "cost", "memo", "address", "url", "lat", "lon", "name",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "item",
        "Add, edit, and check off a day's items",
        USAGE,
        cmd_item,
    )]
}

fn cmd_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        return Err(CommandError::usage("item <add|edit|done|delete> ..."));
    };
    let parsed = ParsedArgs::parse(rest);
    match sub.to_lowercase().as_str() {
        "add" | "new" => add_item(context, &parsed),
        "edit" => edit_item(context, &parsed),
        "done" | "toggle" => {
            let item_id = resolve_item(context, &parsed, "item done <day> <n>")?;
            let completed = context.manager.toggle_item(item_id)?;
            let name = item_name(context, item_id);
            if completed {
                output::success(format!("Checked off `{}`.", name));
            } else {
                output::info(format!("`{}` is open again.", name));
            }
            Ok(())
        }
        "delete" | "rm" => {
            let item_id = resolve_item(context, &parsed, "item delete <day> <n>")?;
            let name = item_name(context, item_id);
            context.manager.delete_item(item_id)?;
            output::success(format!("Deleted `{}`.", name));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown item action `{other}`"
        ))),
    }
}

fn add_item(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    const ADD_USAGE: &str = "item add <day> <name> [--time HH:MM] [--category C] [--cost N]";
    parsed.expect_only(&ITEM_OPTIONS)?;
    let day = parsed.day_number(0, ADD_USAGE)?;
    let name = parsed.require(1, ADD_USAGE)?;

    let plan_id = context.current_plan_id()?;
    let schedule_id = context.manager.schedule_by_day(plan_id, day)?.id;
    let mut draft = ItemDraft::new(name);
    apply_item_options(&mut draft, parsed)?;

    context.manager.add_item(schedule_id, &draft)?;
    output::success(format!(
        "Added `{}` at {} on day {}.",
        draft.name.trim(),
        format_time(draft.time),
        day
    ));
    Ok(())
}

fn edit_item(context: &mut ShellContext, parsed: &ParsedArgs) -> CommandResult {
    parsed.expect_only(&ITEM_OPTIONS)?;
    let item_id = resolve_item(context, parsed, "item edit <day> <n> [--name T] ...")?;
    let item = context
        .manager
        .book()
        .item(item_id)
        .ok_or_else(|| CommandError::Message("item disappeared".into()))?;
    let mut draft = ItemDraft::from_item(item);
    apply_item_options(&mut draft, parsed)?;

    context.manager.edit_item(item_id, &draft)?;
    output::success(format!("Updated `{}`.", draft.name.trim()));
    Ok(())
}

fn apply_item_options(draft: &mut ItemDraft, parsed: &ParsedArgs) -> CommandResult {
    if let Some(name) = parsed.option("name") {
        draft.name = name.to_string();
    }
    if let Some(time) = parsed.option("time") {
        draft.time = parse_time(time)?;
    }
    if let Some(category) = parsed.option("category") {
        draft.category = parse_category(category)?;
    }
    if let Some(cost) = parsed.option("cost") {
        draft.cost = parse_amount(cost, "cost")?;
    }
    if let Some(memo) = parsed.option("memo") {
        draft.memo = optional_text(memo);
    }
    if let Some(address) = parsed.option("address") {
        draft.address = optional_text(address);
    }
    if let Some(url) = parsed.option("url") {
        draft.url = optional_text(url);
    }
    match (parsed.option("lat"), parsed.option("lon")) {
        (Some(lat), Some(lon)) => {
            if optional_text(lat).is_none() && optional_text(lon).is_none() {
                draft.location = None;
            } else {
                let point = GeoPoint::new(parse_coordinate(lat)?, parse_coordinate(lon)?);
                draft.location = Some(point);
            }
        }
        (None, None) => {}
        _ => {
            return Err(CommandError::InvalidArguments(
                "--lat and --lon must be given together".into(),
            ))
        }
    }
    Ok(())
}

fn parse_coordinate(value: &str) -> Result<f64, CommandError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid coordinate `{value}`")))
}

/// Looks up the `n`-th item (1-based, in time order) of a day of the open plan.
fn resolve_item(
    context: &ShellContext,
    parsed: &ParsedArgs,
    usage: &str,
) -> Result<Uuid, CommandError> {
    let day = parsed.day_number(0, usage)?;
    let position = parsed.day_number(1, usage)?;
    let plan_id = context.current_plan_id()?;
    let schedule = context.manager.schedule_by_day(plan_id, day)?;
    let items = context.manager.items(schedule.id);
    items
        .get(position - 1)
        .map(|item| item.id)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "day {} has {} item(s); there is no item {}",
                day,
                items.len(),
                position
            ))
        })
}

fn item_name(context: &ShellContext, item_id: Uuid) -> String {
    context
        .manager
        .book()
        .item(item_id)
        .map(|item| item.name.clone())
        .unwrap_or_default()
}
