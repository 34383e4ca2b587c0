use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    BudgetService, BudgetStatus, CascadeDeletion, Clock, CoreError, EntityStore, FixedClock,
    InMemoryStore, ItemDraft, ItemService, PlanDraft, PlanService, ScheduleService,
    ScheduleSynchronizer, ThemeColorCodec,
};
use tabi_domain::{
    inclusive_day_count, Entity, ItemCategory, Plan, PlanItem, Schedule, ThemeColor, TripBook,
    TripFilter, BLUE, DEFAULT_THEME_COLOR,
};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + Duration::days(offset)
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap()
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

/// A committed plan spanning `days` days with `items_per_day` costed items each.
fn seeded_book(days: i64, items_per_day: usize, cost: f64) -> (TripBook, Uuid) {
    let mut book = TripBook::new("Tests", now());
    let draft = PlanDraft::new("Hokkaido", day(0), day(days - 1));
    let created = PlanService::create(&draft, now()).expect("create plan");
    created.changes.apply_to(&mut book);
    let schedule_ids: Vec<Uuid> = book
        .schedules_for(created.id)
        .iter()
        .map(|schedule| schedule.id)
        .collect();
    for schedule_id in schedule_ids {
        for index in 0..items_per_day {
            let item = PlanItem::new(
                schedule_id,
                noon(),
                ItemCategory::Sightseeing,
                format!("Stop {index}"),
                now(),
            )
            .with_cost(cost);
            book.upsert(Entity::Item(item));
        }
    }
    (book, created.id)
}

fn plan_of(book: &TripBook, plan_id: Uuid) -> Plan {
    book.plan(plan_id).cloned().expect("plan exists")
}

#[test]
fn synchronize_yields_contiguous_days_for_many_ranges() {
    let plan_id = Uuid::new_v4();
    for length in 0..40 {
        let start = day(length * 3);
        let end = start + Duration::days(length);
        let sync =
            ScheduleSynchronizer::synchronize(plan_id, std::iter::empty(), start, end, now())
                .expect("valid range");
        let dates: Vec<NaiveDate> = sync.ordered().map(|schedule| schedule.date).collect();
        assert_eq!(dates.len() as i64, length + 1);
        for (index, date) in dates.iter().enumerate() {
            assert_eq!(*date, start + Duration::days(index as i64));
        }
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(sync.day_count(), inclusive_day_count(start, end));
    }
}

#[test]
fn single_day_range_yields_one_schedule() {
    let sync = ScheduleSynchronizer::synchronize(
        Uuid::new_v4(),
        std::iter::empty(),
        day(4),
        day(4),
        now(),
    )
    .expect("same-day range");
    assert_eq!(sync.day_count(), 1);
    assert_eq!(sync.created[0].title.as_deref(), Some("Day 1"));
}

#[test]
fn synchronize_is_idempotent() {
    let plan_id = Uuid::new_v4();
    let first =
        ScheduleSynchronizer::synchronize(plan_id, std::iter::empty(), day(0), day(5), now())
            .expect("first");
    let current: Vec<Schedule> = first.ordered().cloned().collect();
    let second = ScheduleSynchronizer::synchronize(plan_id, &current, day(0), day(5), now())
        .expect("second");
    assert!(second.is_noop());
    assert_eq!(second.kept, current);
}

#[test]
fn shrinking_keeps_leading_days_and_their_items() {
    let (book, plan_id) = seeded_book(5, 2, 100.0);
    let original: Vec<Schedule> = book
        .schedules_for(plan_id)
        .into_iter()
        .cloned()
        .collect();

    let sync = ScheduleSynchronizer::for_plan(&book, plan_id, day(0), day(2), now())
        .expect("shrink");
    assert_eq!(sync.kept, original[..3].to_vec());
    assert_eq!(sync.to_delete, original[3..].to_vec());
    assert!(sync.created.is_empty());

    let mut after = book.clone();
    ScheduleSynchronizer::to_changes(&book, &sync).apply_to(&mut after);
    assert_eq!(after.schedules_for(plan_id).len(), 3);
    for schedule in &original[..3] {
        assert_eq!(after.items_for(schedule.id).len(), 2);
    }
    assert_eq!(after.items_for_plan(plan_id).len(), 6);
    assert!(after.orphans().is_empty());
}

#[test]
fn growing_appends_empty_days_after_existing_ones() {
    let (book, plan_id) = seeded_book(2, 1, 0.0);
    let original: Vec<Schedule> = book
        .schedules_for(plan_id)
        .into_iter()
        .cloned()
        .collect();

    let sync =
        ScheduleSynchronizer::for_plan(&book, plan_id, day(0), day(3), now()).expect("grow");
    assert_eq!(sync.kept, original);
    assert!(sync.restamped.is_empty());
    assert_eq!(sync.created.len(), 2);
    assert_eq!(sync.created[0].date, day(2));
    assert_eq!(sync.created[1].date, day(3));
    assert_eq!(sync.created[0].title.as_deref(), Some("Day 3"));
    assert_eq!(sync.created[1].title.as_deref(), Some("Day 4"));
    for schedule in &sync.created {
        assert!(book.items_for(schedule.id).is_empty());
    }
}

#[test]
fn inverted_range_changes_nothing() {
    let (book, plan_id) = seeded_book(3, 1, 0.0);
    let draft = PlanDraft::from_plan(&plan_of(&book, plan_id));
    let inverted = PlanDraft {
        start_date: day(5),
        end_date: day(1),
        ..draft
    };
    let err = PlanService::edit(&book, plan_id, &inverted, now()).expect_err("inverted");
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn editing_plan_range_preserves_custom_titles() {
    let (mut book, plan_id) = seeded_book(3, 1, 0.0);
    let first = book.schedules_for(plan_id)[0].id;
    ScheduleService::update_details(&book, first, Some("Arrival"), Some("Check in early"), now())
        .expect("rename day")
        .apply_to(&mut book);

    let draft = PlanDraft {
        start_date: day(10),
        end_date: day(13),
        ..PlanDraft::from_plan(&plan_of(&book, plan_id))
    };
    let edit = PlanService::edit(&book, plan_id, &draft, now()).expect("edit");
    edit.changes.apply_to(&mut book);

    let schedules = book.schedules_for(plan_id);
    assert_eq!(schedules.len(), 4);
    assert_eq!(schedules[0].id, first);
    assert_eq!(schedules[0].title.as_deref(), Some("Arrival"));
    assert_eq!(schedules[0].date, day(10));
    assert_eq!(schedules[3].title.as_deref(), Some("Day 4"));
    assert_eq!(plan_of(&book, plan_id).start_date, day(10));
}

#[test]
fn budget_figures_follow_item_costs() {
    let mut book = TripBook::new("Budget", now());
    let created = PlanService::create(
        &PlanDraft::new("Okinawa", day(0), day(2)).with_budget(Some(10_000.0)),
        now(),
    )
    .expect("create");
    created.changes.apply_to(&mut book);
    let schedules: Vec<Uuid> = book
        .schedules_for(created.id)
        .iter()
        .map(|schedule| schedule.id)
        .collect();
    for (schedule_id, cost) in [(schedules[0], 3000.0), (schedules[2], 2000.0)] {
        let draft = ItemDraft::new("Ferry")
            .category(ItemCategory::Transport)
            .cost(Some(cost));
        ItemService::add(&book, schedule_id, &draft, now())
            .expect("add item")
            .changes
            .apply_to(&mut book);
    }
    // An uncosted item counts as zero.
    ItemService::add(&book, schedules[1], &ItemDraft::new("Walk"), now())
        .expect("add item")
        .changes
        .apply_to(&mut book);

    let plan = plan_of(&book, created.id);
    assert_eq!(BudgetService::used_budget(&book, &plan), 5000.0);
    assert_eq!(BudgetService::usage_percentage(&book, &plan), Some(50.0));
    assert_eq!(BudgetService::remaining_budget(&book, &plan), Some(5000.0));

    let summary = BudgetService::summarize(&book, &plan);
    assert_eq!(summary.status, BudgetStatus::UnderBudget);
    let per_day: Vec<f64> = summary.per_day.iter().map(|total| total.total).collect();
    assert_eq!(per_day, vec![3000.0, 0.0, 2000.0]);
    assert_eq!(summary.per_category.len(), 2);
    assert_eq!(summary.per_category[0].category, ItemCategory::Transport);
    assert_eq!(summary.per_category[0].total, 5000.0);

    let json = serde_json::to_value(&summary).expect("serialize summary");
    assert_eq!(json["status"], "UnderBudget");

    let mut unbudgeted = plan.clone();
    unbudgeted.budget = None;
    assert_eq!(BudgetService::used_budget(&book, &unbudgeted), 5000.0);
    assert_eq!(BudgetService::usage_percentage(&book, &unbudgeted), None);
    assert_eq!(BudgetService::remaining_budget(&book, &unbudgeted), None);
}

#[test]
fn zero_budget_has_remaining_but_no_percentage() {
    let (book, plan_id) = seeded_book(1, 1, 1200.0);
    let mut plan = plan_of(&book, plan_id);
    plan.budget = Some(0.0);
    assert_eq!(BudgetService::usage_percentage(&book, &plan), None);
    assert_eq!(BudgetService::remaining_budget(&book, &plan), Some(-1200.0));
    assert_eq!(
        BudgetService::summarize(&book, &plan).status,
        BudgetStatus::OverBudget
    );
}

#[test]
fn empty_plan_uses_nothing() {
    let mut book = TripBook::new("Empty", now());
    let plan = Plan::new("Nowhere", day(0), day(0), now());
    book.upsert(Entity::Plan(plan.clone()));
    assert_eq!(BudgetService::used_budget(&book, &plan), 0.0);
}

#[test]
fn deleting_plan_cascades_to_every_descendant() {
    let (mut book, plan_id) = seeded_book(3, 2, 10.0);
    let (other_book, other_id) = seeded_book(2, 1, 10.0);
    for entity in other_book
        .plans
        .into_iter()
        .map(Entity::Plan)
        .chain(other_book.schedules.into_iter().map(Entity::Schedule))
        .chain(other_book.items.into_iter().map(Entity::Item))
    {
        book.upsert(entity);
    }
    assert_eq!(book.items_for_plan(plan_id).len(), 6);

    let changes = PlanService::delete(&book, plan_id).expect("delete plan");
    assert_eq!(changes.len(), 3 * 2 + 3 + 1);
    changes.apply_to(&mut book);

    assert!(book.plan(plan_id).is_none());
    assert!(book.schedules_for(plan_id).is_empty());
    assert!(book.items_for_plan(plan_id).is_empty());
    assert!(book.schedules.iter().all(|s| s.plan_id != plan_id));
    assert_eq!(book.schedules_for(other_id).len(), 2);
    assert_eq!(book.items.len(), 2);
    assert!(book.orphans().is_empty());
}

#[test]
fn deleting_an_item_leaves_its_day() {
    let (mut book, plan_id) = seeded_book(1, 2, 0.0);
    let schedule_id = book.schedules_for(plan_id)[0].id;
    let item_id = book.items_for(schedule_id)[0].id;
    CascadeDeletion::item(&book, item_id)
        .expect("delete item")
        .apply_to(&mut book);
    assert_eq!(book.items_for(schedule_id).len(), 1);
    assert!(book.schedule(schedule_id).is_some());
}

#[test]
fn theme_color_round_trips_for_any_theme_name() {
    let samples = [
        ThemeColor::rgba(0, 0, 0, 0),
        ThemeColor::rgb(255, 255, 255),
        ThemeColor::rgba(12, 200, 99, 128),
        DEFAULT_THEME_COLOR,
    ];
    for color in samples {
        let blob = ThemeColorCodec::encode(color);
        for theme in ["Sea", "Unknown", ""] {
            assert_eq!(ThemeColorCodec::decode(Some(blob.as_slice()), theme), color);
        }
    }
}

#[test]
fn theme_color_falls_back_to_preset_then_default() {
    assert_eq!(ThemeColorCodec::decode(None, "Sea"), BLUE);
    assert_eq!(
        ThemeColorCodec::decode(Some(&[0xde, 0xad, 0xbe, 0xef, 0x00][..]), "Unknown"),
        DEFAULT_THEME_COLOR
    );
    assert_eq!(ThemeColorCodec::decode(Some(&[][..]), "Sea"), BLUE);
}

#[test]
fn plan_color_survives_create_and_edit() {
    let mut book = TripBook::new("Colors", now());
    let custom = ThemeColor::rgb(10, 20, 30);
    let created = PlanService::create(
        &PlanDraft::new("Nara", day(0), day(0))
            .with_theme("Sea")
            .with_color(custom),
        now(),
    )
    .expect("create");
    created.changes.apply_to(&mut book);
    let plan = plan_of(&book, created.id);
    assert_eq!(ThemeColorCodec::resolve(&plan), custom);
    assert_eq!(PlanDraft::from_plan(&plan).theme_color, Some(custom));
}

#[test]
fn listing_filters_by_end_date_and_sorts_newest_first() {
    let mut book = TripBook::new("List", now());
    let clock = FixedClock::at_date(day(10));
    let entries = [
        ("Past", day(0), day(2), 1),
        ("Ongoing", day(8), day(10), 2),
        ("Future", day(20), day(21), 3),
    ];
    for (title, start, end, minutes) in entries {
        let created = PlanService::create(
            &PlanDraft::new(title, start, end),
            now() + Duration::minutes(minutes),
        )
        .expect("create");
        created.changes.apply_to(&mut book);
    }
    let titles = |filter| -> Vec<String> {
        PlanService::list(&book, filter, clock.today())
            .into_iter()
            .map(|plan| plan.title.clone())
            .collect()
    };
    assert_eq!(titles(TripFilter::Upcoming), vec!["Future", "Ongoing"]);
    assert_eq!(titles(TripFilter::Past), vec!["Past"]);
    assert_eq!(titles(TripFilter::All), vec!["Future", "Ongoing", "Past"]);
}

#[test]
fn item_toggle_and_edit_update_the_record() {
    let (mut book, plan_id) = seeded_book(1, 1, 500.0);
    let schedule_id = book.schedules_for(plan_id)[0].id;
    let item_id = book.items_for(schedule_id)[0].id;

    ItemService::toggle(&book, item_id, now())
        .expect("toggle")
        .apply_to(&mut book);
    assert!(book.item(item_id).unwrap().is_completed);
    assert!(ItemService::set_completed(&book, item_id, true, now())
        .expect("no-op")
        .is_empty());

    let mut draft = ItemDraft::from_item(book.item(item_id).unwrap());
    draft.name = "Evening market".into();
    draft.cost = None;
    ItemService::edit(&book, item_id, &draft, now())
        .expect("edit")
        .apply_to(&mut book);
    let item = book.item(item_id).unwrap();
    assert_eq!(item.name, "Evening market");
    assert_eq!(item.cost, None);
    assert!(item.is_completed);
}

#[test]
fn items_need_an_existing_schedule() {
    let book = TripBook::new("Orphans", now());
    let missing = Uuid::new_v4();
    let err = ItemService::add(&book, missing, &ItemDraft::new("Tea"), now())
        .expect_err("missing schedule");
    assert!(matches!(err, CoreError::ScheduleNotFound(id) if id == missing));
}

#[test]
fn failed_save_keeps_changes_staged_until_discarded() {
    let mut store = InMemoryStore::empty("Store");
    let created = PlanService::create(&PlanDraft::new("Sapporo", day(0), day(1)), now())
        .expect("create");
    store.stage(&created.changes);
    store.set_fail_saves(true);

    let err = store.save().expect_err("save rejected");
    assert!(err.is_persistence());
    assert_eq!(store.pending(), 3);
    assert!(store.load().expect("load").plans.is_empty());

    store.discard();
    assert_eq!(store.pending(), 0);
    store.set_fail_saves(false);
    store.stage(&created.changes);
    store.save().expect("save accepted");
    assert_eq!(store.commits(), 1);
    assert_eq!(store.committed().schedules_for(created.id).len(), 2);
}
