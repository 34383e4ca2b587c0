mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tabi_config::model::HOME_ENV;
use tabi_shiori::cli::SCRIPT_ENV;

fn run_script(home: &std::path::Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("tabi_cli")
        .expect("binary built")
        .env(SCRIPT_ENV, "1")
        .env(HOME_ENV, home)
        .env_remove("RUST_LOG")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_builds_an_itinerary() {
    let home = common::temp_base();
    let input = "\
plan new Kyoto 2099-04-10 2099-04-12 --budget 30000 --theme sea
item add 2 \"Kaiseki dinner\" --time 18:30 --category meal --cost 12000
item add 2 Temple --time 09:00 --category sightseeing --cost 600
item done 2 1
day show 2
budget
exit
";
    run_script(&home, input)
        .success()
        .stdout(contains("Plan `Kyoto` created with 3 day(s)"))
        .stdout(contains("09:00"))
        .stdout(contains("Kaiseki dinner"))
        .stdout(contains("¥12,600"))
        .stdout(contains("¥17,400"))
        .stdout(contains("42.0%"));

    let book = std::fs::read_to_string(home.join("books").join("trips.json")).expect("book file");
    assert!(book.contains("\"Kyoto\""));
    assert!(book.contains("\"Sea\""));
}

#[test]
fn script_mode_reports_usage_errors_and_keeps_going() {
    let home = common::temp_base();
    let input = "\
plan new Broken 2099-05-02 2099-05-01
plna list
day list
plan new Fixed 2099-05-01 2099-05-02
exit
";
    run_script(&home, input)
        .success()
        .stdout(contains("end date 2099-05-01 is before start date 2099-05-02"))
        .stdout(contains("Suggestion: `plan`?"))
        .stdout(contains("No plan is open"))
        .stdout(contains("Plan `Fixed` created with 2 day(s)"));
}

#[test]
fn config_and_books_persist_between_runs() {
    let home = common::temp_base();
    run_script(
        &home,
        "config set output_style plain\nbook open family\nplan new Okinawa 2099-07-01 2099-07-03\n",
    )
    .success()
    .stdout(contains("output_style = plain"));

    run_script(&home, "plan list\nbook info\n")
        .success()
        .stdout(contains("Okinawa              2099/07/01 ~ 2099/07/03  3 day(s)"))
        .stdout(contains("Book: family"))
        .stdout(contains("[✓]").not());
}

#[test]
fn help_lists_every_command() {
    let home = common::temp_base();
    let assert = run_script(&home, "help\nhelp item\n").success();
    for name in ["plan", "day", "item", "budget", "theme", "book", "config", "exit"] {
        assert_stdout_has(&assert, name);
    }
    assert.stdout(contains("item add <day> <name>"));
}

fn assert_stdout_has(assert: &assert_cmd::assert::Assert, needle: &str) {
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains(needle), "missing `{needle}` in\n{stdout}");
}
