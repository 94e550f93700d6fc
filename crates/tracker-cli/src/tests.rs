use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

use clap_complete::Shell;
use tempfile::TempDir;
use tracker_core::models::{SYSTEM_BUG, SYSTEM_PLANNER_ITEM};
use tracker_core::{SpaceId, WorkItem, WorkItemState, WorkItemTypeId};

use crate::commands::common::{
    format_item_lines, format_relative_time, item_title_preview, normalize_title, parse_id,
    resolve_db_path,
};
use crate::commands::completions::render_completions;
use crate::commands::item::{add_item, run_item_delete};
use crate::commands::search::{search_items, SearchArgs};
use crate::commands::types::add_type;
use crate::error::CliError;

fn temp_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tracker.db");
    (dir, path)
}

fn search_args(query: &str) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        limit: None,
        offset: None,
        timeout_ms: None,
        json: false,
    }
}

fn title(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[test]
fn normalize_title_joins_and_trims() {
    let parts = vec!["  Fix".to_string(), "login ".to_string()];
    assert_eq!(normalize_title(&parts).unwrap(), "Fix login");
}

#[test]
fn normalize_title_rejects_blank() {
    assert!(matches!(
        normalize_title(&[" \t ".to_string()]),
        Err(CliError::EmptyTitle)
    ));
    assert!(matches!(normalize_title(&[]), Err(CliError::EmptyTitle)));
}

#[test]
fn parse_id_rejects_empty_and_malformed() {
    assert!(matches!(
        parse_id::<WorkItemTypeId>("  "),
        Err(CliError::EmptyId)
    ));
    assert!(matches!(
        parse_id::<WorkItemTypeId>("not-a-uuid"),
        Err(CliError::InvalidId(raw)) if raw == "not-a-uuid"
    ));
    let parsed = parse_id::<WorkItemTypeId>(&format!(" {SYSTEM_BUG} ")).unwrap();
    assert_eq!(parsed, SYSTEM_BUG);
}

#[test]
fn resolve_db_path_prefers_explicit_flag() {
    let explicit = PathBuf::from("/tmp/explicit.db");
    assert_eq!(resolve_db_path(Some(explicit.clone())), explicit);
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60_000, now), "3d ago");
    assert_eq!(format_relative_time(now - 14 * 24 * 60 * 60_000, now), "2w ago");
}

#[test]
fn format_relative_time_clamps_future_timestamps() {
    assert_eq!(format_relative_time(2_000, 1_000), "just now");
}

#[test]
fn item_title_preview_truncates_with_ellipsis() {
    let item = WorkItem::new(
        SpaceId::SYSTEM,
        SYSTEM_BUG,
        "This is a very long sentence that should be shortened",
        "",
        WorkItemState::New,
    );
    assert_eq!(item_title_preview(&item, 20), "This is a very lo...");
}

#[test]
fn format_item_lines_pads_state_column() {
    let item = WorkItem::new(
        SpaceId::SYSTEM,
        SYSTEM_BUG,
        "Crash on save",
        "",
        WorkItemState::Open,
    );
    let lines = format_item_lines(&[item]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Crash on save"));
    assert!(lines[0].contains("open         just now"));
}

#[test]
fn completions_name_the_tracker_binary() {
    let script = String::from_utf8(render_completions(Shell::Bash)).unwrap();
    assert!(script.contains("tracker"));
    assert!(script.contains("search"));
}

#[test]
fn completions_render_for_every_supported_shell() {
    for shell in [
        Shell::Bash,
        Shell::Zsh,
        Shell::Fish,
        Shell::Elvish,
        Shell::PowerShell,
    ] {
        assert!(!render_completions(shell).is_empty(), "{shell} rendered nothing");
    }
    let zsh = String::from_utf8(render_completions(Shell::Zsh)).unwrap();
    assert!(zsh.starts_with("#compdef tracker"));
}

#[test]
fn add_item_rejects_unknown_state_before_touching_storage() {
    let (_dir, db_path) = temp_db();
    let result = add_item(
        &SYSTEM_BUG.to_string(),
        &title("Broken"),
        "",
        "done",
        &db_path,
    );
    assert!(matches!(result, Err(CliError::Core(_))));
    assert!(!db_path.exists());
}

#[test]
fn add_type_extends_an_existing_parent() {
    let (_dir, db_path) = temp_db();
    let parent = SYSTEM_PLANNER_ITEM.to_string();
    let wit = add_type("Spike", Some(&parent), "fa-bolt", &db_path).unwrap();
    assert_eq!(wit.parent_id, Some(SYSTEM_PLANNER_ITEM));
    assert_eq!(wit.name, "Spike");
}

#[test]
fn add_type_rejects_malformed_parent() {
    let (_dir, db_path) = temp_db();
    assert!(matches!(
        add_type("Spike", Some("nope"), "fa-bolt", &db_path),
        Err(CliError::InvalidId(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_items_scopes_results_to_type_subtree() {
    let (_dir, db_path) = temp_db();
    let bug = SYSTEM_BUG.to_string();
    let root = SYSTEM_PLANNER_ITEM.to_string();

    let regression = add_type("Regression", Some(&bug), "fa-bug", &db_path).unwrap();
    add_item(&bug, &title("login crash"), "", "open", &db_path).unwrap();
    sleep(Duration::from_millis(2));
    add_item(
        &regression.id.to_string(),
        &title("login regression"),
        "",
        "new",
        &db_path,
    )
    .unwrap();
    sleep(Duration::from_millis(2));
    add_item(&root, &title("login page copy"), "", "new", &db_path).unwrap();

    let everything = search_items(&search_args("login"), &db_path).await.unwrap();
    assert_eq!(everything.total_count, 3);

    let bugs_only = search_items(&search_args(&format!("login type:{bug}")), &db_path)
        .await
        .unwrap();
    assert_eq!(bugs_only.total_count, 2);
    let titles = bugs_only
        .items
        .iter()
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["login crash", "login regression"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_items_hides_deleted_items() {
    let (_dir, db_path) = temp_db();
    let bug = SYSTEM_BUG.to_string();

    let keep = add_item(&bug, &title("flaky export"), "", "new", &db_path).unwrap();
    sleep(Duration::from_millis(2));
    let gone = add_item(&bug, &title("flaky import"), "", "new", &db_path).unwrap();

    run_item_delete(&gone.id.to_string(), &db_path).unwrap();

    let result = search_items(&search_args("flaky"), &db_path).await.unwrap();
    assert_eq!(result.total_count, 1);
    assert_eq!(result.items[0].id, keep.id);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_items_applies_limit_and_offset() {
    let (_dir, db_path) = temp_db();
    let bug = SYSTEM_BUG.to_string();
    for index in 0..5 {
        add_item(&bug, &title(&format!("paging {index}")), "", "new", &db_path).unwrap();
        sleep(Duration::from_millis(2));
    }

    let args = SearchArgs {
        limit: Some(2),
        offset: Some(3),
        ..search_args("paging")
    };
    let page = search_items(&args, &db_path).await.unwrap();
    assert_eq!(page.total_count, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "paging 3");
    assert_eq!(page.items[1].title, "paging 4");
}

#[test]
fn run_item_delete_reports_missing_item() {
    let (_dir, db_path) = temp_db();
    let missing = tracker_core::WorkItemId::new().to_string();
    assert!(matches!(
        run_item_delete(&missing, &db_path),
        Err(CliError::Core(tracker_core::Error::NotFound(_)))
    ));
}
