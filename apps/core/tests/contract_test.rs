use devtools_showcase_core::contract::{ProgressSnapshot, ToolCard};
use devtools_showcase_core::model::{Category, Tool};
use devtools_showcase_core::progress::ProgressState;

#[test]
fn tool_card_carries_display_fields() {
    let tool = Tool::new(
        "memory-profiler",
        "Memory Profiler",
        "Find leaks",
        Category::Debug,
        71,
    )
    .with_downloads(43_920)
    .with_last_update("2024-01-30");

    let card = ToolCard::from(&tool);
    assert_eq!(card.popularity_label, "71% Popular");
    assert_eq!(card.install_command, "npm install @devtools/memory-profiler");
    assert_eq!(card.downloads, 43_920);
    assert_eq!(card.downloads_label, "43,920 downloads");
    assert_eq!(card.last_update, "2024-01-30");
}

#[test]
fn tool_card_serializes_category_as_tag() {
    let tool = Tool::new("x", "X", "", Category::Build, 10);
    let value = serde_json::to_value(ToolCard::from(&tool)).unwrap();
    assert_eq!(value["category"], "build");
    assert_eq!(value["install_command"], "npm install @devtools/x");
}

#[test]
fn progress_snapshot_json_shape() {
    let snapshot = ProgressSnapshot::from(ProgressState {
        running: true,
        percent: 42,
    });
    let json = serde_json::to_string(&snapshot).unwrap();
    assert_eq!(json, r#"{"running":true,"percent":42}"#);

    let parsed: ProgressSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}
