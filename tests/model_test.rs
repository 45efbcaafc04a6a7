use cheatsheeter::model::{Cheatsheet, SheetList, format_name};

#[test]
fn test_format_name() {
    assert_eq!(format_name("git-basics"), "Git Basics");
    assert_eq!(format_name("vim_motions"), "Vim Motions");
    assert_eq!(format_name("k8s-cheat_sheet"), "K8s Cheat Sheet");
    assert_eq!(format_name("already Fine"), "Already Fine");
    assert_eq!(format_name(""), "");
}

#[test]
fn test_get_response_ignores_duplicated_top_level_fields() {
    let body = r#"{
        "name": "git-basics",
        "columns": 2,
        "categories": [],
        "data": {
            "title": "Git Basics",
            "columns": 2,
            "categories": [
                {"name": "Setup", "column": 1,
                 "items": [{"command": "git init", "description": "Initialize repo"}]}
            ]
        }
    }"#;

    let sheet: Cheatsheet = serde_json::from_str(body).unwrap();
    assert_eq!(sheet.name, "git-basics");
    assert_eq!(sheet.data.title, "Git Basics");
    assert_eq!(sheet.data.columns, 2);
    assert_eq!(sheet.data.categories.len(), 1);
    assert_eq!(sheet.data.categories[0].items[0].command, "git init");
}

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    let sheet: Cheatsheet =
        serde_json::from_str(r#"{"name": "bare", "data": {"categories": [{"name": "A"}]}}"#)
            .unwrap();

    assert_eq!(sheet.data.title, "");
    assert_eq!(sheet.data.columns, 1);
    assert_eq!(sheet.data.categories[0].column, 1);
    assert!(sheet.data.categories[0].items.is_empty());

    let sheet: Cheatsheet = serde_json::from_str(r#"{"name": "empty"}"#).unwrap();
    assert_eq!(sheet.data.columns, 1);

    let list: SheetList = serde_json::from_str("{}").unwrap();
    assert!(list.cheatsheets.is_empty());
}

#[test]
fn test_serializes_data_in_wire_shape() {
    let sheet: Cheatsheet = serde_json::from_str(
        r#"{"name": "x", "data": {"title": "X", "columns": 3, "categories": []}}"#,
    )
    .unwrap();

    let json = serde_json::to_value(&sheet.data).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"title": "X", "columns": 3, "categories": []})
    );
}
