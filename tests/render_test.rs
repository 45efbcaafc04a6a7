mod common;

use cheatsheeter::model::{Cheatsheet, SheetData};
use cheatsheeter::render::{
    AlertKind, AlertView, Page, PageView, render_detail, render_list, render_page,
};
use common::{category, git_basics, item};

fn sheet_with(columns: u32, categories: Vec<cheatsheeter::model::Category>) -> Cheatsheet {
    Cheatsheet {
        name: "layout".to_string(),
        data: SheetData {
            title: "Layout".to_string(),
            columns,
            categories,
        },
    }
}

#[test]
fn test_groups_categories_by_column() {
    let sheet = sheet_with(
        3,
        vec![
            category("a", 1),
            category("b", 1),
            category("c", 2),
            category("d", 3),
        ],
    );

    let detail = render_detail(&sheet);
    assert_eq!(detail.bucket_sizes(), vec![2, 1, 1]);
    assert_eq!(
        detail.columns.iter().map(|c| c.index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    let first: Vec<_> = detail.columns[0]
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(first, vec!["a", "b"]);
    assert_eq!(detail.column_width, 4);
}

#[test]
fn test_out_of_range_columns_are_dropped() {
    let sheet = sheet_with(
        3,
        vec![category("kept", 2), category("too far", 5), category("zero", 0)],
    );

    let detail = render_detail(&sheet);
    assert_eq!(detail.bucket_sizes(), vec![0, 1, 0]);
    assert!(!detail.is_empty);
    assert!(!detail.to_html().contains("too far"));
}

#[test]
fn test_zero_columns_default_to_one() {
    let detail = render_detail(&sheet_with(0, vec![category("a", 1)]));
    assert_eq!(detail.bucket_sizes(), vec![1]);
    assert_eq!(detail.column_width, 12);
}

#[test]
fn test_oversized_column_count_is_capped() {
    let detail = render_detail(&sheet_with(
        u32::MAX,
        vec![category("first", 1), category("sixth", 6), category("far", 7)],
    ));
    assert_eq!(detail.bucket_sizes(), vec![1, 0, 0, 0, 0, 1]);
    assert_eq!(detail.column_width, 2);
    assert!(!detail.to_html().contains(">far<"));
}

#[test]
fn test_uneven_column_width_is_floored() {
    let detail = render_detail(&sheet_with(5, Vec::new()));
    assert_eq!(detail.column_width, 2);
    assert!(detail.to_html().contains(r#"class="col-md-2""#));
}

#[test]
fn test_empty_sheet_shows_placeholder() {
    let detail = render_detail(&sheet_with(2, Vec::new()));
    assert!(detail.is_empty);
    assert!(detail.to_html().contains("This cheatsheet has no categories yet."));
}

#[test]
fn test_title_falls_back_to_name() {
    let mut sheet = sheet_with(1, Vec::new());
    sheet.data.title.clear();
    assert_eq!(render_detail(&sheet).title, "layout");
}

#[test]
fn test_detail_markup_escapes_user_content() {
    let mut evil = category("<b>Danger</b>", 1);
    evil.items.push(item("rm -rf <dir>", "\"quoted\" & 'single'"));
    let html = render_detail(&sheet_with(1, vec![evil])).to_html();

    assert!(html.contains("&lt;b&gt;Danger&lt;/b&gt;"));
    assert!(html.contains("rm -rf &lt;dir&gt;"));
    assert!(html.contains("&quot;quoted&quot; &amp; &#039;single&#039;"));
    assert!(!html.contains("<b>Danger"));
}

#[test]
fn test_category_without_items_says_so() {
    let html = render_detail(&sheet_with(1, vec![category("Empty", 1)])).to_html();
    assert!(html.contains("No items"));
}

#[test]
fn test_list_cards_have_formatted_titles() {
    let list = render_list(&["git-basics", "vim_motions"]);
    assert_eq!(list.cards.len(), 2);
    assert_eq!(list.cards[0].title, "Git Basics");
    assert_eq!(list.cards[1].title, "Vim Motions");

    let html = list.to_html();
    assert!(html.contains("Git Basics"));
    assert!(html.contains(r#"action="/sheets/git-basics/view""#));
    assert!(!html.contains("empty-state"));
}

#[test]
fn test_empty_list_renders_empty_state_only() {
    let list = render_list::<&str>(&[]);
    assert!(list.is_empty());

    let html = list.to_html();
    assert!(html.contains("empty-state"));
    assert!(!html.contains("cheatsheet-card"));
}

#[test]
fn test_filter_is_case_insensitive_substring() {
    let mut list = render_list(&["git-basics", "Docker-Compose", "vim"]);

    list.apply_filter("DOCK");
    let visible: Vec<_> = list.visible().map(|card| card.name.as_str()).collect();
    assert_eq!(visible, vec!["Docker-Compose"]);
    assert_eq!(list.cards.len(), 3);

    list.apply_filter("");
    assert_eq!(list.visible().count(), 3);
}

#[test]
fn test_page_contains_alerts_and_search() {
    let page = Page {
        view: PageView::List(render_list(&["git-basics"])),
        alerts: vec![AlertView {
            kind: AlertKind::Warning,
            message: "Please fill in <all> fields.".to_string(),
        }],
        loading: false,
        search: "git".to_string(),
    };

    let html = render_page(&page);
    assert!(html.contains("alert-warning"));
    assert!(html.contains("Please fill in &lt;all&gt; fields."));
    assert!(html.contains(r#"name="q" value="git""#));
    assert!(!html.contains("loading-spinner"));
}

#[test]
fn test_detail_page_for_scenario_document() {
    let page = Page {
        view: PageView::Detail(render_detail(&git_basics())),
        alerts: Vec::new(),
        loading: true,
        search: String::new(),
    };

    let html = render_page(&page);
    assert!(html.contains(r#"<h2 id="cheatsheet-title">Git Basics</h2>"#));
    assert!(html.contains("<code class=\"text-primary\">git init</code>"));
    assert!(html.contains("loading-spinner"));
    assert!(!html.contains("search-input"));
}
