use std::fmt::Write;

use log::debug;

use crate::escape::escape_html;
use crate::form::{CategoryId, FormField, ItemKey, MAX_COLUMNS, MIN_COLUMNS};
use crate::model::{Category, Cheatsheet, format_name};

/// Width of the layout grid that detail columns divide between them
pub const GRID_UNITS: u32 = 12;

/// Summary card of one cheatsheet in the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCard {
    pub name: String,
    /// Display form of the name, see [`format_name`]
    pub title: String,
    /// Hidden by the search filter
    pub hidden: bool,
}

/// The list of all cheatsheets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    pub cards: Vec<SheetCard>,
}

/// Build the list view from the names returned by the backend
///
/// # Arguments
/// * `names` - Cheatsheet names in the order the backend returned them
///
/// # Returns
/// * `ListView` - One card per name; an empty list renders the empty state
pub fn render_list<S: AsRef<str>>(names: &[S]) -> ListView {
    ListView {
        cards: names
            .iter()
            .map(|name| SheetCard {
                name: name.as_ref().to_string(),
                title: format_name(name.as_ref()),
                hidden: false,
            })
            .collect(),
    }
}

impl ListView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Hide every card whose name does not contain `term`, ignoring case
    ///
    /// An empty term shows every card again.
    pub fn apply_filter(&mut self, term: &str) {
        let term = term.to_lowercase();
        for card in &mut self.cards {
            card.hidden = !card.name.to_lowercase().contains(&term);
        }
    }

    /// Cards that survive the current filter
    pub fn visible(&self) -> impl Iterator<Item = &SheetCard> {
        self.cards.iter().filter(|card| !card.hidden)
    }

    pub fn to_html(&self) -> String {
        if self.is_empty() {
            return concat!(
                r#"<div id="empty-state" class="text-center text-muted py-5">"#,
                r#"<i class="bi bi-journal-x display-4"></i>"#,
                r#"<p class="mt-3">No cheatsheets yet. Create your first one!</p>"#,
                "</div>"
            )
            .to_string();
        }

        let mut html = String::from(r#"<div id="cheatsheets-container" class="row g-3">"#);
        for card in &self.cards {
            let name = escape_html(card.name.as_str());
            let path = sheet_path(&card.name);
            let style = if card.hidden { r#" style="display: none""# } else { "" };
            let _ = write!(
                html,
                r#"<div class="col-md-6 col-lg-4 cheatsheet-card" data-name="{name}"{style}>
<div class="card h-100 shadow-sm hover-shadow">
<div class="card-body">
<h5 class="card-title"><i class="bi bi-file-code text-primary"></i> {title}</h5>
<p class="card-text text-muted"><small><i class="bi bi-tag"></i> {name}</small></p>
</div>
<div class="card-footer bg-transparent border-top-0"><div class="d-flex gap-2">
<form method="post" action="{path}/view" class="flex-grow-1"><button class="btn btn-sm btn-primary w-100"><i class="bi bi-eye"></i> View</button></form>
<form method="post" action="{path}/edit"><button class="btn btn-sm btn-outline-secondary"><i class="bi bi-pencil"></i> Edit</button></form>
<form method="get" action="{path}/delete"><button class="btn btn-sm btn-outline-danger"><i class="bi bi-trash"></i></button></form>
</div></div>
</div>
</div>"#,
                title = escape_html(card.title.as_str()),
            );
        }
        html.push_str("</div>");
        html
    }
}

/// One command/description pair in the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub command: String,
    pub description: String,
}

/// A category rendered as a card in the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub name: String,
    pub items: Vec<ItemRow>,
}

impl CategoryCard {
    fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            items: category
                .items
                .iter()
                .map(|item| ItemRow {
                    command: item.command.clone(),
                    description: item.description.clone(),
                })
                .collect(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut items = String::new();
        for item in &self.items {
            let _ = write!(
                items,
                r#"<li class="list-group-item"><div class="d-flex justify-content-between align-items-start"><div class="flex-grow-1"><code class="text-primary">{}</code><p class="mb-0 mt-1 text-muted small">{}</p></div></div></li>"#,
                escape_html(item.command.as_str()),
                escape_html(item.description.as_str()),
            );
        }
        if items.is_empty() {
            items.push_str(r#"<li class="list-group-item text-muted">No items</li>"#);
        }

        format!(
            r#"<div class="card mb-3 shadow-sm"><div class="card-header bg-light"><h5 class="mb-0">{}</h5></div><ul class="list-group list-group-flush">{}</ul></div>"#,
            escape_html(self.name.as_str()),
            items
        )
    }
}

/// One layout column (bucket) of the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    /// 1-based column index
    pub index: u32,
    pub categories: Vec<CategoryCard>,
}

/// A single cheatsheet laid out in columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    pub title: String,
    /// Grid units taken by each column
    pub column_width: u32,
    /// Buckets in ascending column order
    pub columns: Vec<ColumnView>,
    /// The cheatsheet has no categories at all
    pub is_empty: bool,
}

/// Group a cheatsheet's categories into its layout columns
///
/// Categories keep their document order inside a column. The column count is
/// held to the range the form accepts, and a category whose column has no
/// bucket is left out.
///
/// # Arguments
/// * `sheet` - The cheatsheet to lay out
///
/// # Returns
/// * `DetailView` - Buckets in ascending column order
pub fn render_detail(sheet: &Cheatsheet) -> DetailView {
    let column_count = sheet.data.columns.clamp(MIN_COLUMNS, MAX_COLUMNS);

    let mut columns: Vec<ColumnView> = (1..=column_count)
        .map(|index| ColumnView {
            index,
            categories: Vec::new(),
        })
        .collect();

    for category in &sheet.data.categories {
        let bucket = usize::try_from(category.column)
            .ok()
            .and_then(|column| column.checked_sub(1))
            .and_then(|slot| columns.get_mut(slot));

        match bucket {
            Some(bucket) => bucket.categories.push(CategoryCard::from_category(category)),
            None => debug!(
                "Category '{}' targets column {} outside 1..={}, not rendered",
                category.name, category.column, column_count
            ),
        }
    }

    let title = if sheet.data.title.is_empty() {
        sheet.name.clone()
    } else {
        sheet.data.title.clone()
    };

    DetailView {
        name: sheet.name.clone(),
        title,
        column_width: GRID_UNITS / column_count,
        columns,
        is_empty: sheet.data.categories.is_empty(),
    }
}

impl DetailView {
    /// Number of categories in each bucket, in column order
    pub fn bucket_sizes(&self) -> Vec<usize> {
        self.columns
            .iter()
            .map(|column| column.categories.len())
            .collect()
    }

    pub fn to_html(&self) -> String {
        let path = sheet_path(&self.name);
        let mut html = format!(
            r#"<div id="view-cheatsheet-view" class="view-container">
<div class="d-flex justify-content-between align-items-center mb-4">
<h2 id="cheatsheet-title">{title}</h2>
<div class="d-flex gap-2">
<form method="post" action="/list"><button id="back-to-list" class="btn btn-outline-secondary"><i class="bi bi-arrow-left"></i> Back</button></form>
<form method="post" action="{path}/edit"><button id="edit-cheatsheet-btn" class="btn btn-outline-primary"><i class="bi bi-pencil"></i> Edit</button></form>
<form method="get" action="{path}/delete"><button id="delete-cheatsheet-btn" class="btn btn-outline-danger"><i class="bi bi-trash"></i> Delete</button></form>
</div>
</div>
<div id="cheatsheet-content" class="row">"#,
            title = escape_html(self.title.as_str()),
        );

        for column in &self.columns {
            let _ = write!(html, r#"<div class="col-md-{}">"#, self.column_width);
            for category in &column.categories {
                html.push_str(&category.to_html());
            }
            html.push_str("</div>");
        }

        if self.is_empty {
            html.push_str(concat!(
                r#"<div class="col-12 text-center text-muted py-5">"#,
                r#"<i class="bi bi-inbox display-4"></i>"#,
                r#"<p class="mt-3">This cheatsheet has no categories yet.</p>"#,
                "</div>"
            ));
        }

        html.push_str("</div></div>");
        html
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlockView {
    pub key: ItemKey,
    pub command: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlockView {
    pub id: CategoryId,
    pub name: String,
    pub column: i32,
    pub items: Vec<ItemBlockView>,
}

/// The create/edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditView {
    pub heading: &'static str,
    pub name: String,
    pub name_locked: bool,
    pub title: String,
    pub columns: u32,
    pub categories: Vec<CategoryBlockView>,
    pub show_empty_state: bool,
}

impl EditView {
    pub fn to_html(&self) -> String {
        let disabled = if self.name_locked { " disabled" } else { "" };
        let mut html = format!(
            r#"<div id="edit-view" class="view-container">
<h2 id="edit-view-title" class="mb-4">{heading}</h2>
<form id="cheatsheet-form" method="post" action="/form">
<button type="submit" class="d-none" name="action" value="save" tabindex="-1" aria-hidden="true"></button>
<div class="row mb-3">
<div class="col-md-4"><label class="form-label">Name *</label><input type="text" id="cheatsheet-name-input" class="form-control" name="{name_field}" value="{name}" placeholder="e.g., git-basics" required{disabled}></div>
<div class="col-md-5"><label class="form-label">Title *</label><input type="text" id="cheatsheet-title-input" class="form-control" name="{title_field}" value="{title}" placeholder="e.g., Git Basics" required></div>
<div class="col-md-3"><label class="form-label">Columns *</label><input type="number" id="cheatsheet-columns" class="form-control" name="{columns_field}" value="{columns}" min="{min}" max="{max}" required></div>
</div>
<div id="categories-container">"#,
            heading = self.heading,
            name_field = FormField::Name,
            name = escape_html(self.name.as_str()),
            title_field = FormField::Title,
            title = escape_html(self.title.as_str()),
            columns_field = FormField::Columns,
            columns = self.columns,
            min = MIN_COLUMNS,
            max = MAX_COLUMNS,
        );

        for category in &self.categories {
            html.push_str(&category.to_html());
        }
        html.push_str("</div>");

        if self.show_empty_state {
            html.push_str(
                r#"<p id="no-categories" class="text-muted">No categories yet. Add one to get started.</p>"#,
            );
        }

        html.push_str(concat!(
            r#"<button type="submit" id="add-category-btn" class="btn btn-outline-primary mb-3" name="action" value="add-category" formnovalidate><i class="bi bi-plus-lg"></i> Add Category</button>"#,
            r#"<div class="d-flex gap-2">"#,
            r#"<button type="submit" class="btn btn-primary" name="action" value="save"><i class="bi bi-save"></i> Save</button>"#,
            r#"<button type="submit" id="cancel-edit" class="btn btn-outline-secondary" formaction="/list" formnovalidate>Cancel</button>"#,
            "</div></form></div>"
        ));
        html
    }
}

impl CategoryBlockView {
    pub fn to_html(&self) -> String {
        let id = self.id;
        let mut items = String::new();
        for item in &self.items {
            items.push_str(&item.to_html());
        }

        format!(
            r#"<div class="card mb-3 category-card" data-category-id="{id}">
<div class="card-header bg-light d-flex justify-content-between align-items-center">
<strong>Category {id}</strong>
<button type="submit" class="btn btn-sm btn-danger remove-category-btn" name="action" value="remove-category-{id}" formnovalidate><i class="bi bi-trash"></i> Remove</button>
</div>
<div class="card-body">
<div class="row mb-3">
<div class="col-md-8"><label class="form-label">Category Name *</label><input type="text" class="form-control category-name" name="{name_field}" value="{name}" placeholder="e.g., Basics" required></div>
<div class="col-md-4"><label class="form-label">Column *</label><input type="number" class="form-control category-column" name="{column_field}" value="{column}" min="{min}" max="{max}" required></div>
</div>
<div class="items-container" data-category-id="{id}">{items}</div>
<button type="submit" class="btn btn-sm btn-outline-primary add-item-btn" name="action" value="add-item-{id}" formnovalidate><i class="bi bi-plus-lg"></i> Add Item</button>
</div>
</div>"#,
            name_field = FormField::CategoryName(id),
            name = escape_html(self.name.as_str()),
            column_field = FormField::CategoryColumn(id),
            column = self.column,
            min = MIN_COLUMNS,
            max = MAX_COLUMNS,
        )
    }
}

impl ItemBlockView {
    pub fn to_html(&self) -> String {
        let key = self.key;
        format!(
            r#"<div class="card mb-2 item-card" data-item-id="{key}">
<div class="card-body">
<div class="row mb-2">
<div class="col-md-6"><label class="form-label small">Command *</label><input type="text" class="form-control form-control-sm item-command" name="{command_field}" value="{command}" placeholder="e.g., git commit" required></div>
<div class="col-md-6"><label class="form-label small">Description *</label><input type="text" class="form-control form-control-sm item-description" name="{description_field}" value="{description}" placeholder="e.g., Commit changes" required></div>
</div>
<button type="submit" class="btn btn-sm btn-outline-danger remove-item-btn" name="action" value="remove-item-{key}" formnovalidate><i class="bi bi-x-lg"></i> Remove</button>
</div>
</div>"#,
            command_field = FormField::ItemCommand(key),
            command = escape_html(self.command.as_str()),
            description_field = FormField::ItemDescription(key),
            description = escape_html(self.description.as_str()),
        )
    }
}

/// Severity of a transient alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
            AlertKind::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertView {
    pub kind: AlertKind,
    pub message: String,
}

impl AlertView {
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="alert alert-{} alert-dismissible fade show" role="alert">{}<button type="button" class="btn-close" data-bs-dismiss="alert"></button></div>"#,
            self.kind.css_class(),
            escape_html(self.message.as_str())
        )
    }
}

/// The view currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    List(ListView),
    Detail(DetailView),
    Edit(EditView),
}

/// Everything visible at one moment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub view: PageView,
    pub alerts: Vec<AlertView>,
    pub loading: bool,
    /// Current search term, echoed back into the search box
    pub search: String,
}

/// Render a full HTML document for a page
pub fn render_page(page: &Page) -> String {
    let mut body = String::new();

    if let PageView::List(_) = page.view {
        let _ = write!(
            body,
            r#"<div class="d-flex justify-content-between align-items-center mb-4"><h2>Cheatsheets</h2><form method="get" action="/" class="d-flex"><input type="search" id="search-input" class="form-control" name="q" value="{}" placeholder="Search cheatsheets..."></form></div>"#,
            escape_html(page.search.as_str())
        );
    }

    body.push_str(&match &page.view {
        PageView::List(list) => format!(
            r#"<div id="list-view" class="view-container">{}</div>"#,
            list.to_html()
        ),
        PageView::Detail(detail) => detail.to_html(),
        PageView::Edit(edit) => edit.to_html(),
    });

    document(page, "", &body)
}

/// Render the placeholder shown while another request holds the controller
///
/// The page reloads itself every `refresh_secs` seconds until the call in
/// flight has finished.
pub fn render_loading(refresh_secs: u32) -> String {
    let page = Page {
        view: PageView::List(ListView::default()),
        alerts: Vec::new(),
        loading: true,
        search: String::new(),
    };
    let head = format!(r#"<meta http-equiv="refresh" content="{}">"#, refresh_secs);
    document(&page, &head, "")
}

/// Render the confirmation asked before deleting a cheatsheet
///
/// # Arguments
/// * `page` - The page the confirmation is shown over
/// * `name` - The cheatsheet about to be deleted
/// * `prompt` - The question put to the user
pub fn render_confirm(page: &Page, name: &str, prompt: &str) -> String {
    let body = format!(
        r#"<div class="card shadow-sm"><div class="card-body">
<p class="card-text">{prompt}</p>
<form method="post" action="{path}/delete" class="d-flex gap-2">
<button type="submit" class="btn btn-danger" name="confirmed" value="yes">Delete</button>
<button type="submit" class="btn btn-outline-secondary" name="confirmed" value="no">Cancel</button>
</form>
</div></div>"#,
        prompt = escape_html(prompt),
        path = sheet_path(name),
    );
    document(page, "", &body)
}

fn document(page: &Page, head: &str, body: &str) -> String {
    let active = match page.view {
        PageView::List(_) => "list",
        PageView::Detail(_) => "view",
        PageView::Edit(_) => "create",
    };
    let nav_class = |view: &str| {
        if view == active { "nav-link btn btn-link active" } else { "nav-link btn btn-link" }
    };

    let alerts: String = page.alerts.iter().map(AlertView::to_html).collect();
    let spinner = if page.loading {
        r#"<div id="loading-spinner" class="text-center py-3"><div class="spinner-border" role="status"></div></div>"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head}<title>CheatSheeter</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css">
</head>
<body>
<nav class="navbar navbar-expand navbar-dark bg-dark mb-4"><div class="container">
<form method="post" action="/list"><button id="brand-link" class="navbar-brand btn btn-link">CheatSheeter</button></form>
<ul class="navbar-nav">
<li class="nav-item"><form method="post" action="/list"><button class="{list_class}" data-view="list">Cheatsheets</button></form></li>
<li class="nav-item"><form method="post" action="/create"><button class="{create_class}" data-view="create">Create</button></form></li>
</ul>
</div></nav>
<main class="container">
<div id="alert-container">{alerts}</div>
{spinner}
{body}
</main>
</body>
</html>
"#,
        list_class = nav_class("list"),
        create_class = nav_class("create"),
    )
}

fn sheet_path(name: &str) -> String {
    format!("/sheets/{}", escape_html(&*urlencoding::encode(name)))
}
