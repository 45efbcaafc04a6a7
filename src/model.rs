use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[-_]").unwrap();
    static ref WORD_START: Regex = Regex::new(r"(?-u:\b)(?-u:\w)").unwrap();
}

/// A cheatsheet as returned by the backend
///
/// The `name` is the URL-safe identifier of the document. It is chosen on
/// creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cheatsheet {
    /// Unique, URL-safe identifier
    pub name: String,

    /// Document content
    #[serde(default)]
    pub data: SheetData,
}

/// The persisted content of a cheatsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetData {
    /// Display title
    #[serde(default)]
    pub title: String,

    /// Number of layout columns, 1 to 6
    #[serde(default = "default_columns")]
    pub columns: u32,

    /// Categories in display order
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Default for SheetData {
    fn default() -> Self {
        Self {
            title: String::new(),
            columns: default_columns(),
            categories: Vec::new(),
        }
    }
}

/// A titled group of items placed in one layout column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: String,

    /// 1-based target column. Values outside the sheet's column range are
    /// kept but not rendered.
    #[serde(default = "default_column")]
    pub column: i32,

    #[serde(default)]
    pub items: Vec<Item>,
}

/// A single command/description pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub description: String,
}

/// Response of the list operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetList {
    #[serde(default)]
    pub cheatsheets: Vec<String>,
}

fn default_columns() -> u32 {
    1
}

fn default_column() -> i32 {
    1
}

/// Format a cheatsheet name for display
///
/// Dashes and underscores become spaces and the first letter of every word
/// is upper-cased.
///
/// # Examples
/// ```
/// use cheatsheeter::model::format_name;
///
/// assert_eq!(format_name("git-basics"), "Git Basics");
/// assert_eq!(format_name("docker_compose-v2"), "Docker Compose V2");
/// ```
pub fn format_name(name: &str) -> String {
    let spaced = SEPARATORS.replace_all(name, " ");
    WORD_START
        .replace_all(&spaced, |caps: &Captures| caps[0].to_ascii_uppercase())
        .into_owned()
}
