use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use thiserror::Error;

use crate::model::{Category, Cheatsheet, Item, SheetData};
use crate::render::{CategoryBlockView, EditView, ItemBlockView};

/// Smallest column count the form accepts
pub const MIN_COLUMNS: u32 = 1;
/// Largest column count the form accepts
pub const MAX_COLUMNS: u32 = 6;

/// Identifier of a category block, unique within one form session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub u32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(CategoryId)
    }
}

/// Identifier of an item block
///
/// Items move between categories as they are removed and re-added, so their
/// keys come from the clock plus a random nonce instead of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    millis: u64,
    nonce: u32,
}

impl ItemKey {
    /// Generate a fresh key from the current time and a random nonce
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        Self {
            millis,
            nonce: rand::random(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.millis, self.nonce)
    }
}

impl FromStr for ItemKey {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormError::InvalidKey(s.to_string());
        let (millis, nonce) = s.split_once('x').ok_or_else(invalid)?;
        Ok(Self {
            millis: millis.parse().map_err(|_| invalid())?,
            nonce: nonce.parse().map_err(|_| invalid())?,
        })
    }
}

/// Errors raised by the edit form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no category block with id {0}")]
    UnknownCategory(CategoryId),

    #[error("malformed item key: {0}")]
    InvalidKey(String),

    #[error("Please fill in all required fields.")]
    MissingRequired,
}

/// Whether the form creates a new cheatsheet or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the cheatsheet stored under `original`
    Edit { original: String },
}

/// A block (category or item) in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Category(CategoryId),
    Item(ItemKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlock {
    pub key: ItemKey,
    pub command: String,
    pub description: String,
}

impl ItemBlock {
    /// A block with a fresh key, optionally filled from an item
    fn new(initial: Option<&Item>) -> Self {
        let (command, description) = initial
            .map(|item| (item.command.clone(), item.description.clone()))
            .unwrap_or_default();

        Self {
            key: ItemKey::generate(),
            command,
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlock {
    pub id: CategoryId,
    pub name: String,
    pub column: i32,
    pub items: Vec<ItemBlock>,
}

/// An input of the edit form
///
/// `Display` gives the input name used in markup; `parse` maps a submitted
/// name back to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Title,
    Columns,
    CategoryName(CategoryId),
    CategoryColumn(CategoryId),
    ItemCommand(ItemKey),
    ItemDescription(ItemKey),
}

impl FormField {
    /// Map a submitted input name back to the field, `None` if unknown
    ///
    /// # Examples
    /// ```
    /// use cheatsheeter::form::{CategoryId, FormField};
    ///
    /// assert_eq!(FormField::parse("category-3-column"),
    ///            Some(FormField::CategoryColumn(CategoryId(3))));
    /// assert_eq!(FormField::parse("bogus"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "name" => return Some(FormField::Name),
            "title" => return Some(FormField::Title),
            "columns" => return Some(FormField::Columns),
            _ => {}
        }

        if let Some(rest) = input.strip_prefix("category-") {
            let (id, attr) = rest.split_once('-')?;
            let id = id.parse().ok()?;
            return match attr {
                "name" => Some(FormField::CategoryName(id)),
                "column" => Some(FormField::CategoryColumn(id)),
                _ => None,
            };
        }

        if let Some(rest) = input.strip_prefix("item-") {
            let (key, attr) = rest.split_once('-')?;
            let key = key.parse().ok()?;
            return match attr {
                "command" => Some(FormField::ItemCommand(key)),
                "description" => Some(FormField::ItemDescription(key)),
                _ => None,
            };
        }

        None
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Name => write!(f, "name"),
            FormField::Title => write!(f, "title"),
            FormField::Columns => write!(f, "columns"),
            FormField::CategoryName(id) => write!(f, "category-{}-name", id),
            FormField::CategoryColumn(id) => write!(f, "category-{}-column", id),
            FormField::ItemCommand(key) => write!(f, "item-{}-command", key),
            FormField::ItemDescription(key) => write!(f, "item-{}-description", key),
        }
    }
}

/// Working copy of a cheatsheet while the edit view is open
///
/// The form is a list of category blocks, each with its own list of item
/// blocks. Blocks can be added and removed freely; `collect` is the only
/// way the form turns back into a document.
#[derive(Debug, Clone)]
pub struct FormState {
    mode: FormMode,
    name: String,
    title: String,
    columns: u32,
    categories: Vec<CategoryBlock>,
    category_counter: u32,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(FormMode::Create)
    }
}

impl FormState {
    pub fn new(mode: FormMode) -> Self {
        let mut form = Self {
            mode: FormMode::Create,
            name: String::new(),
            title: String::new(),
            columns: MIN_COLUMNS,
            categories: Vec::new(),
            category_counter: 0,
        };
        form.reset(mode);
        form
    }

    /// Empty the form and restart the category counter
    ///
    /// In edit mode the name input is filled with the original name and
    /// locked.
    pub fn reset(&mut self, mode: FormMode) {
        self.name = match &mode {
            FormMode::Create => String::new(),
            FormMode::Edit { original } => original.clone(),
        };
        self.mode = mode;
        self.title.clear();
        self.columns = MIN_COLUMNS;
        self.categories.clear();
        self.category_counter = 0;
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn categories(&self) -> &[CategoryBlock] {
        &self.categories
    }

    /// The name input cannot change once a cheatsheet exists
    pub fn is_name_locked(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// True when no category block is left and the placeholder should show
    pub fn shows_empty_state(&self) -> bool {
        self.categories.is_empty()
    }

    /// The name the cheatsheet is stored under when the form is submitted
    pub fn target_name(&self) -> &str {
        match &self.mode {
            FormMode::Create => self.name.trim(),
            FormMode::Edit { original } => original,
        }
    }

    /// Fill the form from a cheatsheet, replacing any existing blocks
    ///
    /// # Arguments
    /// * `sheet` - The cheatsheet to load into the form
    pub fn populate(&mut self, sheet: &Cheatsheet) {
        self.categories.clear();
        self.name = sheet.name.clone();
        self.title = sheet.data.title.clone();
        self.columns = sheet.data.columns.clamp(MIN_COLUMNS, MAX_COLUMNS);

        for category in &sheet.data.categories {
            self.add_category_block(Some(category));
        }

        debug!(
            "Populated form for '{}' with {} categories",
            sheet.name,
            self.categories.len()
        );
    }

    /// Serialize the form into the document that gets persisted
    ///
    /// Fields are trimmed. Categories without a name are skipped, as are
    /// items missing either their command or their description.
    pub fn collect(&self) -> SheetData {
        let categories = self
            .categories
            .iter()
            .filter_map(|block| {
                let name = block.name.trim();
                if name.is_empty() {
                    return None;
                }

                let items = block
                    .items
                    .iter()
                    .filter_map(|item| {
                        let command = item.command.trim();
                        let description = item.description.trim();
                        (!command.is_empty() && !description.is_empty()).then(|| Item {
                            command: command.to_string(),
                            description: description.to_string(),
                        })
                    })
                    .collect();

                Some(Category {
                    name: name.to_string(),
                    column: block.column,
                    items,
                })
            })
            .collect();

        SheetData {
            title: self.title.trim().to_string(),
            columns: self.columns,
            categories,
        }
    }

    /// Check the required top-level fields before anything is sent
    pub fn validate(&self) -> Result<(), FormError> {
        if self.target_name().is_empty() || self.title.trim().is_empty() {
            return Err(FormError::MissingRequired);
        }
        Ok(())
    }

    /// Append a category block, optionally pre-filled with its items
    ///
    /// # Returns
    /// * `CategoryId` - The identifier of the new block
    pub fn add_category_block(&mut self, initial: Option<&Category>) -> CategoryId {
        self.category_counter += 1;
        let id = CategoryId(self.category_counter);

        let block = match initial {
            Some(category) => CategoryBlock {
                id,
                name: category.name.clone(),
                column: category.column,
                items: category
                    .items
                    .iter()
                    .map(|item| ItemBlock::new(Some(item)))
                    .collect(),
            },
            None => CategoryBlock {
                id,
                name: String::new(),
                column: 1,
                items: Vec::new(),
            },
        };
        self.categories.push(block);

        id
    }

    /// Append an item block to a category block
    ///
    /// # Arguments
    /// * `category` - The category block receiving the item
    /// * `initial` - Optional values for the new item
    ///
    /// # Returns
    /// * `Result<ItemKey, FormError>` - The new item's key, or
    ///   `UnknownCategory` when no such block is present
    pub fn add_item_block(
        &mut self,
        category: CategoryId,
        initial: Option<&Item>,
    ) -> Result<ItemKey, FormError> {
        let block = self
            .category_mut(category)
            .ok_or(FormError::UnknownCategory(category))?;

        let item = ItemBlock::new(initial);
        let key = item.key;
        block.items.push(item);
        Ok(key)
    }

    /// Detach a block from the form
    ///
    /// # Returns
    /// * `bool` - Whether a block was removed
    pub fn remove_block(&mut self, block: BlockRef) -> bool {
        match block {
            BlockRef::Category(id) => {
                let before = self.categories.len();
                self.categories.retain(|category| category.id != id);
                before != self.categories.len()
            }
            BlockRef::Item(key) => self.categories.iter_mut().any(|category| {
                let before = category.items.len();
                category.items.retain(|item| item.key != key);
                before != category.items.len()
            }),
        }
    }

    /// Store a value captured from an input
    ///
    /// Values for blocks that no longer exist, for the locked name input, or
    /// numbers that do not parse are ignored.
    ///
    /// # Returns
    /// * `bool` - Whether the value was applied
    pub fn set_field(&mut self, field: FormField, value: &str) -> bool {
        match field {
            FormField::Name => {
                if self.is_name_locked() {
                    return false;
                }
                self.name = value.to_string();
            }
            FormField::Title => self.title = value.to_string(),
            FormField::Columns => match value.trim().parse::<u32>() {
                Ok(columns) => self.columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS),
                Err(_) => return false,
            },
            FormField::CategoryName(id) => match self.category_mut(id) {
                Some(category) => category.name = value.to_string(),
                None => return false,
            },
            FormField::CategoryColumn(id) => {
                let Ok(column) = value.trim().parse::<i32>() else {
                    return false;
                };
                match self.category_mut(id) {
                    Some(category) => category.column = column,
                    None => return false,
                }
            }
            FormField::ItemCommand(key) => match self.item_mut(key) {
                Some(item) => item.command = value.to_string(),
                None => return false,
            },
            FormField::ItemDescription(key) => match self.item_mut(key) {
                Some(item) => item.description = value.to_string(),
                None => return false,
            },
        }
        true
    }

    /// Describe the form for the renderer
    pub fn view(&self) -> EditView {
        EditView {
            heading: match self.mode {
                FormMode::Create => "Create Cheatsheet",
                FormMode::Edit { .. } => "Edit Cheatsheet",
            },
            name: self.name.clone(),
            name_locked: self.is_name_locked(),
            title: self.title.clone(),
            columns: self.columns,
            categories: self
                .categories
                .iter()
                .map(|category| CategoryBlockView {
                    id: category.id,
                    name: category.name.clone(),
                    column: category.column,
                    items: category
                        .items
                        .iter()
                        .map(|item| ItemBlockView {
                            key: item.key,
                            command: item.command.clone(),
                            description: item.description.clone(),
                        })
                        .collect(),
                })
                .collect(),
            show_empty_state: self.shows_empty_state(),
        }
    }

    fn category_mut(&mut self, id: CategoryId) -> Option<&mut CategoryBlock> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    fn item_mut(&mut self, key: ItemKey) -> Option<&mut ItemBlock> {
        self.categories
            .iter_mut()
            .flat_map(|category| category.items.iter_mut())
            .find(|item| item.key == key)
    }
}
