#![allow(dead_code)]

use cheatsheeter::api::{ApiError, SheetApi};
use cheatsheeter::model::{Category, Cheatsheet, Item, SheetData, SheetList};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory backend that records every call
#[derive(Default)]
pub struct FakeApi {
    sheets: Mutex<BTreeMap<String, SheetData>>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<(u16, Option<String>)>>,
}

impl FakeApi {
    pub fn with_sheets(sheets: &[Cheatsheet]) -> Self {
        let api = FakeApi::default();
        {
            let mut stored = api.sheets.lock().unwrap();
            for sheet in sheets {
                stored.insert(sheet.name.clone(), sheet.data.clone());
            }
        }
        api
    }

    /// Make every following call fail with this status and message
    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        *self.failure.lock().unwrap() = Some((status, message.map(str::to_string)));
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn stored(&self, name: &str) -> Option<SheetData> {
        self.sheets.lock().unwrap().get(name).cloned()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some((status, message)) => Err(ApiError::Status { status, message }),
            None => Ok(()),
        }
    }
}

impl SheetApi for FakeApi {
    async fn list_all(&self) -> Result<SheetList, ApiError> {
        self.record("list".to_string())?;
        Ok(SheetList {
            cheatsheets: self.sheets.lock().unwrap().keys().cloned().collect(),
        })
    }

    async fn get(&self, name: &str) -> Result<Cheatsheet, ApiError> {
        self.record(format!("get {}", name))?;
        let data = self.stored(name).ok_or(ApiError::Status {
            status: 404,
            message: Some("Cheat sheet not found.".to_string()),
        })?;
        Ok(Cheatsheet {
            name: name.to_string(),
            data,
        })
    }

    async fn create(&self, name: &str, data: &SheetData) -> Result<(), ApiError> {
        self.record(format!("create {}", name))?;
        let mut sheets = self.sheets.lock().unwrap();
        if sheets.contains_key(name) {
            return Err(ApiError::Status {
                status: 409,
                message: Some("Cheat sheet already exists.".to_string()),
            });
        }
        sheets.insert(name.to_string(), data.clone());
        Ok(())
    }

    async fn update(&self, name: &str, data: &SheetData) -> Result<(), ApiError> {
        self.record(format!("update {}", name))?;
        self.sheets
            .lock()
            .unwrap()
            .insert(name.to_string(), data.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.record(format!("delete {}", name))?;
        self.sheets.lock().unwrap().remove(name);
        Ok(())
    }
}

/// The `git-basics` document used across the tests
pub fn git_basics() -> Cheatsheet {
    Cheatsheet {
        name: "git-basics".to_string(),
        data: SheetData {
            title: "Git Basics".to_string(),
            columns: 2,
            categories: vec![Category {
                name: "Setup".to_string(),
                column: 1,
                items: vec![Item {
                    command: "git init".to_string(),
                    description: "Initialize repo".to_string(),
                }],
            }],
        },
    }
}

pub fn category(name: &str, column: i32) -> Category {
    Category {
        name: name.to_string(),
        column,
        items: Vec::new(),
    }
}

pub fn item(command: &str, description: &str) -> Item {
    Item {
        command: command.to_string(),
        description: description.to_string(),
    }
}
