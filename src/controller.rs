use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::api::{ApiError, SheetApi};
use crate::form::{FormMode, FormState};
use crate::model::Cheatsheet;
use crate::render::{AlertKind, AlertView, ListView, Page, PageView, render_detail, render_list};

/// How long an alert stays on screen
pub const ALERT_LIFETIME: Duration = Duration::from_secs(5);

/// The view currently visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
    Edit,
}

/// A transient, self-dismissing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub raised_at: Instant,
}

impl Alert {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= ALERT_LIFETIME
    }
}

/// Tracks in-flight backend calls for the loading spinner
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    /// Mark a call as started; the returned guard marks it finished when dropped
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn is_active(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

/// Keeps the spinner up for as long as it lives
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The question asked before a cheatsheet is deleted
pub fn delete_prompt(name: &str) -> String {
    format!(
        "Are you sure you want to delete \"{}\"? This action cannot be undone.",
        name
    )
}

/// Owns the UI state and turns user intents into backend calls
///
/// Every intent takes `&mut self`, so a controller handles one intent at a
/// time and a completion always lands on the state it was issued from.
#[derive(Debug)]
pub struct ViewController<A> {
    api: A,
    view: View,
    current: Option<Cheatsheet>,
    list: ListView,
    search: String,
    form: FormState,
    alerts: Vec<Alert>,
    loading: LoadingIndicator,
}

impl<A: SheetApi> ViewController<A> {
    /// Create a controller showing an empty list
    ///
    /// Call [`ViewController::show_list`] to fetch the initial list.
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: View::List,
            current: None,
            list: ListView::default(),
            search: String::new(),
            form: FormState::default(),
            alerts: Vec::new(),
            loading: LoadingIndicator::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The cheatsheet shown in the detail view
    pub fn current(&self) -> Option<&Cheatsheet> {
        self.current.as_ref()
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Show an alert; it dismisses itself after [`ALERT_LIFETIME`]
    pub fn raise(&mut self, kind: AlertKind, message: impl Into<String>) {
        let message = message.into();
        debug!("Alert ({}): {}", kind.css_class(), message);
        self.alerts.push(Alert {
            kind,
            message,
            raised_at: Instant::now(),
        });
    }

    /// Drop every alert that has outlived [`ALERT_LIFETIME`] at `now`
    pub fn prune_alerts(&mut self, now: Instant) {
        self.alerts.retain(|alert| !alert.is_expired(now));
    }

    /// Switch to the list view and fetch the list again
    pub async fn show_list(&mut self) {
        self.view = View::List;
        self.current = None;
        self.refresh_list().await;
    }

    /// Open an empty form for a new cheatsheet
    pub fn open_create(&mut self) {
        self.form.reset(FormMode::Create);
        self.view = View::Edit;
    }

    /// Open the form for an existing cheatsheet and fill it from the backend
    ///
    /// When the fetch fails the user is sent back to the list.
    pub async fn open_edit(&mut self, name: &str) {
        self.form.reset(FormMode::Edit {
            original: name.to_string(),
        });
        self.view = View::Edit;

        let result = {
            let _loading = self.loading.begin();
            self.api.get(name).await
        };

        match result {
            Ok(sheet) => self.form.populate(&sheet),
            Err(err) => {
                error!("Failed to load cheatsheet '{}' for editing: {}", name, err);
                self.raise(AlertKind::Danger, "Failed to load cheatsheet for editing.");
                self.show_list().await;
            }
        }
    }

    /// Fetch a cheatsheet and show it in the detail view
    pub async fn view_sheet(&mut self, name: &str) {
        let _loading = self.loading.begin();

        match self.api.get(name).await {
            Ok(sheet) => {
                self.current = Some(sheet);
                self.view = View::Detail;
            }
            Err(err) => {
                error!("Failed to load cheatsheet '{}': {}", name, err);
                self.raise(
                    AlertKind::Danger,
                    "Failed to load cheatsheet. Please try again.",
                );
            }
        }
    }

    /// Save the form, creating or updating depending on its mode
    ///
    /// Missing required fields stop the submit before any call is made. On
    /// failure the form stays open so the user can retry.
    pub async fn submit(&mut self) {
        if let Err(err) = self.form.validate() {
            warn!("Submit rejected: {}", err);
            self.raise(AlertKind::Warning, err.to_string());
            return;
        }

        let data = self.form.collect();
        let name = self.form.target_name().to_string();
        let editing = matches!(self.form.mode(), FormMode::Edit { .. });

        let result = {
            let _loading = self.loading.begin();
            if editing {
                self.api.update(&name, &data).await
            } else {
                self.api.create(&name, &data).await
            }
        };

        match result {
            Ok(()) => {
                info!(
                    "Cheatsheet '{}' {}",
                    name,
                    if editing { "updated" } else { "created" }
                );
                self.raise(
                    AlertKind::Success,
                    if editing {
                        "Cheatsheet updated successfully!"
                    } else {
                        "Cheatsheet created successfully!"
                    },
                );
                self.show_list().await;
            }
            Err(err) => {
                error!("Failed to save cheatsheet '{}': {}", name, err);
                self.raise(
                    AlertKind::Danger,
                    failure_message(&err, "Failed to save cheatsheet. Please try again."),
                );
            }
        }
    }

    /// Delete a cheatsheet once the user confirms
    ///
    /// # Arguments
    /// * `name` - The cheatsheet to delete
    /// * `confirm` - Asked with [`delete_prompt`]; returning `false` aborts
    ///   without touching any state
    pub async fn delete(&mut self, name: &str, confirm: impl FnOnce(&str) -> bool) {
        if !confirm(&delete_prompt(name)) {
            debug!("Deletion of '{}' declined", name);
            return;
        }

        let result = {
            let _loading = self.loading.begin();
            self.api.delete(name).await
        };

        match result {
            Ok(()) => {
                info!("Cheatsheet '{}' deleted", name);
                self.raise(AlertKind::Success, "Cheatsheet deleted successfully!");

                let viewing_deleted = self.view == View::Detail
                    && self.current.as_ref().is_some_and(|sheet| sheet.name == name);
                if viewing_deleted {
                    self.show_list().await;
                } else {
                    self.refresh_list().await;
                }
            }
            Err(err) => {
                error!("Failed to delete cheatsheet '{}': {}", name, err);
                self.raise(
                    AlertKind::Danger,
                    "Failed to delete cheatsheet. Please try again.",
                );
            }
        }
    }

    /// Filter the rendered list; never calls the backend
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.list.apply_filter(term);
    }

    /// Describe what is on screen at `now`
    pub fn page(&self, now: Instant) -> Page {
        let view = match (self.view, &self.current) {
            (View::Detail, Some(sheet)) => PageView::Detail(render_detail(sheet)),
            (View::Edit, _) => PageView::Edit(self.form.view()),
            _ => PageView::List(self.list.clone()),
        };

        Page {
            view,
            alerts: self
                .alerts
                .iter()
                .filter(|alert| !alert.is_expired(now))
                .map(|alert| AlertView {
                    kind: alert.kind,
                    message: alert.message.clone(),
                })
                .collect(),
            loading: self.loading.is_active(),
            search: self.search.clone(),
        }
    }

    async fn refresh_list(&mut self) {
        let result = {
            let _loading = self.loading.begin();
            self.api.list_all().await
        };

        match result {
            Ok(list) => {
                debug!("Loaded {} cheatsheets", list.cheatsheets.len());
                self.list = render_list(&list.cheatsheets);
                self.list.apply_filter(&self.search);
            }
            Err(err) => {
                error!("Failed to load cheatsheets: {}", err);
                self.raise(
                    AlertKind::Danger,
                    "Failed to load cheatsheets. Please try again.",
                );
            }
        }
    }
}

fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_string()
}
