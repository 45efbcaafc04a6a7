use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use log::{debug, info, warn};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::api::{HttpSheetApi, SheetApi};
use crate::config::Config;
use crate::controller::{LoadingIndicator, View, ViewController, delete_prompt};
use crate::form::{BlockRef, CategoryId, FormField, ItemKey};
use crate::render::{render_confirm, render_loading, render_page};

/// Seconds between reloads of the page shown while a call is in flight
const LOADING_REFRESH_SECS: u32 = 1;

/// The controller shared by every request
///
/// The host serves a single user session, so requests take turns on one
/// controller.
pub type SharedController<A> = Arc<Mutex<ViewController<A>>>;

/// Router state: the controller plus a handle on its loading indicator
///
/// The indicator is readable without the lock, so a page request can tell
/// that a backend call is running while an intent holds the controller.
pub struct HostState<A> {
    controller: SharedController<A>,
    loading: LoadingIndicator,
}

impl<A> Clone for HostState<A> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            loading: self.loading.clone(),
        }
    }
}

#[derive(Deserialize)]
struct PageQuery {
    q: Option<String>,
}

#[derive(Deserialize)]
struct DeleteForm {
    confirmed: Option<String>,
}

/// What a button of the edit form asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Save,
    AddCategory,
    AddItem(CategoryId),
    Remove(BlockRef),
}

impl FormAction {
    fn parse(action: &str) -> Option<Self> {
        match action {
            "save" => return Some(FormAction::Save),
            "add-category" => return Some(FormAction::AddCategory),
            _ => {}
        }

        if let Some(id) = action.strip_prefix("add-item-") {
            return id.parse().ok().map(FormAction::AddItem);
        }
        if let Some(id) = action.strip_prefix("remove-category-") {
            return id
                .parse()
                .ok()
                .map(|id| FormAction::Remove(BlockRef::Category(id)));
        }
        if let Some(key) = action.strip_prefix("remove-item-") {
            return key
                .parse::<ItemKey>()
                .ok()
                .map(|key| FormAction::Remove(BlockRef::Item(key)));
        }

        None
    }
}

/// Start the web host
///
/// Fetches the initial list, then serves until the process is stopped.
///
/// # Arguments
/// * `config` - Backend location and listen address
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpSheetApi::new(config.api_url.as_str());
    info!("Using cheatsheet API at {}", api.base_url());

    let mut controller = ViewController::new(api);
    controller.show_list().await;

    let app = router(controller);

    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the routes of the host around a controller
pub fn router<A: SheetApi + 'static>(controller: ViewController<A>) -> Router {
    let state = HostState {
        loading: controller.loading().clone(),
        controller: Arc::new(Mutex::new(controller)),
    };

    Router::new()
        .route("/", get(index::<A>))
        .route("/health", get(health))
        .route("/list", post(show_list::<A>))
        .route("/create", post(open_create::<A>))
        .route("/sheets/:name/view", post(view_sheet::<A>))
        .route("/sheets/:name/edit", post(open_edit::<A>))
        .route(
            "/sheets/:name/delete",
            get(confirm_delete::<A>).post(delete_sheet::<A>),
        )
        .route("/form", post(submit_form::<A>))
        .with_state(state)
}

async fn index<A: SheetApi + 'static>(
    State(state): State<HostState<A>>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let mut controller = match state.controller.try_lock() {
        Ok(controller) => controller,
        Err(_) if state.loading.is_active() => {
            debug!("Controller busy with a backend call, serving the loading page");
            return Html(render_loading(LOADING_REFRESH_SECS));
        }
        Err(_) => state.controller.lock().await,
    };

    if let Some(term) = query.q {
        controller.set_search(&term);
    }

    let now = Instant::now();
    controller.prune_alerts(now);
    Html(render_page(&controller.page(now)))
}

async fn health() -> impl IntoResponse {
    "ok"
}

async fn show_list<A: SheetApi + 'static>(State(state): State<HostState<A>>) -> Redirect {
    state.controller.lock().await.show_list().await;
    Redirect::to("/")
}

async fn open_create<A: SheetApi + 'static>(State(state): State<HostState<A>>) -> Redirect {
    state.controller.lock().await.open_create();
    Redirect::to("/")
}

async fn view_sheet<A: SheetApi + 'static>(
    State(state): State<HostState<A>>,
    Path(name): Path<String>,
) -> Redirect {
    state.controller.lock().await.view_sheet(&name).await;
    Redirect::to("/")
}

async fn open_edit<A: SheetApi + 'static>(
    State(state): State<HostState<A>>,
    Path(name): Path<String>,
) -> Redirect {
    state.controller.lock().await.open_edit(&name).await;
    Redirect::to("/")
}

async fn confirm_delete<A: SheetApi + 'static>(
    State(state): State<HostState<A>>,
    Path(name): Path<String>,
) -> Html<String> {
    let controller = state.controller.lock().await;
    let page = controller.page(Instant::now());
    Html(render_confirm(&page, &name, &delete_prompt(&name)))
}

async fn delete_sheet<A: SheetApi + 'static>(
    State(state): State<HostState<A>>,
    Path(name): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    let confirmed = form.confirmed.as_deref() == Some("yes");
    state.controller.lock().await.delete(&name, |_| confirmed).await;
    Redirect::to("/")
}

async fn submit_form<A: SheetApi + 'static>(
    State(state): State<HostState<A>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    let mut controller = state.controller.lock().await;

    if controller.view() != View::Edit {
        warn!("Form posted while the edit view is closed, ignoring");
        return Redirect::to("/");
    }

    let mut action = FormAction::Save;
    for (input, value) in &fields {
        if input == "action" {
            match FormAction::parse(value) {
                Some(parsed) => action = parsed,
                None => warn!("Unknown form action '{}'", value),
            }
            continue;
        }

        match FormField::parse(input) {
            Some(field) => {
                controller.form_mut().set_field(field, value);
            }
            None => debug!("Ignoring unknown form input '{}'", input),
        }
    }

    debug!("Form action {:?}", action);
    match action {
        FormAction::Save => controller.submit().await,
        FormAction::AddCategory => {
            controller.form_mut().add_category_block(None);
        }
        FormAction::AddItem(id) => {
            if let Err(err) = controller.form_mut().add_item_block(id, None) {
                warn!("Cannot add item: {}", err);
            }
        }
        FormAction::Remove(block) => {
            if !controller.form_mut().remove_block(block) {
                debug!("Block {:?} already gone", block);
            }
        }
    }

    Redirect::to("/")
}
