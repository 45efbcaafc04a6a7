/*!
# Cheatsheeter

A front end for managing cheatsheets, built in Rust.

## Overview

A cheatsheet is a named document made of titled categories, each holding
command/description pairs, laid out over one to six columns. This crate owns
everything between the user and the backend `CheatSheetAPI`: which view is
visible, the edit form's working copy, rendering, and the HTTP calls that
persist changes. Persistence itself lives in the backend.

## Architecture

### Presentation Layer (feature `web`)
- **Technologies**: HTML, Bootstrap classes, axum
- **Key Components**:
  - Page Host - Serves the current page and turns form posts into intents
  - Configuration - Command line / environment options for the host

### Front End Core
- **Technologies**: Rust
- **Core Components**:
  - View Controller - Tracks the visible view and dispatches user intents
  - Form Synchronizer - Maps a cheatsheet to category/item sub-forms and back
  - Renderer - Builds list and column-grouped detail view models and markup
  - Escaper - Makes user content safe to place into markup

### Backend Client
- **Technologies**: reqwest, serde_json
- Five operations against the backend: list, get, create, update, delete

## Modules

- **escape**: HTML escaping of user content
- **model**: Cheatsheet, category and item types plus display-name formatting
- **api**: The `SheetApi` trait and its HTTP implementation
- **render**: View models and their HTML markup
- **form**: Edit form state (populate, collect, dynamic blocks)
- **controller**: View state and intent handling
- **app**: Web host routes (feature `web`)
- **config**: Web host configuration (feature `web`)

## Host Routes

- `GET /` - Renders the current view (`?q=` filters the list)
- `POST /list`, `POST /create` - Navigation
- `POST /sheets/{name}/view`, `POST /sheets/{name}/edit` - Open a cheatsheet
- `GET|POST /sheets/{name}/delete` - Confirm and delete
- `POST /form` - Edit form actions (save, add/remove blocks)
*/

pub mod api;
pub mod controller;
pub mod escape;
pub mod form;
pub mod model;
pub mod render;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod config;

/// Re-export everything from these modules to make it easier to use
pub use api::*;
pub use controller::*;
pub use escape::*;
pub use form::*;
pub use model::*;
pub use render::*;
