//! HTTP API handlers for the moderation service

pub mod auth;
pub mod error;
pub mod export;
pub mod health;
pub mod queue;
pub mod table;
pub mod ui;

pub use auth::{login, logout, require_admin, session_status};
pub use error::ApiError;
pub use export::export_dataset_csv;
pub use health::health_routes;
pub use queue::{approve_submission, get_queue, reject_submission};
pub use table::{delete_submission, edit_submission, get_table_data};
pub use ui::{serve_app_js, serve_index};
