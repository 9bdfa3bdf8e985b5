//! HTTP API handlers for the public dashboard

pub mod computers;
pub mod error;
pub mod export;
pub mod health;
pub mod plot;
pub mod submit;
pub mod ui;

pub use computers::get_computers;
pub use error::ApiError;
pub use export::{export_computers_csv, export_dataset_csv};
pub use health::health_routes;
pub use plot::{get_filter_options, get_plot_data};
pub use submit::{create_submission, create_update_request};
pub use ui::{serve_app_js, serve_index};
