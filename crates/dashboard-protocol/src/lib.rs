//! dashboard-protocol
//!
//! Output encodings for `dashboard_core::DashboardState`.
//!
//! - [`status_json`]  : JSON status object (for `/api/status`)
//! - [`text_summary`] : plain-text dashboard and health bodies

pub mod status_json;
pub mod text_summary;

pub use status_json::{encode_status, status_document, StatusDocument};
pub use text_summary::{format_currency, render_health, render_summary};
