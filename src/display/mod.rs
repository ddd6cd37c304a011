//! Display formatting for terminal output
//!
//! Turns dashboards and stokvel summaries into plain-text tables and detail
//! views.

pub mod stokvel;
pub mod user;

pub use stokvel::{format_stokvel_details, format_stokvel_list};
pub use user::format_dashboard;
