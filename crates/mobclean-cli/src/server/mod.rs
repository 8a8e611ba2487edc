//! Web server for the upload form.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
