pub mod config;
pub mod error;
pub mod formatter;
pub mod handlers;
pub mod health;
pub mod i18n;
pub mod report;
pub mod routes;
pub mod sms;
pub mod state;
pub mod translation;
