//! guild-dash - A terminal dashboard for the guild bot control panel
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod logging;
pub mod models;
pub mod socketio;
pub mod terminal;
pub mod traits;
pub mod ui;
pub mod utils;
pub mod view_state;
