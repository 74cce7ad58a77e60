// Library exports for the Fitness Tracker client
// This allows testing of internal modules

pub mod api;
pub mod commands;
pub mod config;
pub mod forms;
pub mod models;
pub mod nav;
pub mod pages;
pub mod session;
pub mod ui;
