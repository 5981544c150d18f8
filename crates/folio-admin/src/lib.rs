//! Folio admin panel: the command-line front end over `folio-core`.

pub mod app;
pub mod cli;
pub mod commands;

pub use app::App;
