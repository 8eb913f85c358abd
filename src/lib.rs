//! Payscope - salary prediction front end
//!
//! A single-page form and CSV batch upload over a pre-trained salary model.
//! It exposes all modules for testing purposes.

pub mod errors;
pub mod model;
pub mod predict;
pub mod record;
pub mod render;
pub mod settings;
pub mod table;
pub mod web;
