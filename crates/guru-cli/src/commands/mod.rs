//! Command handlers

pub mod article;
pub mod catalog;
pub mod config;
pub mod site;
pub mod status;
