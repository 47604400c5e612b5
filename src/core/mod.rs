//! Core module - configuration and theming

pub mod config;
pub mod theme;
