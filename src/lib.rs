// ABOUTME: Main library file for mdimg
// ABOUTME: Exports all public modules and types

pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod links;
pub mod logging;
pub mod process;
pub mod upload;

pub use anyhow::{Error, Result};
