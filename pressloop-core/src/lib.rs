//! # Pressloop Core Library
//!
//! Send a button prompt to a chat, poll for the press, and report it to a table.
//! Each unit runs once per invocation; scheduling, retries and timeouts belong to
//! whoever invokes them.

pub mod error;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

pub use error::{PressloopError, Result};
