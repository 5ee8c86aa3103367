//! Calendar timeline with direct manipulation of work items, phase markers and
//! blackout periods.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
