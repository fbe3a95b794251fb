//! Bot module - Core bot functionality.

pub mod dispatcher;
pub mod refresher;
mod runtime;
mod webhook;

pub use dispatcher::{build_dispatcher, AppState};
pub use runtime::run;
