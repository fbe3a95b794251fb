//! Permission system for bot administration commands.
//!
//! A caller is classified by two flags:
//!
//! - `is_owner_or_sudo` - configured owner, sudo user, or global admin
//! - `is_chat_admin` - administrator or creator of the current group
//!
//! Commands pick a [`Policy`] and run it through
//! [`PermissionGate::authorize`] before doing any work.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let decision = state.gate.authorize(Policy::StaffOnly, user_id, chat).await?;
//! if !decision.is_allowed() {
//!     // reply "unauthorized"
//! }
//! ```

mod gate;

pub use gate::{ChatContext, ChatKind, Classification, Decision, PermissionGate, Policy};
