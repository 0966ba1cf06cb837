//! Roster Core
//!
//! Store-agnostic types, the user service contract and error handling for Roster.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `UserId`, and the `NewUser` / `UserChanges` payloads
//! - **Service Contract**: `UserService`, implemented by every backing store
//! - **Error Handling**: Unified `RosterError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use roster_core::types::{NewUser, User};
//!
//! let new_user = NewUser::new("Suzy", "Worker");
//! let user = User::from_new(new_user, Utc::now());
//!
//! assert_eq!(user.created_at, user.updated_at);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod service;
pub mod types;

pub use error::{Result, RosterError};
pub use service::{PoolStats, UserService};
pub use types::{NewUser, User, UserChanges, UserId};
