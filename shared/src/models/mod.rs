//! Data models
//!
//! Plain records mirrored from the LPPM API. All IDs are strings and all
//! field names are camelCase on the wire.

pub mod program_studi;
pub mod proposal;
pub mod research;
pub mod role;
pub mod service;
pub mod user;

// Re-exports
pub use program_studi::*;
pub use proposal::{MemberRole, ProposalStatus, StatusUpdate, TeamMember};
pub use research::*;
pub use role::*;
pub use service::*;
pub use user::*;
