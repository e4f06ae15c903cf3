//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **VoteTarget**: the post or comment a vote is cast on
//! - **VoteTally**: upvote/downvote counts and the derived score
//! - **PageRequest / Page**: offset pagination

mod page;
mod vote_target;

pub use page::*;
pub use vote_target::*;
