//! Peer runtime for proximity Rock-Paper-Scissors
//!
//! Wraps the round logic in an event loop per participant, with an in-memory
//! medium standing in for the proximity connectivity service.

pub mod driver;
pub mod error;
pub mod medium;
pub mod peer;

pub use driver::{play_match, MatchReport};
pub use error::PeerError;
pub use medium::{EndpointId, Link, LinkEvent, Medium};
pub use peer::{Peer, PeerCommand, PeerHandle, PeerUpdate};
