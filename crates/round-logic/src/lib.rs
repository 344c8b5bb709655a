//! Round Logic for proximity Rock-Paper-Scissors
//!
//! Session lifecycle and round resolution for a two-player match whose
//! transport is provided elsewhere. This crate is compiled to:
//! - Native (for the peer runtime)
//! - WASM (for a browser or webview front end)

mod choice;
mod codec;
mod codename;
mod config;
mod error;
mod game;
mod lifecycle;
mod random;
mod resolver;
mod session;
mod view;

#[cfg(feature = "wasm")]
mod wasm;

pub use choice::{Choice, Outcome};
pub use codec::{decode_choice, encode_choice};
pub use codename::generate_codename;
pub use config::{GameConfig, Topology, DEFAULT_SERVICE_ID};
pub use error::GameError;
pub use game::{Game, GameEvent, Notification};
pub use random::SeededRng;
pub use session::{MatchSummary, PairingState, RoundResult, Session, Side};
pub use view::ViewState;
