//! Connection lifecycle: Idle -> Searching -> Connected -> Idle

use tracing::{debug, info};

use crate::error::GameError;
use crate::session::{MatchSummary, PairingState, Session};

/// Start looking for an opponent.
///
/// Returns `false` when already searching; repeated calls are no-ops.
pub fn begin_pairing(session: &mut Session) -> Result<bool, GameError> {
    match session.pairing {
        PairingState::Idle => {
            session.pairing = PairingState::Searching;
            info!("searching for an opponent");
            Ok(true)
        }
        PairingState::Searching => {
            debug!("already searching");
            Ok(false)
        }
        PairingState::Connected => Err(GameError::InvalidTransition {
            from: PairingState::Connected,
            event: "begin pairing",
        }),
    }
}

/// Enter a match with `opponent`. Only valid while searching.
pub fn on_connected(session: &mut Session, opponent: String) -> Result<(), GameError> {
    if session.pairing != PairingState::Searching {
        return Err(GameError::InvalidTransition {
            from: session.pairing,
            event: "connect",
        });
    }

    // Drop anything stale before the first round
    session.reset();
    info!(%opponent, "connected");
    session.pairing = PairingState::Connected;
    session.opponent = Some(opponent);

    Ok(())
}

/// The sole reset path. Safe from any state, including when already idle.
///
/// Pending choices are discarded without scoring. Returns the final tally when
/// a match was actually in progress.
pub fn on_disconnected(session: &mut Session) -> Option<MatchSummary> {
    let summary = match (session.pairing, session.opponent.take()) {
        (PairingState::Connected, Some(opponent)) => Some(MatchSummary {
            opponent,
            rounds_played: session.rounds_played,
            local_score: session.local_score,
            remote_score: session.remote_score,
        }),
        _ => None,
    };

    if session.local_choice.is_some() || session.remote_choice.is_some() {
        debug!("discarding pending round");
    }
    if session.pairing != PairingState::Idle {
        info!(from = %session.pairing, "disconnected");
    }
    session.reset();

    summary
}
