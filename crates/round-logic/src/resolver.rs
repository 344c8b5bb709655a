//! Round resolution
//!
//! Each side holds at most one pending choice. A resubmission before the round
//! resolves overwrites the earlier choice; only the latest one counts. The round
//! resolves exactly once, inside whichever call completes the pair.

use tracing::{debug, info};

use crate::choice::{Choice, Outcome};
use crate::error::GameError;
use crate::session::{RoundResult, Session, Side};

pub fn submit_local_choice(
    session: &mut Session,
    choice: Choice,
) -> Result<Option<RoundResult>, GameError> {
    submit(session, Side::Local, choice)
}

pub fn receive_remote_choice(
    session: &mut Session,
    choice: Choice,
) -> Result<Option<RoundResult>, GameError> {
    submit(session, Side::Remote, choice)
}

fn submit(
    session: &mut Session,
    side: Side,
    choice: Choice,
) -> Result<Option<RoundResult>, GameError> {
    if !session.is_connected() {
        return Err(GameError::SubmissionWhileDisconnected { side });
    }

    let slot = match side {
        Side::Local => &mut session.local_choice,
        Side::Remote => &mut session.remote_choice,
    };
    if let Some(previous) = slot.replace(choice) {
        debug!(%side, %previous, %choice, "choice overwritten before resolution");
    } else {
        debug!(%side, %choice, "choice submitted");
    }

    Ok(resolve(session))
}

/// Scores and clears the round if both choices are present.
fn resolve(session: &mut Session) -> Option<RoundResult> {
    let (Some(local), Some(remote)) = (session.local_choice, session.remote_choice) else {
        return None;
    };

    let outcome = Outcome::of(local, remote);
    let (local_points, remote_points) = outcome.points();
    session.local_score += local_points;
    session.remote_score += remote_points;
    session.clear_round();

    let result = RoundResult {
        round: session.rounds_played,
        local,
        remote,
        outcome,
        local_score: session.local_score,
        remote_score: session.remote_score,
    };
    session.rounds_played += 1;

    info!(
        round = result.round,
        %local,
        %remote,
        ?outcome,
        score = %session.score_text(),
        "round resolved"
    );

    Some(result)
}
