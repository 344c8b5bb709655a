//! Plays a match between two local peers with seeded random choices

use round_logic::{
    generate_codename, Choice, GameConfig, MatchSummary, Notification, RoundResult, SeededRng,
    ViewState,
};
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::PeerError;
use crate::medium::Medium;
use crate::peer::{Peer, PeerUpdate};

#[derive(Clone, Debug)]
pub struct MatchReport {
    pub host: String,
    pub guest: String,
    /// From the host's point of view
    pub rounds: Vec<RoundResult>,
    pub summary: Option<MatchSummary>,
    pub host_view: ViewState,
    pub guest_view: ViewState,
}

fn pick(rng: &mut SeededRng) -> Choice {
    Choice::ALL[rng.next_below(Choice::ALL.len())]
}

/// Pair two fresh peers, play `rounds` rounds (at least one), then have the
/// host disconnect.
pub async fn play_match(
    medium: &Medium,
    config: &GameConfig,
    rounds: u32,
    rng: &mut SeededRng,
) -> Result<MatchReport, PeerError> {
    let rounds = rounds.max(1) as usize;
    let host_name = config.codename(rng);
    let guest_name = generate_codename(rng);
    // one stream per side: the n-th choice of each depends only on the seed
    let mut host_rng = SeededRng::from_u64(rng.next_u64());
    let mut guest_rng = SeededRng::from_u64(rng.next_u64());

    let (host, mut host_updates) = Peer::spawn(medium, config.clone(), host_name).await?;
    let (guest, mut guest_updates) = Peer::spawn(medium, config.clone(), guest_name).await?;
    host.find_opponent()?;
    guest.find_opponent()?;

    let mut results = Vec::with_capacity(rounds);
    let mut summary = None;
    let mut finishing = false;

    loop {
        tokio::select! {
            update = host_updates.recv() => match update.ok_or(PeerError::PeerStopped)? {
                PeerUpdate::Notification(Notification::ControlsEnabled(true)) if !finishing => {
                    host.choose(pick(&mut host_rng))?;
                }
                PeerUpdate::Notification(Notification::RoundResolved(result)) => {
                    results.push(result);
                    if results.len() >= rounds && !finishing {
                        finishing = true;
                        host.disconnect()?;
                    }
                }
                PeerUpdate::Notification(Notification::MatchEnded(ended)) => summary = Some(ended),
                PeerUpdate::Warning(warning) => warn!(peer = %host.codename(), %warning),
                PeerUpdate::Notification(_) => {}
            },
            update = guest_updates.recv() => match update.ok_or(PeerError::PeerStopped)? {
                PeerUpdate::Notification(Notification::ControlsEnabled(true)) if !finishing => {
                    guest.choose(pick(&mut guest_rng))?;
                }
                // the guest has seen the host leave
                PeerUpdate::Notification(Notification::Reset) if finishing => break,
                PeerUpdate::Warning(warning) => warn!(peer = %guest.codename(), %warning),
                PeerUpdate::Notification(_) => {}
            },
        }
    }

    let (host_name, guest_name) = (host.codename().to_owned(), guest.codename().to_owned());
    let host_view = host.stop().await?;
    let guest_view = guest.stop().await?;
    drain_summary(&mut host_updates, &mut summary);

    Ok(MatchReport {
        host: host_name,
        guest: guest_name,
        rounds: results,
        summary,
        host_view,
        guest_view,
    })
}

fn drain_summary(
    updates: &mut mpsc::UnboundedReceiver<PeerUpdate>,
    summary: &mut Option<MatchSummary>,
) {
    while let Ok(update) = updates.try_recv() {
        if let PeerUpdate::Notification(Notification::MatchEnded(ended)) = update {
            *summary = Some(ended);
        }
    }
}

