use std::time::Duration;

use round_logic::{
    Choice, GameConfig, MatchSummary, Notification, Outcome, RoundResult, SeededRng, ViewState,
};
use rps_peer::{play_match, LinkEvent, Medium, Peer, PeerHandle, PeerUpdate};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

async fn next_matching<T>(
    updates: &mut UnboundedReceiver<PeerUpdate>,
    mut select: impl FnMut(PeerUpdate) -> Option<T>,
) -> T {
    timeout(Duration::from_secs(5), async {
        while let Some(update) = updates.recv().await {
            if let Some(found) = select(update) {
                return found;
            }
        }
        panic!("update stream closed");
    })
    .await
    .expect("timed out waiting for update")
}

async fn next_round(updates: &mut UnboundedReceiver<PeerUpdate>) -> RoundResult {
    next_matching(updates, |update| match update {
        PeerUpdate::Notification(Notification::RoundResolved(result)) => Some(result),
        _ => None,
    })
    .await
}

async fn next_connected(updates: &mut UnboundedReceiver<PeerUpdate>) -> String {
    next_matching(updates, |update| match update {
        PeerUpdate::Notification(Notification::Connected { opponent }) => Some(opponent),
        _ => None,
    })
    .await
}

async fn pair(
    medium: &Medium,
) -> (
    (PeerHandle, UnboundedReceiver<PeerUpdate>),
    (PeerHandle, UnboundedReceiver<PeerUpdate>),
) {
    let config = GameConfig::default();
    let (host, mut host_updates) = Peer::spawn(medium, config.clone(), "Red Cupcake".to_owned())
        .await
        .unwrap();
    let (guest, mut guest_updates) = Peer::spawn(medium, config, "Blue Donut".to_owned())
        .await
        .unwrap();

    host.find_opponent().unwrap();
    guest.find_opponent().unwrap();
    assert_eq!(next_connected(&mut host_updates).await, "Blue Donut");
    assert_eq!(next_connected(&mut guest_updates).await, "Red Cupcake");

    ((host, host_updates), (guest, guest_updates))
}

#[tokio::test]
async fn test_two_peers_play_rounds() {
    let medium = Medium::spawn();
    let ((host, mut host_updates), (guest, mut guest_updates)) = pair(&medium).await;

    host.choose(Choice::Rock).unwrap();
    guest.choose(Choice::Scissors).unwrap();

    let host_round = next_round(&mut host_updates).await;
    assert_eq!(host_round.outcome, Outcome::LocalWin);
    assert_eq!(host_round.status_text(), "ROCK beats SCISSORS");
    assert_eq!(host_round.score_text(), "1 : 0");

    let guest_round = next_round(&mut guest_updates).await;
    assert_eq!(guest_round.outcome, Outcome::RemoteWin);
    assert_eq!(guest_round.status_text(), "SCISSORS loses to ROCK");
    assert_eq!(guest_round.score_text(), "0 : 1");

    guest.choose(Choice::Paper).unwrap();
    host.choose(Choice::Paper).unwrap();
    let host_round = next_round(&mut host_updates).await;
    assert_eq!(host_round.outcome, Outcome::Tie);
    assert_eq!(host_round.score_text(), "1 : 0");
    assert_eq!(next_round(&mut guest_updates).await.score_text(), "0 : 1");

    host.disconnect().unwrap();
    let summary = next_matching(&mut guest_updates, |update| match update {
        PeerUpdate::Notification(Notification::MatchEnded(summary)) => Some(summary),
        _ => None,
    })
    .await;
    assert_eq!(
        summary,
        MatchSummary {
            opponent: "Red Cupcake".to_owned(),
            rounds_played: 2,
            local_score: 0,
            remote_score: 1,
        }
    );

    assert_eq!(host.stop().await.unwrap(), ViewState::new("Red Cupcake"));
    assert_eq!(guest.stop().await.unwrap(), ViewState::new("Blue Donut"));
}

#[tokio::test]
async fn test_choice_before_pairing_is_a_warning() {
    let medium = Medium::spawn();
    let (peer, mut updates) = Peer::spawn(&medium, GameConfig::default(), "Green Pie".to_owned())
        .await
        .unwrap();

    peer.choose(Choice::Rock).unwrap();
    let warning = next_matching(&mut updates, |update| match update {
        PeerUpdate::Warning(warning) => Some(warning),
        _ => None,
    })
    .await;
    assert!(warning.contains("not connected"), "{warning}");

    // the task keeps running
    peer.find_opponent().unwrap();
    next_matching(&mut updates, |update| {
        (update == PeerUpdate::Notification(Notification::Searching)).then_some(())
    })
    .await;
    peer.stop().await.unwrap();
}

#[tokio::test]
async fn test_second_choice_in_a_round_is_refused() {
    let medium = Medium::spawn();
    let ((host, mut host_updates), (guest, mut guest_updates)) = pair(&medium).await;

    host.choose(Choice::Rock).unwrap();
    host.choose(Choice::Paper).unwrap();
    let warning = next_matching(&mut host_updates, |update| match update {
        PeerUpdate::Warning(warning) => Some(warning),
        _ => None,
    })
    .await;
    assert!(warning.contains("PAPER"), "{warning}");

    guest.choose(Choice::Scissors).unwrap();
    let host_round = next_round(&mut host_updates).await;
    let guest_round = next_round(&mut guest_updates).await;
    assert_eq!(host_round.status_text(), "ROCK beats SCISSORS");
    assert_eq!(guest_round.status_text(), "SCISSORS loses to ROCK");
    assert_eq!(
        (host_round.local, host_round.remote),
        (guest_round.remote, guest_round.local)
    );
    assert_eq!(host_round.score_text(), "1 : 0");
    assert_eq!(guest_round.score_text(), "0 : 1");

    // the refused choice never reached the guest, so the next round is clean
    guest.choose(Choice::Paper).unwrap();
    host.choose(Choice::Paper).unwrap();
    assert_eq!(next_round(&mut host_updates).await.outcome, Outcome::Tie);
    assert_eq!(next_round(&mut guest_updates).await.outcome, Outcome::Tie);

    host.stop().await.unwrap();
    guest.stop().await.unwrap();
}

#[tokio::test]
async fn test_malformed_payload_keeps_round_pending() {
    let medium = Medium::spawn();
    let config = GameConfig::default();

    let (raw, mut raw_events) = medium.join("Raw Endpoint").await.unwrap();
    raw.start_advertising(&config.service_id, config.topology).unwrap();

    let (peer, mut updates) = Peer::spawn(&medium, config, "Yellow Froyo".to_owned())
        .await
        .unwrap();
    peer.find_opponent().unwrap();
    assert_eq!(next_connected(&mut updates).await, "Raw Endpoint");

    let peer_id = match timeout(Duration::from_secs(5), raw_events.recv()).await.unwrap() {
        Some(LinkEvent::Connected { endpoint_id, name }) => {
            assert_eq!(name, "Yellow Froyo");
            endpoint_id
        }
        other => panic!("unexpected link event {other:?}"),
    };
    assert_eq!(peer_id, peer.endpoint_id());

    peer.choose(Choice::Rock).unwrap();
    assert_eq!(
        timeout(Duration::from_secs(5), raw_events.recv()).await.unwrap(),
        Some(LinkEvent::Payload {
            endpoint_id: peer_id.clone(),
            bytes: b"ROCK".to_vec(),
        })
    );

    raw.send_payload(&peer_id, b"Paper".to_vec()).unwrap();
    let warning = next_matching(&mut updates, |update| match update {
        PeerUpdate::Warning(warning) => Some(warning),
        _ => None,
    })
    .await;
    assert!(warning.contains("Paper"), "{warning}");

    raw.send_payload(&peer_id, b"PAPER".to_vec()).unwrap();
    let round = next_round(&mut updates).await;
    assert_eq!(round.local, Choice::Rock);
    assert_eq!(round.remote, Choice::Paper);
    assert_eq!(round.status_text(), "ROCK loses to PAPER");

    peer.stop().await.unwrap();
}

#[tokio::test]
async fn test_remote_leaving_resets_session() {
    let medium = Medium::spawn();
    let ((host, mut host_updates), (guest, mut guest_updates)) = pair(&medium).await;

    host.choose(Choice::Scissors).unwrap();
    guest.choose(Choice::Paper).unwrap();
    next_round(&mut host_updates).await;
    next_round(&mut guest_updates).await;

    // guest goes away mid-round
    guest.choose(Choice::Rock).unwrap();
    let guest_view = guest.stop().await.unwrap();
    assert_eq!(guest_view.score, ":");

    let summary = next_matching(&mut host_updates, |update| match update {
        PeerUpdate::Notification(Notification::MatchEnded(summary)) => Some(summary),
        _ => None,
    })
    .await;
    assert_eq!(summary.rounds_played, 1);
    assert_eq!((summary.local_score, summary.remote_score), (1, 0));

    let host_view = host.stop().await.unwrap();
    assert_eq!(host_view, ViewState::new("Red Cupcake"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_play_match_is_reproducible() {
    let config = GameConfig::default();

    let first = play_match(&Medium::spawn(), &config, 6, &mut SeededRng::from_u64(11))
        .await
        .unwrap();
    let second = play_match(&Medium::spawn(), &config, 6, &mut SeededRng::from_u64(11))
        .await
        .unwrap();

    assert_eq!(first.host, second.host);
    assert_eq!(first.guest, second.guest);
    assert_eq!(first.rounds.len(), 6);
    assert_eq!(first.rounds, second.rounds);

    let other = play_match(&Medium::spawn(), &config, 6, &mut SeededRng::from_u64(12))
        .await
        .unwrap();
    assert_ne!(
        (&first.host, &first.guest, &first.rounds),
        (&other.host, &other.guest, &other.rounds)
    );

    let last = &first.rounds[5];
    let summary = first.summary.clone().unwrap();
    assert_eq!(summary.opponent, first.guest);
    assert_eq!(summary.rounds_played, 6);
    assert_eq!(summary.local_score, last.local_score);
    assert_eq!(summary.remote_score, last.remote_score);
    assert_eq!(first.host_view, ViewState::new(&first.host));
    assert_eq!(first.guest_view, ViewState::new(&first.guest));
}
