//! A single participant
//!
//! Each peer runs as one task. UI commands and link callbacks are pulled off
//! their channels one at a time and applied to the [`Game`], so a local
//! submission and an arriving remote choice never interleave.

use round_logic::{Choice, Game, GameConfig, GameEvent, Notification, ViewState};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::PeerError;
use crate::medium::{EndpointId, Link, LinkEvent, Medium};

/// Actions a player (or a script) can take
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerCommand {
    FindOpponent,
    Choose(Choice),
    Disconnect,
    Stop,
}

/// What the observer of a peer gets to see
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerUpdate {
    Notification(Notification),
    /// Rejected payload, submission or transition; the peer keeps running
    Warning(String),
}

#[derive(Debug)]
pub struct PeerHandle {
    codename: String,
    endpoint_id: EndpointId,
    commands: mpsc::UnboundedSender<PeerCommand>,
    task: JoinHandle<ViewState>,
}

impl PeerHandle {
    pub fn codename(&self) -> &str {
        &self.codename
    }

    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    pub fn send(&self, command: PeerCommand) -> Result<(), PeerError> {
        self.commands
            .send(command)
            .map_err(|_| PeerError::PeerStopped)
    }

    pub fn find_opponent(&self) -> Result<(), PeerError> {
        self.send(PeerCommand::FindOpponent)
    }

    pub fn choose(&self, choice: Choice) -> Result<(), PeerError> {
        self.send(PeerCommand::Choose(choice))
    }

    pub fn disconnect(&self) -> Result<(), PeerError> {
        self.send(PeerCommand::Disconnect)
    }

    /// Tear down and wait for the task; returns the final view
    pub async fn stop(self) -> Result<ViewState, PeerError> {
        // already stopped is fine, the join below still reports the view
        let _ = self.commands.send(PeerCommand::Stop);
        Ok(self.task.await?)
    }
}

pub struct Peer {
    config: GameConfig,
    codename: String,
    game: Game,
    view: ViewState,
    link: Link,
    opponent_endpoint: Option<EndpointId>,
    updates: mpsc::UnboundedSender<PeerUpdate>,
}

impl Peer {
    /// Join `medium` as `codename` and start the peer task
    pub async fn spawn(
        medium: &Medium,
        config: GameConfig,
        codename: String,
    ) -> Result<(PeerHandle, mpsc::UnboundedReceiver<PeerUpdate>), PeerError> {
        let (link, link_events) = medium.join(&codename).await?;
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (updates, update_rx) = mpsc::unbounded_channel();
        let endpoint_id = link.endpoint_id().to_owned();

        let peer = Peer {
            config,
            codename: codename.clone(),
            game: Game::new(),
            view: ViewState::new(&codename),
            link,
            opponent_endpoint: None,
            updates,
        };
        let task = tokio::spawn(peer.run(command_rx, link_events));

        let handle = PeerHandle {
            codename,
            endpoint_id,
            commands,
            task,
        };
        Ok((handle, update_rx))
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<PeerCommand>,
        mut link_events: mpsc::UnboundedReceiver<LinkEvent>,
    ) -> ViewState {
        info!(codename = %self.codename, endpoint = %self.link.endpoint_id(), "peer started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(PeerCommand::Stop) | None => break,
                    Some(command) => self.on_command(command),
                },
                event = link_events.recv() => match event {
                    Some(event) => self.on_link_event(event),
                    None => {
                        warn!(codename = %self.codename, "medium closed");
                        break;
                    }
                },
            }
        }

        self.teardown();
        self.view
    }

    fn on_command(&mut self, command: PeerCommand) {
        match command {
            PeerCommand::FindOpponent => {
                self.dispatch(GameEvent::BeginPairing);
            }
            // one choice in flight per round, the opponent already has it
            PeerCommand::Choose(choice) if self.game.session().local_choice().is_some() => {
                warn!(codename = %self.codename, %choice, "choice already locked in");
                self.publish(PeerUpdate::Warning(format!(
                    "choice already locked in, {choice} ignored until the round resolves"
                )));
            }
            PeerCommand::Choose(choice) => {
                self.dispatch(GameEvent::LocalChoice(choice));
            }
            PeerCommand::Disconnect => {
                if let Some(endpoint_id) = self.opponent_endpoint.take() {
                    self.check(self.link.disconnect(&endpoint_id));
                }
                self.stop_searching();
                self.dispatch(GameEvent::Disconnected);
            }
            PeerCommand::Stop => {}
        }
    }

    fn on_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Connected { endpoint_id, name } => {
                self.stop_searching();
                self.opponent_endpoint = Some(endpoint_id.clone());
                if !self.dispatch(GameEvent::Connected { opponent: name }) {
                    self.opponent_endpoint = None;
                    self.check(self.link.disconnect(&endpoint_id));
                }
            }
            LinkEvent::Disconnected { endpoint_id } => {
                if self.opponent_endpoint.as_deref() != Some(endpoint_id.as_str()) {
                    debug!(%endpoint_id, "disconnect from a stranger");
                    return;
                }
                self.opponent_endpoint = None;
                self.dispatch(GameEvent::Disconnected);
            }
            LinkEvent::Payload { endpoint_id, bytes } => {
                if self.opponent_endpoint.as_deref() != Some(endpoint_id.as_str()) {
                    debug!(%endpoint_id, "payload from a stranger");
                    return;
                }
                self.dispatch(GameEvent::RemotePayload(bytes));
            }
        }
    }

    /// Apply one event to the game. Returns whether the game accepted it.
    fn dispatch(&mut self, event: GameEvent) -> bool {
        match self.game.handle(event) {
            Ok(notifications) => {
                for notification in notifications {
                    self.perform(&notification);
                    self.view.apply(&notification);
                    self.publish(PeerUpdate::Notification(notification));
                }
                true
            }
            Err(err) => {
                warn!(codename = %self.codename, %err, "event rejected");
                self.publish(PeerUpdate::Warning(err.to_string()));
                false
            }
        }
    }

    /// Side effects on the link
    fn perform(&self, notification: &Notification) {
        match notification {
            Notification::Searching => {
                let (service_id, topology) = (&self.config.service_id, self.config.topology);
                self.check(self.link.start_advertising(service_id, topology));
                self.check(self.link.start_discovery(service_id, topology));
            }
            Notification::Send(bytes) => match &self.opponent_endpoint {
                Some(endpoint_id) => self.check(self.link.send_payload(endpoint_id, bytes.clone())),
                None => warn!(codename = %self.codename, "no opponent to send to"),
            },
            Notification::MatchEnded(summary) => info!(
                codename = %self.codename,
                opponent = %summary.opponent,
                rounds = summary.rounds_played,
                score = %format!("{} : {}", summary.local_score, summary.remote_score),
                "match ended"
            ),
            _ => {}
        }
    }

    fn publish(&self, update: PeerUpdate) {
        if self.updates.send(update).is_err() {
            debug!(codename = %self.codename, "observer gone");
        }
    }

    fn stop_searching(&self) {
        self.check(self.link.stop_advertising());
        self.check(self.link.stop_discovery());
    }

    fn check(&self, result: Result<(), PeerError>) {
        if let Err(err) = result {
            warn!(codename = %self.codename, %err, "link request failed");
        }
    }

    fn teardown(&mut self) {
        self.stop_searching();
        self.check(self.link.stop_all_endpoints());
        self.opponent_endpoint = None;
        self.dispatch(GameEvent::Disconnected);
        info!(codename = %self.codename, "peer stopped");
    }
}
