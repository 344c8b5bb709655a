//! What the screen shows, folded from notifications

use serde::{Deserialize, Serialize};

use crate::game::Notification;

const NO_OPPONENT: &str = "opponent\n(none yet)";
const IDLE_STATUS: &str = "...";
const IDLE_SCORE: &str = ":";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub my_label: String,
    pub opponent_label: String,
    pub status: String,
    pub score: String,
    /// Rock/paper/scissors buttons
    pub controls_enabled: bool,
    pub find_opponent_visible: bool,
    pub disconnect_visible: bool,
}

impl ViewState {
    pub fn new(codename: &str) -> Self {
        Self {
            my_label: format!("You\n({codename})"),
            opponent_label: NO_OPPONENT.to_owned(),
            status: IDLE_STATUS.to_owned(),
            score: IDLE_SCORE.to_owned(),
            controls_enabled: false,
            find_opponent_visible: true,
            disconnect_visible: false,
        }
    }

    pub fn apply(&mut self, notification: &Notification) {
        match notification {
            Notification::Searching => {
                self.status = "Searching for opponents...".to_owned();
                self.find_opponent_visible = false;
                self.disconnect_visible = true;
            }
            Notification::Connected { opponent } => {
                self.opponent_label = format!("Opponent\n({opponent})");
                self.status = "Connected".to_owned();
                self.score = "0 : 0".to_owned();
            }
            Notification::ChoiceLocked(choice) => {
                self.status = format!("You chose {choice}");
            }
            Notification::ControlsEnabled(enabled) => self.controls_enabled = *enabled,
            Notification::RoundResolved(result) => {
                self.status = result.status_text();
                self.score = result.score_text();
            }
            Notification::Reset => {
                self.opponent_label = NO_OPPONENT.to_owned();
                self.status = IDLE_STATUS.to_owned();
                self.score = IDLE_SCORE.to_owned();
                self.controls_enabled = false;
                self.find_opponent_visible = true;
                self.disconnect_visible = false;
            }
            Notification::Send(_) | Notification::MatchEnded(_) => {}
        }
    }

    pub fn apply_all<'a>(&mut self, notifications: impl IntoIterator<Item = &'a Notification>) {
        for notification in notifications {
            self.apply(notification);
        }
    }
}
