//! Choices and the outcome relation

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// A hand played in a round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Rock beats scissors, scissors beats paper, paper beats rock.
    pub fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Scissors, Choice::Paper)
                | (Choice::Paper, Choice::Rock)
        )
    }

    /// Uppercase name, also the wire token
    pub fn name(self) -> &'static str {
        match self {
            Choice::Rock => "ROCK",
            Choice::Paper => "PAPER",
            Choice::Scissors => "SCISSORS",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-sensitive: only the exact uppercase names parse.
impl FromStr for Choice {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Choice::ALL
            .into_iter()
            .find(|choice| choice.name() == s)
            .ok_or_else(|| GameError::InvalidChoiceEncoding {
                payload: s.to_owned(),
            })
    }
}

/// Result of a round from the local participant's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    LocalWin,
    Tie,
    RemoteWin,
}

impl Outcome {
    /// Pure and total over the 3x3 choice space
    pub fn of(local: Choice, remote: Choice) -> Self {
        if local.beats(remote) {
            Outcome::LocalWin
        } else if local == remote {
            Outcome::Tie
        } else {
            Outcome::RemoteWin
        }
    }

    /// Points awarded as (local, remote)
    pub fn points(self) -> (u32, u32) {
        match self {
            Outcome::LocalWin => (1, 0),
            Outcome::Tie => (0, 0),
            Outcome::RemoteWin => (0, 1),
        }
    }

    /// Status line shown after a round, e.g. `ROCK beats SCISSORS`
    pub fn describe(self, local: Choice, remote: Choice) -> String {
        match self {
            Outcome::LocalWin => format!("{local} beats {remote}"),
            Outcome::Tie => format!("You both chose {local}"),
            Outcome::RemoteWin => format!("{local} loses to {remote}"),
        }
    }
}
