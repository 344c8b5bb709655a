//! Peer configuration

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::codename::generate_codename;
use crate::random::SeededRng;

pub const DEFAULT_SERVICE_ID: &str = "com.example.rockpaperscissors";

/// Connection topology requested from the connectivity layer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    /// One hub, many spokes
    #[default]
    P2pStar,
    /// Many-to-many
    P2pCluster,
    /// Exactly one connection
    P2pPointToPoint,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Topology::P2pStar => "P2P_STAR",
            Topology::P2pCluster => "P2P_CLUSTER",
            Topology::P2pPointToPoint => "P2P_POINT_TO_POINT",
        })
    }
}

/// Every field is optional in the JSON form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Service both peers advertise and discover under
    pub service_id: String,
    pub topology: Topology,
    /// Fixed display name; generated when absent
    pub codename: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            service_id: DEFAULT_SERVICE_ID.to_owned(),
            topology: Topology::default(),
            codename: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The configured codename, or a generated one
    pub fn codename(&self, rng: &mut SeededRng) -> String {
        match &self.codename {
            Some(name) => name.clone(),
            None => generate_codename(rng),
        }
    }
}
