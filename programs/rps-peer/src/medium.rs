//! In-memory proximity medium
//!
//! Stands in for the connectivity service: endpoints advertise and discover
//! under a service id, a discovering endpoint gets paired with an advertising
//! one, and payloads are forwarded between paired endpoints in order.
//!
//! As with real proximity links, the side that calls [`Link::disconnect`] gets
//! no `Disconnected` event; only the other side does.

use std::collections::BTreeMap;

use round_logic::Topology;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::PeerError;

pub type EndpointId = String;

/// Callbacks delivered to an endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    Connected { endpoint_id: EndpointId, name: String },
    Disconnected { endpoint_id: EndpointId },
    Payload { endpoint_id: EndpointId, bytes: Vec<u8> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Service {
    id: String,
    topology: Topology,
}

#[derive(Debug)]
enum Request {
    Join {
        name: String,
        events: mpsc::UnboundedSender<LinkEvent>,
        reply: oneshot::Sender<EndpointId>,
    },
    Advertise { endpoint_id: EndpointId, service: Service },
    Discover { endpoint_id: EndpointId, service: Service },
    StopAdvertising { endpoint_id: EndpointId },
    StopDiscovery { endpoint_id: EndpointId },
    Send { from: EndpointId, to: EndpointId, bytes: Vec<u8> },
    Disconnect { from: EndpointId, to: EndpointId },
    DisconnectAll { endpoint_id: EndpointId },
    Leave { endpoint_id: EndpointId },
}

/// Handle to the broker task; cheap to clone
#[derive(Clone, Debug)]
pub struct Medium {
    requests: mpsc::UnboundedSender<Request>,
}

impl Medium {
    /// Start the broker on the current tokio runtime
    pub fn spawn() -> Self {
        let (requests, inbox) = mpsc::unbounded_channel();
        drop(tokio::spawn(Broker::default().run(inbox)));
        Self { requests }
    }

    /// Register an endpoint advertised under `name`
    pub async fn join(
        &self,
        name: &str,
    ) -> Result<(Link, mpsc::UnboundedReceiver<LinkEvent>), PeerError> {
        let (events, receiver) = mpsc::unbounded_channel();
        let (reply, endpoint_id) = oneshot::channel();
        self.requests
            .send(Request::Join {
                name: name.to_owned(),
                events,
                reply,
            })
            .map_err(|_| PeerError::MediumClosed)?;
        let endpoint_id = endpoint_id.await.map_err(|_| PeerError::MediumClosed)?;

        let link = Link {
            endpoint_id,
            requests: self.requests.clone(),
        };
        Ok((link, receiver))
    }
}

/// One endpoint's view of the medium. Leaves the medium when dropped.
#[derive(Debug)]
pub struct Link {
    endpoint_id: EndpointId,
    requests: mpsc::UnboundedSender<Request>,
}

impl Link {
    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    fn request(&self, request: Request) -> Result<(), PeerError> {
        self.requests
            .send(request)
            .map_err(|_| PeerError::MediumClosed)
    }

    fn service(service_id: &str, topology: Topology) -> Service {
        Service {
            id: service_id.to_owned(),
            topology,
        }
    }

    pub fn start_advertising(&self, service_id: &str, topology: Topology) -> Result<(), PeerError> {
        self.request(Request::Advertise {
            endpoint_id: self.endpoint_id.clone(),
            service: Self::service(service_id, topology),
        })
    }

    pub fn start_discovery(&self, service_id: &str, topology: Topology) -> Result<(), PeerError> {
        self.request(Request::Discover {
            endpoint_id: self.endpoint_id.clone(),
            service: Self::service(service_id, topology),
        })
    }

    pub fn stop_advertising(&self) -> Result<(), PeerError> {
        self.request(Request::StopAdvertising {
            endpoint_id: self.endpoint_id.clone(),
        })
    }

    pub fn stop_discovery(&self) -> Result<(), PeerError> {
        self.request(Request::StopDiscovery {
            endpoint_id: self.endpoint_id.clone(),
        })
    }

    pub fn send_payload(&self, to: &str, bytes: Vec<u8>) -> Result<(), PeerError> {
        self.request(Request::Send {
            from: self.endpoint_id.clone(),
            to: to.to_owned(),
            bytes,
        })
    }

    pub fn disconnect(&self, to: &str) -> Result<(), PeerError> {
        self.request(Request::Disconnect {
            from: self.endpoint_id.clone(),
            to: to.to_owned(),
        })
    }

    pub fn stop_all_endpoints(&self) -> Result<(), PeerError> {
        self.request(Request::DisconnectAll {
            endpoint_id: self.endpoint_id.clone(),
        })
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        // broker may already be gone
        let _ = self.requests.send(Request::Leave {
            endpoint_id: self.endpoint_id.clone(),
        });
    }
}

#[derive(Debug)]
struct Endpoint {
    name: String,
    events: mpsc::UnboundedSender<LinkEvent>,
    advertising: Option<Service>,
    discovering: Option<Service>,
    peer: Option<EndpointId>,
}

#[derive(Debug, Default)]
struct Broker {
    endpoints: BTreeMap<EndpointId, Endpoint>,
    next_id: u32,
}

impl Broker {
    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = inbox.recv().await {
            self.handle(request);
        }
        debug!("medium shut down");
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Join {
                name,
                events,
                reply,
            } => {
                self.next_id += 1;
                let endpoint_id = format!("{:04X}", self.next_id);
                debug!(%endpoint_id, %name, "endpoint joined");
                let _ = self.endpoints.insert(
                    endpoint_id.clone(),
                    Endpoint {
                        name,
                        events,
                        advertising: None,
                        discovering: None,
                        peer: None,
                    },
                );
                let _ = reply.send(endpoint_id);
            }
            Request::Advertise {
                endpoint_id,
                service,
            } => {
                if let Some(endpoint) = self.endpoints.get_mut(&endpoint_id) {
                    endpoint.advertising = Some(service);
                }
                self.pair_waiting();
            }
            Request::Discover {
                endpoint_id,
                service,
            } => {
                if let Some(endpoint) = self.endpoints.get_mut(&endpoint_id) {
                    endpoint.discovering = Some(service);
                }
                self.pair_waiting();
            }
            Request::StopAdvertising { endpoint_id } => {
                if let Some(endpoint) = self.endpoints.get_mut(&endpoint_id) {
                    endpoint.advertising = None;
                }
            }
            Request::StopDiscovery { endpoint_id } => {
                if let Some(endpoint) = self.endpoints.get_mut(&endpoint_id) {
                    endpoint.discovering = None;
                }
            }
            Request::Send { from, to, bytes } => {
                if !self.are_paired(&from, &to) {
                    debug!(%from, %to, "dropping payload for unpaired endpoint");
                    return;
                }
                self.deliver(
                    &to,
                    LinkEvent::Payload {
                        endpoint_id: from,
                        bytes,
                    },
                );
            }
            Request::Disconnect { from, to } => {
                if self.are_paired(&from, &to) {
                    self.sever(&from);
                }
            }
            Request::DisconnectAll { endpoint_id } => self.sever(&endpoint_id),
            Request::Leave { endpoint_id } => {
                self.sever(&endpoint_id);
                let _ = self.endpoints.remove(&endpoint_id);
                debug!(%endpoint_id, "endpoint left");
            }
        }
    }

    fn are_paired(&self, a: &str, b: &str) -> bool {
        self.endpoints
            .get(a)
            .is_some_and(|endpoint| endpoint.peer.as_deref() == Some(b))
    }

    fn deliver(&self, endpoint_id: &str, event: LinkEvent) {
        if let Some(endpoint) = self.endpoints.get(endpoint_id) {
            if endpoint.events.send(event).is_err() {
                debug!(%endpoint_id, "endpoint no longer listening");
            }
        }
    }

    /// Pair every unpaired discoverer with a matching unpaired advertiser
    fn pair_waiting(&mut self) {
        while let Some((seeker, host)) = self.find_pair() {
            self.connect(&seeker, &host);
        }
    }

    fn find_pair(&self) -> Option<(EndpointId, EndpointId)> {
        self.endpoints
            .iter()
            .filter(|(_, endpoint)| endpoint.peer.is_none())
            .find_map(|(seeker_id, seeker)| {
                let wanted = seeker.discovering.as_ref()?;
                self.endpoints
                    .iter()
                    .find(|(host_id, host)| {
                        *host_id != seeker_id
                            && host.peer.is_none()
                            && host.advertising.as_ref() == Some(wanted)
                    })
                    .map(|(host_id, _)| (seeker_id.clone(), host_id.clone()))
            })
    }

    fn connect(&mut self, a: &str, b: &str) {
        let Some(a_name) = self.link_to(a, b) else {
            return;
        };
        let Some(b_name) = self.link_to(b, a) else {
            return;
        };
        info!(%a, %b, "endpoints connected");

        self.deliver(
            a,
            LinkEvent::Connected {
                endpoint_id: b.to_owned(),
                name: b_name,
            },
        );
        self.deliver(
            b,
            LinkEvent::Connected {
                endpoint_id: a.to_owned(),
                name: a_name,
            },
        );
    }

    /// Point `from` at `to`, returning `from`'s name
    fn link_to(&mut self, from: &str, to: &str) -> Option<String> {
        let endpoint = self.endpoints.get_mut(from)?;
        endpoint.peer = Some(to.to_owned());
        Some(endpoint.name.clone())
    }

    /// Break `endpoint_id`'s connection, notifying only the other side
    fn sever(&mut self, endpoint_id: &str) {
        let Some(peer) = self
            .endpoints
            .get_mut(endpoint_id)
            .and_then(|endpoint| endpoint.peer.take())
        else {
            return;
        };
        if let Some(other) = self.endpoints.get_mut(&peer) {
            other.peer = None;
        }
        info!(%endpoint_id, %peer, "endpoints disconnected");
        self.deliver(
            &peer,
            LinkEvent::Disconnected {
                endpoint_id: endpoint_id.to_owned(),
            },
        );
    }
}
