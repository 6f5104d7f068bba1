//! Connectivity Monitor: online/offline state and transition fan-out.
//!
//! # Invariants
//! - `is_online` changes only through `set_online`.
//! - Each transition is delivered once to every live subscriber; repeated
//!   reports of the current state produce no event.

use log::info;
use std::sync::mpsc::{channel, Receiver, Sender};

/// One reachability transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    BecameOnline,
    BecameOffline,
}

impl ConnectivityEvent {
    pub fn is_online(self) -> bool {
        matches!(self, Self::BecameOnline)
    }
}

#[derive(Debug)]
pub struct ConnectivityMonitor {
    online: bool,
    subscribers: Vec<Sender<ConnectivityEvent>>,
}

impl ConnectivityMonitor {
    /// Starts from the platform-reported status.
    pub fn new(initially_online: bool) -> Self {
        Self {
            online: initially_online,
            subscribers: Vec::new(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Registers a subscriber for future transitions.
    pub fn subscribe(&mut self) -> Receiver<ConnectivityEvent> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    /// Applies a platform signal; returns the transition, if any.
    pub fn set_online(&mut self, online: bool) -> Option<ConnectivityEvent> {
        if self.online == online {
            return None;
        }
        self.online = online;
        let event = if online {
            ConnectivityEvent::BecameOnline
        } else {
            ConnectivityEvent::BecameOffline
        };
        info!(
            "event=connectivity_change module=connectivity status=ok online={} subscribers={}",
            online,
            self.subscribers.len()
        );
        self.subscribers
            .retain(|subscriber| subscriber.send(event).is_ok());
        Some(event)
    }
}
