#![forbid(unsafe_code)]

//! Request ledger and completion channel for content fetches.
//!
//! A host hands out tickets through [`FetchChannel::issue`], performs the
//! transport however it likes, and reports back through either
//! [`FetchChannel::resolve`] (same thread, by ticket) or a
//! [`FetchCompleter`] (any thread, full completion). Both paths feed one
//! `mpsc` channel; [`FetchChannel::drain`] empties it so each completion can
//! be dispatched as a fresh event.

use std::collections::BTreeMap;
use std::sync::mpsc;

use domkit_core::host::{FetchCompletion, FetchOutcome, FetchTicket, NodeId};

/// An issued request that has not completed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Ticket handed back to the widget.
    pub ticket: FetchTicket,
    /// Element of the requesting instance.
    pub owner: NodeId,
    /// Requested source.
    pub url: String,
}

/// Cloneable handle that delivers completions into a [`FetchChannel`].
#[derive(Debug, Clone)]
pub struct FetchCompleter {
    sender: mpsc::Sender<FetchCompletion>,
}

impl FetchCompleter {
    /// Deliver a completion. Returns `false` if the channel is gone.
    pub fn complete(&self, completion: FetchCompletion) -> bool {
        self.sender.send(completion).is_ok()
    }
}

/// Tracks outstanding requests and collects their completions.
#[derive(Debug)]
pub struct FetchChannel {
    next_ticket: u64,
    in_flight: BTreeMap<FetchTicket, FetchRequest>,
    sender: mpsc::Sender<FetchCompletion>,
    receiver: mpsc::Receiver<FetchCompletion>,
}

impl Default for FetchChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchChannel {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            next_ticket: 0,
            in_flight: BTreeMap::new(),
            sender,
            receiver,
        }
    }

    /// Record a new request and return its ticket.
    pub fn issue(&mut self, owner: NodeId, url: &str) -> FetchTicket {
        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        tracing::debug!(ticket = ticket.0, owner = owner.0, url, "fetch issued");
        self.in_flight.insert(
            ticket,
            FetchRequest {
                ticket,
                owner,
                url: url.to_owned(),
            },
        );
        ticket
    }

    /// Requests that have not been resolved, in issue order.
    pub fn in_flight(&self) -> impl Iterator<Item = &FetchRequest> {
        self.in_flight.values()
    }

    /// Number of unresolved requests.
    #[must_use]
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Resolve an in-flight request by ticket.
    ///
    /// Returns `false` for unknown or already-resolved tickets.
    pub fn resolve(&mut self, ticket: FetchTicket, outcome: FetchOutcome) -> bool {
        let Some(request) = self.in_flight.remove(&ticket) else {
            tracing::warn!(ticket = ticket.0, "resolve for unknown fetch ticket");
            return false;
        };
        tracing::debug!(
            ticket = ticket.0,
            url = request.url.as_str(),
            success = outcome.is_success(),
            "fetch resolved"
        );
        self.sender
            .send(FetchCompletion {
                ticket,
                owner: request.owner,
                url: request.url,
                outcome,
            })
            .is_ok()
    }

    /// Handle for delivering completions from elsewhere.
    #[must_use]
    pub fn completer(&self) -> FetchCompleter {
        FetchCompleter {
            sender: self.sender.clone(),
        }
    }

    /// Take every completion delivered so far, in arrival order.
    pub fn drain(&mut self) -> Vec<FetchCompletion> {
        let mut out = Vec::new();
        while let Ok(done) = self.receiver.try_recv() {
            self.in_flight.remove(&done.ticket);
            out.push(done);
        }
        out
    }
}
