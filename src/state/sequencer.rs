//! Ordering of bot replies from overlapping submissions.
//!
//! With [`ReplyOrdering::Arrival`] a reply is released the moment it
//! resolves. With [`ReplyOrdering::Fifo`] replies are released in ticket
//! order; an early reply is parked until every earlier ticket resolved or
//! was abandoned.

#[cfg(test)]
#[path = "sequencer_test.rs"]
mod sequencer_test;

use std::collections::BTreeMap;

use crate::config::ReplyOrdering;
use crate::net::types::ReplyPayload;

/// Issue-order position of one submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct ReplySequencer {
    ordering: ReplyOrdering,
    next_ticket: u64,
    next_release: u64,
    /// Settled tickets not yet released; `None` marks an abandoned ticket.
    parked: BTreeMap<u64, Option<ReplyPayload>>,
}

impl ReplySequencer {
    pub fn new(ordering: ReplyOrdering) -> Self {
        Self { ordering, ..Self::default() }
    }

    pub fn issue(&mut self) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    /// Record a resolved reply and return every reply now ready to append, in order.
    pub fn resolve(&mut self, ticket: Ticket, reply: ReplyPayload) -> Vec<ReplyPayload> {
        if self.ordering == ReplyOrdering::Arrival {
            return vec![reply];
        }

        self.parked.insert(ticket.0, Some(reply));
        let ready = self.release();
        if ready.is_empty() {
            log::debug!(
                "chat: parked reply for ticket {} until ticket {} resolves",
                ticket.0,
                self.next_release
            );
        }
        ready
    }

    /// Give up on a ticket whose reply will never arrive.
    ///
    /// Returns the replies that were only waiting on it.
    pub fn abandon(&mut self, ticket: Ticket) -> Vec<ReplyPayload> {
        if self.ordering == ReplyOrdering::Arrival || ticket.0 < self.next_release {
            return Vec::new();
        }
        self.parked.insert(ticket.0, None);
        self.release()
    }

    fn release(&mut self) -> Vec<ReplyPayload> {
        let mut ready = Vec::new();
        while let Some(slot) = self.parked.remove(&self.next_release) {
            ready.extend(slot);
            self.next_release += 1;
        }
        ready
    }

    /// Replies resolved but held back behind an earlier ticket.
    #[cfg(test)]
    fn parked(&self) -> usize {
        self.parked.values().filter(|slot| slot.is_some()).count()
    }
}
