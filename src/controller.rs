//! Conversation controller: the send pipeline around [`ConversationState`].
//!
//! SYSTEM CONTEXT
//! ==============
//! UI actions land here. Panel and draft actions are applied immediately.
//! A submission is applied in two halves: the synchronous half (guard, user
//! turn, draft clear) runs when [`ConversationController::submit`] is
//! called, and the returned future appends the bot turn once the transport
//! resolves.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded. State sits behind `RefCell` and is never borrowed across
//! an await. Overlapping submissions are not serialized unless the config
//! asks for [`ReplyOrdering::Fifo`]. Pending futures hold only a weak
//! reference, so a reply that resolves after teardown or after the last
//! controller handle is dropped is discarded. Dropping a pending future
//! abandons its ticket so later FIFO replies are not held back forever.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use crate::config::{ReplyOrdering, WidgetConfig};
use crate::net::transport::{Transport, send_message};
use crate::net::types::ReplyPayload;
use crate::state::conversation::{ConversationState, Submission};
use crate::state::sequencer::{ReplySequencer, Ticket};

/// Change notifications delivered to subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversationEvent {
    PanelToggled { is_open: bool },
    DraftEdited,
    /// The log grew; `len` is its new length.
    MessageAppended { len: usize },
}

/// Result of awaiting a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or the controller was already torn down. Nothing was sent.
    Ignored,
    /// The reply was appended, or parked behind an earlier reply.
    Completed,
    /// The reply arrived after teardown and was dropped.
    Discarded,
}

/// Handle returned by [`ConversationController::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Rc<dyn Fn(&ConversationEvent)>;

struct Session {
    state: ConversationState,
    sequencer: ReplySequencer,
    torn_down: bool,
}

struct Inner {
    session: RefCell<Session>,
    observers: RefCell<Vec<(SubscriptionId, Observer)>>,
    next_subscription: Cell<u64>,
}

/// Cheaply cloneable handle; clones share one conversation.
#[derive(Clone)]
pub struct ConversationController {
    inner: Rc<Inner>,
    transport: Rc<dyn Transport>,
}

impl ConversationController {
    pub fn new(config: &WidgetConfig, transport: Rc<dyn Transport>) -> Self {
        Self::with_state(ConversationState::new(config.start_open), config.reply_ordering, transport)
    }

    pub fn with_state(state: ConversationState, ordering: ReplyOrdering, transport: Rc<dyn Transport>) -> Self {
        let session = Session { state, sequencer: ReplySequencer::new(ordering), torn_down: false };
        Self {
            inner: Rc::new(Inner {
                session: RefCell::new(session),
                observers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
            transport,
        }
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> ConversationState {
        self.inner.session.borrow().state.clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ConversationState) -> R) -> R {
        f(&self.inner.session.borrow().state)
    }

    #[cfg(test)]
    pub(crate) fn is_torn_down(&self) -> bool {
        self.inner.session.borrow().torn_down
    }

    pub fn toggle_panel(&self) {
        let event = self.inner.mutate(|state| ConversationEvent::PanelToggled { is_open: state.toggle_panel() });
        self.inner.notify(event.as_slice());
    }

    pub fn close_panel(&self) {
        let event = self.inner.mutate(|state| {
            state.close_panel().then_some(ConversationEvent::PanelToggled { is_open: false })
        });
        self.inner.notify(event.flatten().as_slice());
    }

    pub fn edit_draft(&self, text: impl Into<String>) {
        let text = text.into();
        let event = self.inner.mutate(|state| {
            state.edit_draft(text);
            ConversationEvent::DraftEdited
        });
        self.inner.notify(event.as_slice());
    }

    /// Submit typed text or a button click.
    ///
    /// The user turn (if any) and the draft clear are applied before this
    /// returns. The future resolves once the bot turn is handled and borrows
    /// nothing, so it can be handed straight to `spawn_local`.
    pub fn submit(&self, submission: Submission) -> impl Future<Output = SubmitOutcome> + use<> {
        let accepted = self
            .begin(&submission)
            .map(|(ticket, wire_text)| (PendingReply::new(Rc::downgrade(&self.inner), ticket), wire_text));
        let transport = Rc::clone(&self.transport);
        async move {
            let Some((pending, wire_text)) = accepted else {
                return SubmitOutcome::Ignored;
            };
            let reply = send_message(transport.as_ref(), &wire_text).await;
            pending.settle(reply)
        }
    }

    /// Submit whatever is currently in the draft as typed text.
    pub fn submit_draft(&self) -> impl Future<Output = SubmitOutcome> + use<> {
        let draft = self.read(|state| state.draft_input().to_owned());
        self.submit(Submission::UserText(draft))
    }

    /// Submit raw text, treating a `__CLICKED__:` prefix as a button click.
    pub fn submit_raw(&self, text: &str) -> impl Future<Output = SubmitOutcome> + use<> {
        self.submit(Submission::parse(text))
    }

    /// Activate a quick-reply button.
    pub fn activate_button(&self, value: &str) -> impl Future<Output = SubmitOutcome> + use<> {
        self.submit(Submission::ButtonClick(value.to_owned()))
    }

    /// Register an observer for state changes.
    pub fn subscribe(&self, observer: impl Fn(&ConversationEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.inner.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Stop accepting actions and drop every in-flight reply when it lands.
    pub fn teardown(&self) {
        self.inner.session.borrow_mut().torn_down = true;
        self.inner.observers.borrow_mut().clear();
    }

    fn begin(&self, submission: &Submission) -> Option<(Ticket, String)> {
        let mut events = Vec::new();
        let accepted = {
            let mut session = self.inner.session.borrow_mut();
            if session.torn_down {
                return None;
            }
            let had_draft = !session.state.draft_input().is_empty();
            let before = session.state.messages().len();
            let wire_text = session.state.begin_submit(submission)?;
            let after = session.state.messages().len();
            if after > before {
                events.push(ConversationEvent::MessageAppended { len: after });
            }
            if had_draft {
                events.push(ConversationEvent::DraftEdited);
            }
            (session.sequencer.issue(), wire_text)
        };
        self.inner.notify(&events);
        Some(accepted)
    }
}

impl Inner {
    /// Apply a state change unless torn down. The borrow ends before observers run.
    fn mutate<R>(&self, f: impl FnOnce(&mut ConversationState) -> R) -> Option<R> {
        let mut session = self.session.borrow_mut();
        if session.torn_down {
            return None;
        }
        Some(f(&mut session.state))
    }

    /// Release whatever was waiting on a ticket that will never resolve.
    fn abandon(&self, ticket: Ticket) {
        let events: Vec<ConversationEvent> = {
            let Ok(mut session) = self.session.try_borrow_mut() else {
                log::warn!("chat: could not abandon ticket while state is borrowed");
                return;
            };
            if session.torn_down {
                return;
            }
            let ready = session.sequencer.abandon(ticket);
            ready
                .into_iter()
                .map(|reply| ConversationEvent::MessageAppended { len: session.state.append_reply(reply) })
                .collect()
        };
        self.notify(&events);
    }

    fn notify(&self, events: &[ConversationEvent]) {
        if events.is_empty() {
            return;
        }
        let observers: Vec<Observer> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for event in events {
            for observer in &observers {
                observer(event);
            }
        }
    }
}

/// Ticket owned by an in-flight submission.
///
/// Dropped unsettled (the future was cancelled or never awaited), it
/// abandons the ticket.
struct PendingReply {
    inner: Weak<Inner>,
    ticket: Ticket,
    settled: bool,
}

impl PendingReply {
    fn new(inner: Weak<Inner>, ticket: Ticket) -> Self {
        Self { inner, ticket, settled: false }
    }

    fn settle(mut self, reply: ReplyPayload) -> SubmitOutcome {
        self.settled = true;
        complete(&self.inner, self.ticket, reply)
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        log::debug!("chat: submission dropped before its reply; abandoning ticket");
        if let Some(inner) = self.inner.upgrade() {
            inner.abandon(self.ticket);
        }
    }
}

fn complete(inner: &Weak<Inner>, ticket: Ticket, reply: ReplyPayload) -> SubmitOutcome {
    let Some(inner) = inner.upgrade() else {
        log::debug!("chat: reply arrived after the widget was dropped; discarding");
        return SubmitOutcome::Discarded;
    };
    let events: Vec<ConversationEvent> = {
        let mut session = inner.session.borrow_mut();
        if session.torn_down {
            log::debug!("chat: reply arrived after teardown; discarding");
            return SubmitOutcome::Discarded;
        }
        let ready = session.sequencer.resolve(ticket, reply);
        ready
            .into_iter()
            .map(|reply| ConversationEvent::MessageAppended { len: session.state.append_reply(reply) })
            .collect()
    };
    inner.notify(&events);
    SubmitOutcome::Completed
}
