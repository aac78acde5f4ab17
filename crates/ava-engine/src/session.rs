//! Conversation session for a single panel.
//!
//! A session is either idle or waiting on exactly one scheduled reply.
//! Submitting while a reply is pending is ignored, so at most one delivery
//! is ever in flight per session.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matcher::{find_answer, QaTable};
use crate::panel::PanelId;
use crate::scheduler::{Delivery, Scheduler, TaskHandle};

/// Sender label used for every assistant reply.
pub const ASSISTANT_NAME: &str = "Ava";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The patient typing into the panel.
    User,
    /// Ava's canned reply.
    Assistant,
}

/// A single message in a session's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the history, starting at 0.
    pub seq: u64,
    /// Display name of the author.
    pub sender: String,
    /// Message text.
    pub text: String,
    /// Role of the author.
    pub role: Role,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(seq: u64, sender: impl Into<String>, text: impl Into<String>, role: Role) -> Self {
        Self {
            seq,
            sender: sender.into(),
            text: text.into(),
            role,
            timestamp: Utc::now(),
        }
    }
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No reply pending; submissions are accepted.
    #[default]
    Idle,
    /// One reply scheduled; submissions are ignored.
    AwaitingReply,
}

/// Why a submission was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Text was empty or whitespace only.
    EmptyInput,
    /// A reply is still pending.
    ReplyPending,
}

/// Result of [`Session::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The question was recorded and a reply scheduled under `ticket`.
    Accepted {
        /// Ticket the scheduled delivery must present.
        ticket: u64,
    },
    /// Nothing changed.
    Rejected(Rejection),
}

impl SubmitOutcome {
    /// Whether the submission was accepted.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Why a delivery was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredDelivery {
    /// No reply is pending (already delivered or cancelled).
    NotAwaiting,
    /// The ticket belongs to an earlier exchange.
    StaleTicket,
}

/// Result of [`Session::deliver_reply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The reply was appended and the session is idle again.
    Delivered,
    /// Nothing changed.
    Ignored(IgnoredDelivery),
}

/// Everything a session needs from its panel to answer a question.
#[derive(Debug, Clone, Copy)]
pub struct ReplyContext<'a> {
    /// Panel owning the session, used to route the delivery.
    pub panel: PanelId,
    /// Sender label for the user's message.
    pub sender: &'a str,
    /// Canned answers.
    pub table: &'a QaTable,
    /// Answer used when nothing in the table matches.
    pub default_response: &'a str,
    /// How long to wait before delivering.
    pub delay: Duration,
}

#[derive(Debug)]
struct PendingReply {
    ticket: u64,
    answer: String,
    handle: TaskHandle,
}

/// Per-panel conversation: ordered history plus at most one pending reply.
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<Message>,
    pending: Option<PendingReply>,
    next_ticket: u64,
}

impl Session {
    /// Create an idle session with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in display order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        if self.pending.is_some() {
            SessionState::AwaitingReply
        } else {
            SessionState::Idle
        }
    }

    /// Whether a reply is pending.
    pub fn is_awaiting_reply(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket of the pending reply, if any.
    pub fn pending_ticket(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// Submit a question.
    ///
    /// Input while a reply is pending, or empty input, is ignored. Otherwise the
    /// user message is appended, the answer is computed right away, and its
    /// delivery is handed to `scheduler`.
    pub fn submit(
        &mut self,
        text: &str,
        ctx: &ReplyContext<'_>,
        scheduler: &dyn Scheduler,
    ) -> SubmitOutcome {
        // A pending reply outranks empty input as the reason to ignore.
        if self.pending.is_some() {
            debug!(panel = %ctx.panel, "ignoring submission while reply is pending");
            return SubmitOutcome::Rejected(Rejection::ReplyPending);
        }
        if text.trim().is_empty() {
            debug!(panel = %ctx.panel, "ignoring empty submission");
            return SubmitOutcome::Rejected(Rejection::EmptyInput);
        }

        self.push(ctx.sender, text, Role::User);
        let answer = find_answer(text, ctx.table, ctx.default_response).to_string();

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let handle = scheduler.schedule(
            Delivery {
                panel: ctx.panel,
                ticket,
            },
            ctx.delay,
        );
        debug!(
            panel = %ctx.panel,
            ticket,
            delay_ms = u64::try_from(ctx.delay.as_millis()).unwrap_or(u64::MAX),
            "reply scheduled"
        );

        self.pending = Some(PendingReply {
            ticket,
            answer,
            handle,
        });
        SubmitOutcome::Accepted { ticket }
    }

    /// Deliver the pending reply for `ticket`.
    ///
    /// Duplicate or stale deliveries are ignored.
    pub fn deliver_reply(&mut self, ticket: u64) -> DeliveryOutcome {
        let Some(pending) = self.pending.as_ref() else {
            debug!(ticket, "ignoring delivery: no reply pending");
            return DeliveryOutcome::Ignored(IgnoredDelivery::NotAwaiting);
        };
        if pending.ticket != ticket {
            debug!(ticket, expected = pending.ticket, "ignoring stale delivery");
            return DeliveryOutcome::Ignored(IgnoredDelivery::StaleTicket);
        }

        if let Some(pending) = self.pending.take() {
            self.push(ASSISTANT_NAME, pending.answer, Role::Assistant);
        }
        DeliveryOutcome::Delivered
    }

    /// Abort the pending reply without appending anything.
    ///
    /// Returns `true` if a reply was pending.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Plain-text rendering of the history, one `sender: text` line per message.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for msg in &self.history {
            let _ = writeln!(out, "{}: {}", msg.sender, msg.text);
        }
        out
    }

    fn push(&mut self, sender: &str, text: impl Into<String>, role: Role) {
        let seq = self.history.len() as u64;
        self.history.push(Message::new(seq, sender, text, role));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::QaEntry;
    use crate::scheduler::ManualScheduler;

    const DEFAULT: &str = "I'm here for you. Could you tell me more?";

    fn table() -> QaTable {
        QaTable::from_entries([QaEntry::new(
            "fatigue medication",
            "It may be the hormone therapy.",
        )])
    }

    fn ctx(table: &QaTable) -> ReplyContext<'_> {
        ReplyContext {
            panel: PanelId::Left,
            sender: "Sarah",
            table,
            default_response: DEFAULT,
            delay: Duration::from_millis(1200),
        }
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.history().is_empty());
        assert_eq!(session.pending_ticket(), None);
    }

    #[test]
    fn test_empty_submission_is_ignored() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        for text in ["", "   ", "\n\t"] {
            let outcome = session.submit(text, &ctx(&table), &scheduler);
            assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::EmptyInput));
        }
        assert!(session.history().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn test_empty_submission_while_awaiting_reports_pending_reply() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        session.submit("hello", &ctx(&table), &scheduler);
        let outcome = session.submit("", &ctx(&table), &scheduler);

        assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::ReplyPending));
        assert_eq!(session.history().len(), 1);
        assert_eq!(scheduler.pending().len(), 1);
    }

    #[test]
    fn test_submit_appends_user_message_and_schedules_reply() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        let outcome = session.submit("Is my fatigue from the medication?", &ctx(&table), &scheduler);
        assert_eq!(outcome, SubmitOutcome::Accepted { ticket: 0 });
        assert_eq!(session.state(), SessionState::AwaitingReply);

        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].sender, "Sarah");
        assert_eq!(history[0].seq, 0);

        let pending = scheduler.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0.panel, PanelId::Left);
        assert_eq!(pending[0].0.ticket, 0);
        assert_eq!(pending[0].1, Duration::from_millis(1200));
    }

    #[test]
    fn test_submission_text_is_kept_verbatim() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        session.submit("  fatigue?  ", &ctx(&table), &scheduler);
        assert_eq!(session.history()[0].text, "  fatigue?  ");
    }

    #[test]
    fn test_second_submit_while_awaiting_is_ignored() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        assert!(session.submit("hello", &ctx(&table), &scheduler).is_accepted());
        let outcome = session.submit("again", &ctx(&table), &scheduler);
        assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::ReplyPending));

        assert_eq!(session.history().len(), 1);
        assert_eq!(scheduler.pending().len(), 1);

        let ticket = scheduler.drain()[0].ticket;
        assert_eq!(session.deliver_reply(ticket), DeliveryOutcome::Delivered);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.history().len(), 2);

        assert!(session.submit("again", &ctx(&table), &scheduler).is_accepted());
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_delivery_appends_matched_answer() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        session.submit("Is my fatigue from the medication?", &ctx(&table), &scheduler);
        session.deliver_reply(0);

        let reply = &session.history()[1];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.sender, ASSISTANT_NAME);
        assert_eq!(reply.text, "It may be the hormone therapy.");
        assert_eq!(reply.seq, 1);
    }

    #[test]
    fn test_unmatched_question_gets_default() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        session.submit("What's the weather today?", &ctx(&table), &scheduler);
        session.deliver_reply(0);
        assert_eq!(session.history()[1].text, DEFAULT);
    }

    #[test]
    fn test_duplicate_delivery_is_ignored() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        session.submit("fatigue", &ctx(&table), &scheduler);
        assert_eq!(session.deliver_reply(0), DeliveryOutcome::Delivered);
        assert_eq!(
            session.deliver_reply(0),
            DeliveryOutcome::Ignored(IgnoredDelivery::NotAwaiting)
        );
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        session.submit("first", &ctx(&table), &scheduler);
        session.deliver_reply(0);
        session.submit("second", &ctx(&table), &scheduler);

        assert_eq!(
            session.deliver_reply(0),
            DeliveryOutcome::Ignored(IgnoredDelivery::StaleTicket)
        );
        assert!(session.is_awaiting_reply());
        assert_eq!(session.deliver_reply(1), DeliveryOutcome::Delivered);
    }

    #[test]
    fn test_cancel_pending_returns_to_idle_without_reply() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        assert!(!session.cancel_pending());
        session.submit("fatigue", &ctx(&table), &scheduler);
        assert!(session.cancel_pending());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            session.deliver_reply(0),
            DeliveryOutcome::Ignored(IgnoredDelivery::NotAwaiting)
        );
    }

    #[test]
    fn test_history_only_grows() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();
        let mut last_len = 0;

        let steps = ["hi", "", "again", "fatigue", "   ", "medication"];
        for text in steps {
            session.submit(text, &ctx(&table), &scheduler);
            assert!(session.history().len() >= last_len);
            last_len = session.history().len();

            for delivery in scheduler.drain() {
                session.deliver_reply(delivery.ticket);
                session.deliver_reply(delivery.ticket);
                assert!(session.history().len() >= last_len);
                last_len = session.history().len();
            }
        }

        let seqs: Vec<u64> = session.history().iter().map(|m| m.seq).collect();
        let expected: Vec<u64> = (0..seqs.len() as u64).collect();
        assert_eq!(seqs, expected);
    }

    #[test]
    fn test_transcript() {
        let table = table();
        let scheduler = ManualScheduler::new();
        let mut session = Session::new();

        session.submit("Is my fatigue from the medication?", &ctx(&table), &scheduler);
        session.deliver_reply(0);

        insta::assert_snapshot!(session.transcript().trim_end(), @r"
        Sarah: Is my fatigue from the medication?
        Ava: It may be the hormone therapy.
        ");
    }
}
