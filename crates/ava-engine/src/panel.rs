//! Panels and the two-panel coordinator.
//!
//! A [`Panel`] pairs one [`Session`] with its own profile, QA table and reply
//! delay. [`Panels`] owns exactly two of them and routes scheduled deliveries
//! back to the right one. Panels never share mutable state.

use serde::Serialize;
use std::fmt;

use tracing::{debug, info};

use crate::dataset::QaDocument;
use crate::matcher::{QaEntry, QaTable};
use crate::profile::Profile;
use crate::scheduler::{Delivery, ReplyDelay, Scheduler};
use crate::session::{DeliveryOutcome, ReplyContext, Session, SubmitOutcome};

/// Identity of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    /// Left-hand panel (Sarah).
    #[default]
    Left,
    /// Right-hand panel (Michael).
    Right,
}

impl PanelId {
    /// Both panels, left first.
    pub const ALL: [PanelId; 2] = [PanelId::Left, PanelId::Right];

    /// The other panel.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Key of this panel's list in the QA document.
    pub fn dataset_key(self) -> &'static str {
        match self {
            Self::Left => "sarah",
            Self::Right => "michael",
        }
    }

    /// Lower-case name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Index into two-element arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One profile and its isolated chat.
#[derive(Debug)]
pub struct Panel {
    id: PanelId,
    profile: Profile,
    table: QaTable,
    delay: ReplyDelay,
    session: Session,
}

impl Panel {
    /// Create a panel with an idle, empty session.
    pub fn new(id: PanelId, profile: Profile, table: QaTable, delay: ReplyDelay) -> Self {
        Self {
            id,
            profile,
            table,
            delay,
            session: Session::new(),
        }
    }

    /// Panel identity.
    pub fn id(&self) -> PanelId {
        self.id
    }

    /// Profile shown in this panel.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Canned answers for this panel.
    pub fn table(&self) -> &QaTable {
        &self.table
    }

    /// Reply used when nothing matches.
    pub fn default_response(&self) -> &str {
        &self.profile.default_response
    }

    /// This panel's conversation.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a reply is pending (drives the typing indicator).
    pub fn is_awaiting_reply(&self) -> bool {
        self.session.is_awaiting_reply()
    }

    /// Submit a question from this panel's patient.
    pub fn submit(&mut self, text: &str, scheduler: &dyn Scheduler) -> SubmitOutcome {
        let ctx = ReplyContext {
            panel: self.id,
            sender: self.profile.first_name(),
            table: &self.table,
            default_response: &self.profile.default_response,
            delay: self.delay.sample(),
        };
        self.session.submit(text, &ctx, scheduler)
    }

    /// Deliver the pending reply for `ticket`.
    pub fn deliver_reply(&mut self, ticket: u64) -> DeliveryOutcome {
        self.session.deliver_reply(ticket)
    }

    /// Abort any pending reply.
    pub fn cancel_pending(&mut self) -> bool {
        self.session.cancel_pending()
    }
}

/// The two independent panels.
#[derive(Debug)]
pub struct Panels {
    panels: [Panel; 2],
}

impl Panels {
    /// Build both panels from per-panel QA entries.
    pub fn new(
        left: (Profile, Vec<QaEntry>),
        right: (Profile, Vec<QaEntry>),
        delay: ReplyDelay,
    ) -> Self {
        let build = |id: PanelId, (profile, entries): (Profile, Vec<QaEntry>)| {
            let table = QaTable::from_entries(entries);
            info!(panel = %id, entries = table.len(), "panel ready");
            Panel::new(id, profile, table, delay)
        };
        Self {
            panels: [build(PanelId::Left, left), build(PanelId::Right, right)],
        }
    }

    /// Sarah on the left and Michael on the right, with tables from `document`.
    pub fn from_document(document: QaDocument, delay: ReplyDelay) -> Self {
        Self::new(
            (Profile::sarah(), document.left),
            (Profile::michael(), document.right),
            delay,
        )
    }

    /// Panel by id.
    pub fn panel(&self, id: PanelId) -> &Panel {
        &self.panels[id.index()]
    }

    /// Mutable panel by id.
    pub fn panel_mut(&mut self, id: PanelId) -> &mut Panel {
        &mut self.panels[id.index()]
    }

    /// Both panels, left first.
    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    /// Submit text to one panel.
    pub fn submit(&mut self, id: PanelId, text: &str, scheduler: &dyn Scheduler) -> SubmitOutcome {
        self.panel_mut(id).submit(text, scheduler)
    }

    /// Route a due delivery to the panel that scheduled it.
    pub fn deliver(&mut self, delivery: Delivery) -> DeliveryOutcome {
        let outcome = self.panel_mut(delivery.panel).deliver_reply(delivery.ticket);
        debug!(panel = %delivery.panel, ticket = delivery.ticket, ?outcome, "delivery");
        outcome
    }

    /// Abort pending replies in both panels.
    pub fn cancel_all(&mut self) {
        for panel in &mut self.panels {
            panel.cancel_pending();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::session::{Rejection, Role, SessionState};

    fn document() -> QaDocument {
        QaDocument {
            left: vec![QaEntry::new(
                "fatigue medication",
                "It may be the hormone therapy.",
            )],
            right: vec![QaEntry::new(
                "recurrence risk statistics",
                "Your five-year recurrence risk is low.",
            )],
        }
    }

    fn panels() -> Panels {
        Panels::from_document(document(), ReplyDelay::fixed(10))
    }

    #[test]
    fn test_panel_id_helpers() {
        assert_eq!(PanelId::Left.toggle(), PanelId::Right);
        assert_eq!(PanelId::Right.toggle(), PanelId::Left);
        assert_eq!(PanelId::Left.dataset_key(), "sarah");
        assert_eq!(PanelId::Right.dataset_key(), "michael");
        assert_eq!(PanelId::Right.to_string(), "right");
    }

    #[test]
    fn test_panels_are_built_with_their_own_profiles() {
        let panels = panels();
        assert_eq!(panels.panel(PanelId::Left).profile().name, "Sarah Martinez");
        assert_eq!(panels.panel(PanelId::Right).profile().name, "Michael Thompson");
        assert_eq!(panels.panel(PanelId::Left).table().len(), 1);
    }

    #[test]
    fn test_each_panel_answers_from_its_own_table() {
        let mut panels = panels();
        let scheduler = ManualScheduler::new();

        panels.submit(PanelId::Left, "What are the recurrence statistics?", &scheduler);
        panels.submit(PanelId::Right, "What are the recurrence statistics?", &scheduler);
        for delivery in scheduler.drain() {
            assert_eq!(panels.deliver(delivery), DeliveryOutcome::Delivered);
        }

        let left = panels.panel(PanelId::Left).session().history();
        let right = panels.panel(PanelId::Right).session().history();
        assert_eq!(left[1].text, Profile::sarah().default_response);
        assert_eq!(right[1].text, "Your five-year recurrence risk is low.");
        assert_eq!(left[0].sender, "Sarah");
        assert_eq!(right[0].sender, "Michael");
    }

    #[test]
    fn test_pending_reply_in_one_panel_does_not_block_the_other() {
        let mut panels = panels();
        let scheduler = ManualScheduler::new();

        assert!(panels.submit(PanelId::Left, "hello", &scheduler).is_accepted());
        assert_eq!(
            panels.submit(PanelId::Left, "again", &scheduler),
            SubmitOutcome::Rejected(Rejection::ReplyPending)
        );
        assert!(panels.submit(PanelId::Right, "hello", &scheduler).is_accepted());

        assert_eq!(
            panels.panel(PanelId::Left).session().state(),
            SessionState::AwaitingReply
        );
        assert_eq!(
            panels.panel(PanelId::Right).session().state(),
            SessionState::AwaitingReply
        );
    }

    #[test]
    fn test_delivery_is_routed_to_owning_panel() {
        let mut panels = panels();
        let scheduler = ManualScheduler::new();

        panels.submit(PanelId::Right, "risk", &scheduler);
        let delivery = scheduler.drain()[0];
        assert_eq!(delivery.panel, PanelId::Right);

        panels.deliver(delivery);
        assert!(panels.panel(PanelId::Left).session().history().is_empty());
        let right = panels.panel(PanelId::Right).session().history();
        assert_eq!(right.len(), 2);
        assert_eq!(right[1].role, Role::Assistant);
    }

    #[test]
    fn test_failed_panel_falls_back_to_default_without_affecting_other() {
        let document = QaDocument::parse_lenient(
            r#"{"sarah": 42, "michael": [{"q": "risk", "a": "Low."}]}"#,
        )
        .document;
        let mut panels = Panels::from_document(document, ReplyDelay::fixed(0));
        let scheduler = ManualScheduler::new();

        assert!(panels.panel(PanelId::Left).table().is_empty());
        panels.submit(PanelId::Left, "risk", &scheduler);
        panels.submit(PanelId::Right, "risk", &scheduler);
        for delivery in scheduler.drain() {
            panels.deliver(delivery);
        }

        assert_eq!(
            panels.panel(PanelId::Left).session().history()[1].text,
            Profile::sarah().default_response
        );
        assert_eq!(panels.panel(PanelId::Right).session().history()[1].text, "Low.");
    }

    #[test]
    fn test_cancel_all() {
        let mut panels = panels();
        let scheduler = ManualScheduler::new();
        panels.submit(PanelId::Left, "hi", &scheduler);
        panels.submit(PanelId::Right, "hi", &scheduler);

        panels.cancel_all();
        assert!(panels.iter().all(|p| !p.is_awaiting_reply()));
    }
}
