//! Pure application state, separated from rendering.
//!
//! `ChatStore` owns the roster, the per-contact message logs, and the current
//! selection. It performs no I/O and touches no terminal, so every state
//! transition here is unit-testable. The UI renders from a `&ChatStore` and
//! feeds mutations back through the typed operations below.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use crate::models::{Contact, Message};
use crate::roster;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no contact is selected")]
    NoSelection,
    #[error("message is empty after trimming")]
    EmptyMessage,
    #[error("unknown contact id {0}")]
    UnknownContact(u32),
}

/// Where a simulated reply landed, so the caller knows whether the visible
/// thread changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply's contact is the current selection; the thread view grew.
    Active,
    /// The reply landed in a background log; the contact's unread counter
    /// was bumped instead.
    Background,
}

pub struct ChatStore {
    contacts: Vec<Contact>,
    /// Message logs keyed by contact id, created lazily on first selection.
    logs: HashMap<u32, Vec<Message>>,
    selected: Option<u32>,
}

impl ChatStore {
    pub fn new(contacts: Vec<Contact>) -> Self {
        ChatStore {
            contacts,
            logs: HashMap::new(),
            selected: None,
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn selected_id(&self) -> Option<u32> {
        self.selected
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selected
            .and_then(|id| self.contacts.iter().find(|c| c.id == id))
    }

    /// The selected contact's message log. Empty when nothing is selected or
    /// the log has not been seeded yet.
    pub fn thread(&self) -> &[Message] {
        self.selected
            .and_then(|id| self.logs.get(&id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Select a contact: seed its log on first view, clear its unread count.
    ///
    /// Reselecting the current contact is an idempotent no-op beyond the
    /// (already zero) unread reset.
    pub fn select(&mut self, id: u32) -> Result<(), StoreError> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::UnknownContact(id))?;
        contact.unread = 0;
        self.selected = Some(id);
        self.logs.entry(id).or_insert_with(roster::seed_thread);
        debug!("selected contact {} ({})", id, contact.name);
        Ok(())
    }

    /// Append one outgoing message to the selected contact's log.
    ///
    /// Guarded: a selection must exist and the trimmed text must be
    /// non-empty. Callers treat the error as a silent no-op.
    pub fn send(&mut self, text: &str, time: &str) -> Result<Message, StoreError> {
        let id = self.selected.ok_or(StoreError::NoSelection)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(StoreError::EmptyMessage);
        }

        let message = Message::sent(trimmed, time);
        self.touch_preview(id, trimmed, time);
        self.logs
            .entry(id)
            .or_insert_with(roster::seed_thread)
            .push(message.clone());
        debug!("sent message to contact {}", id);
        Ok(message)
    }

    /// Deliver a simulated reply to the contact it was scheduled for.
    ///
    /// The reply always lands in that contact's log, even if the user has
    /// navigated away in the meantime. A background reply bumps the contact's
    /// unread counter so it surfaces on reselection instead of bleeding into
    /// whatever thread is on screen.
    pub fn apply_reply(
        &mut self,
        contact_id: u32,
        message: Message,
    ) -> Result<ReplyOutcome, StoreError> {
        if !self.contacts.iter().any(|c| c.id == contact_id) {
            return Err(StoreError::UnknownContact(contact_id));
        }

        self.touch_preview(contact_id, &message.text, &message.time);
        self.logs
            .entry(contact_id)
            .or_insert_with(roster::seed_thread)
            .push(message);

        if self.selected == Some(contact_id) {
            debug!("reply delivered to active contact {}", contact_id);
            Ok(ReplyOutcome::Active)
        } else {
            if let Some(contact) = self.contacts.iter_mut().find(|c| c.id == contact_id) {
                contact.unread += 1;
            }
            debug!("reply queued on background contact {}", contact_id);
            Ok(ReplyOutcome::Background)
        }
    }

    /// Ids of contacts whose name contains `query`, case-insensitively.
    ///
    /// Filtering is visual only: the roster itself is never reordered or
    /// mutated, and an empty query matches everyone.
    pub fn visible(&self, query: &str) -> Vec<u32> {
        let needle = query.trim().to_lowercase();
        self.contacts
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .map(|c| c.id)
            .collect()
    }

    fn touch_preview(&mut self, id: u32, text: &str, time: &str) {
        if let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) {
            contact.last_message = text.to_string();
            contact.last_time = time.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;

    fn seeded_store() -> ChatStore {
        ChatStore::new(roster::contacts())
    }

    #[test]
    fn select_clears_unread_and_seeds_log() {
        let mut store = seeded_store();
        assert_eq!(store.contacts()[0].unread, 2);

        store.select(1).unwrap();
        assert_eq!(store.contacts()[0].unread, 0);
        assert_eq!(store.thread().len(), 3);
        assert_eq!(store.selected_contact().unwrap().name, "Sarah Wilson");
    }

    #[test]
    fn select_unknown_contact_is_rejected() {
        let mut store = seeded_store();
        assert_eq!(store.select(99), Err(StoreError::UnknownContact(99)));
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn send_requires_selection_and_content() {
        let mut store = seeded_store();
        assert_eq!(
            store.send("hello", "2:30 PM").unwrap_err(),
            StoreError::NoSelection
        );

        store.select(1).unwrap();
        assert_eq!(
            store.send("   \t ", "2:30 PM").unwrap_err(),
            StoreError::EmptyMessage
        );
        assert_eq!(store.thread().len(), 3, "failed sends must not append");
    }

    #[test]
    fn send_appends_exactly_one_trimmed_message() {
        let mut store = seeded_store();
        store.select(1).unwrap();

        let msg = store.send("  hi there  ", "2:31 PM").unwrap();
        assert_eq!(msg.text, "hi there");
        assert_eq!(msg.direction, Direction::Sent);

        assert_eq!(store.thread().len(), 4);
        assert_eq!(store.contacts()[0].last_message, "hi there");
        assert_eq!(store.contacts()[0].last_time, "2:31 PM");
    }

    #[test]
    fn reselecting_reproduces_the_log_unchanged() {
        let mut store = seeded_store();
        store.select(1).unwrap();
        store.send("remember me", "2:31 PM").unwrap();
        let before: Vec<String> = store.thread().iter().map(|m| m.text.clone()).collect();

        store.select(2).unwrap();
        store.select(1).unwrap();
        let after: Vec<String> = store.thread().iter().map(|m| m.text.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reply_to_active_contact_lands_in_thread() {
        let mut store = seeded_store();
        store.select(1).unwrap();

        let outcome = store
            .apply_reply(1, Message::received("Got it! 😊", "2:32 PM"))
            .unwrap();
        assert_eq!(outcome, ReplyOutcome::Active);
        assert_eq!(store.thread().len(), 4);
        assert_eq!(store.contacts()[0].unread, 0);
    }

    #[test]
    fn reply_to_background_contact_bumps_unread() {
        let mut store = seeded_store();
        store.select(1).unwrap();
        store.select(2).unwrap();

        let outcome = store
            .apply_reply(1, Message::received("Thanks for sharing!", "2:33 PM"))
            .unwrap();
        assert_eq!(outcome, ReplyOutcome::Background);
        assert_eq!(store.contacts()[0].unread, 1);
        assert_eq!(store.contacts()[0].last_message, "Thanks for sharing!");

        // Nothing bled into the thread currently on screen.
        assert_eq!(store.thread().len(), 3);

        // Reselecting surfaces the queued reply and clears the badge.
        store.select(1).unwrap();
        assert_eq!(store.thread().len(), 4);
        assert_eq!(store.contacts()[0].unread, 0);
    }

    #[test]
    fn visible_filters_case_insensitively_without_reordering() {
        let store = seeded_store();
        assert_eq!(store.visible(""), vec![1, 2, 3, 4]);
        assert_eq!(store.visible("SAR"), vec![1]);
        assert_eq!(store.visible("o"), vec![1, 2, 4]);
        assert!(store.visible("zzz").is_empty());
    }
}
