// Re-export the application modules for the binary and for tests
pub mod config;
pub mod models;
pub mod notify;
pub mod reply;
pub mod roster;
pub mod store;

// Re-export main types for convenience
pub use models::*;
pub use store::{ChatStore, ReplyOutcome, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_status_labels() {
        let online_contact = Contact {
            id: 1,
            name: "Online User".to_string(),
            avatar: String::new(),
            status: ContactStatus::Online,
            last_message: "hi".to_string(),
            last_time: "2:30 PM".to_string(),
            unread: 0,
        };

        let offline_contact = Contact {
            status: ContactStatus::Offline,
            ..online_contact.clone()
        };

        let away_contact = Contact {
            status: ContactStatus::Away,
            ..online_contact.clone()
        };

        assert_eq!(online_contact.status.label(), "Online");
        assert_eq!(offline_contact.status.label(), "Offline");
        assert_eq!(away_contact.status.label(), "Away");

        match online_contact.status {
            ContactStatus::Online => (),
            _ => panic!("Expected Online status"),
        }
    }

    #[test]
    fn test_contact_initials() {
        let contact = Contact {
            id: 1,
            name: "Sarah Wilson".to_string(),
            avatar: String::new(),
            status: ContactStatus::Online,
            last_message: String::new(),
            last_time: String::new(),
            unread: 0,
        };
        assert_eq!(contact.initials(), "SW");

        let single = Contact {
            name: "Cher".to_string(),
            ..contact.clone()
        };
        assert_eq!(single.initials(), "C");

        let triple = Contact {
            name: "mary jane watson".to_string(),
            ..contact
        };
        assert_eq!(triple.initials(), "MJ");
    }

    #[test]
    fn test_message_construction() {
        let sent = Message::sent("Hello, world!", "2:26 PM");
        assert_eq!(sent.text, "Hello, world!");
        assert_eq!(sent.direction, Direction::Sent);
        assert!(sent.is_sent());
        assert_eq!(sent.time, "2:26 PM");

        let received = Message::received("Hey there! 👋", "2:25 PM");
        assert_eq!(received.direction, Direction::Received);
        assert!(!received.is_sent());

        // Ids are unique per message
        assert_ne!(sent.id, received.id);
    }
}
