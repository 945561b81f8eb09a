//! Fixture data: the demo roster, the seeded thread, and the reply pool.
//!
//! Everything here is process-lifetime-only and re-seeded identically on
//! every launch.

use rand::Rng;

use crate::models::{Contact, ContactStatus, Message};

/// Canned lines the simulated peer picks from when replying.
pub const REPLY_POOL: [&str; 5] = [
    "That's interesting! 🤔",
    "I see what you mean 👍",
    "Thanks for sharing!",
    "Got it! 😊",
    "Sounds good to me!",
];

/// The fixed demo roster. Contact ids are unique and stable across a run.
pub fn contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: 1,
            name: "Sarah Wilson".to_string(),
            avatar: "https://via.placeholder.com/45/ff6b6b/ffffff?text=SW".to_string(),
            status: ContactStatus::Online,
            last_message: "Hey! How are you doing?".to_string(),
            last_time: "2:30 PM".to_string(),
            unread: 2,
        },
        Contact {
            id: 2,
            name: "Mike Johnson".to_string(),
            avatar: "https://via.placeholder.com/45/4ecdc4/ffffff?text=MJ".to_string(),
            status: ContactStatus::Offline,
            last_message: "See you tomorrow!".to_string(),
            last_time: "1:15 PM".to_string(),
            unread: 0,
        },
        Contact {
            id: 3,
            name: "Emma Davis".to_string(),
            avatar: "https://via.placeholder.com/45/45b7d1/ffffff?text=ED".to_string(),
            status: ContactStatus::Online,
            last_message: "Thanks for your help".to_string(),
            last_time: "12:45 PM".to_string(),
            unread: 1,
        },
        Contact {
            id: 4,
            name: "Alex Brown".to_string(),
            avatar: "https://via.placeholder.com/45/f9ca24/ffffff?text=AB".to_string(),
            status: ContactStatus::Away,
            last_message: "Let's catch up soon".to_string(),
            last_time: "11:30 AM".to_string(),
            unread: 0,
        },
    ]
}

/// The three canned lines every thread starts with on first view.
pub fn seed_thread() -> Vec<Message> {
    vec![
        Message::received("Hey there! 👋", "2:25 PM"),
        Message::sent("Hi! How are you doing?", "2:26 PM"),
        Message::received("I'm doing great, thanks for asking! 😊", "2:27 PM"),
    ]
}

/// Pick one reply uniformly at random from the pool.
pub fn pick_reply() -> &'static str {
    let idx = rand::thread_rng().gen_range(0..REPLY_POOL.len());
    REPLY_POOL[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_matches_demo_data() {
        let roster = contacts();
        assert_eq!(roster.len(), 4);
        assert_eq!(roster[0].name, "Sarah Wilson");
        assert_eq!(roster[0].unread, 2);
        assert_eq!(roster[1].status, ContactStatus::Offline);
        assert_eq!(roster[3].last_time, "11:30 AM");

        let ids: Vec<u32> = roster.iter().map(|c| c.id).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped, "contact ids must be unique");
    }

    #[test]
    fn seed_thread_has_three_lines() {
        let thread = seed_thread();
        assert_eq!(thread.len(), 3);
        assert!(!thread[0].is_sent());
        assert!(thread[1].is_sent());
        assert_eq!(thread[2].time, "2:27 PM");
    }

    #[test]
    fn pick_reply_stays_in_pool() {
        for _ in 0..50 {
            let reply = pick_reply();
            assert!(REPLY_POOL.contains(&reply));
        }
    }
}
