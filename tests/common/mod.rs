// Shared helpers for the integration tests.

use banter::roster;
use banter::store::ChatStore;

/// A store freshly loaded with the demo roster, exactly as the app starts.
pub fn seeded_store() -> ChatStore {
    ChatStore::new(roster::contacts())
}

/// Id of the "Sarah Wilson" fixture contact.
pub const SARAH: u32 = 1;

/// Id of the "Mike Johnson" fixture contact.
#[allow(dead_code)]
pub const MIKE: u32 = 2;
