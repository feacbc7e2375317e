use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{EventId, UserId};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: UserId,
    /// Argon2 PHC string, never the password itself.
    pub password_hash: String,
    #[serde(default)]
    pub created_events: HashSet<EventId>,
    #[serde(default)]
    pub rsvped_events: HashSet<EventId>,
}
impl User {
    pub fn new(id: UserId, password_hash: String) -> Self {
        Self {
            id,
            password_hash,
            created_events: HashSet::new(),
            rsvped_events: HashSet::new(),
        }
    }
}
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for User {}
