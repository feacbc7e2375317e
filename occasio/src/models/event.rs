use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Database, EventId, UserId};
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    /// Free-form, shown back to users exactly as entered.
    pub date: String,
    pub location: String,
    pub creator: UserId,
    #[serde(default)]
    pub attendees: HashSet<UserId>,
    pub created_at: DateTime<Utc>,
}
impl Event {
    pub fn save_to_db(self, db: &Database) -> Result<Event> {
        db.add_event(self)
    }
    pub fn is_attended_by(&self, user: &UserId) -> bool {
        self.attendees.contains(user)
    }
}

/// What an RSVP did to the attendee list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpOutcome {
    Confirmed,
    AlreadyRsvped,
}

#[derive(Debug)]
pub struct EventBuilder {
    id: EventId,
    title: String,
    description: String,
    date: String,
    location: String,
    creator: UserId,
    created_at: DateTime<Utc>,
}
impl EventBuilder {
    pub fn new(title: &str, creator: UserId) -> Self {
        Self {
            id: EventId::generate(),
            title: String::from(title),
            description: String::new(),
            date: String::new(),
            location: String::new(),
            creator,
            created_at: Utc::now(),
        }
    }
    pub fn description(mut self, desc: &str) -> Self {
        self.description = String::from(desc);
        self
    }
    pub fn date(mut self, date: &str) -> Self {
        self.date = String::from(date);
        self
    }
    pub fn location(mut self, location: &str) -> Self {
        self.location = String::from(location);
        self
    }
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
    pub fn build(self) -> Event {
        Event {
            id: self.id,
            title: self.title,
            description: self.description,
            date: self.date,
            location: self.location,
            creator: self.creator,
            attendees: HashSet::new(),
            created_at: self.created_at,
        }
    }
}
