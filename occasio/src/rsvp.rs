//! RSVP bookkeeping between users and events.
//!
//! Both sides of an RSVP are kept: the event lists its attendees by [`UserId`] and the
//! user lists the events by [`EventId`]. They are always updated together, see
//! [`Database::add_user_to_event`].

use tracing::warn;

use crate::{
    models::{Database, Event, EventId, RsvpOutcome, UserId},
    Error, Result,
};

pub fn rsvp(db: &Database, user: &UserId, event: EventId) -> Result<(Event, RsvpOutcome)> {
    db.add_user_to_event(user, event)
}

/// Events `user` has RSVP'd to, ordered like the feed.
///
/// References to events that no longer exist are skipped.
pub fn list_my_rsvps(db: &Database, user: &UserId) -> Result<Vec<Event>> {
    let record = db
        .fetch_user(user)?
        .ok_or_else(|| Error::UnknownUser(user.to_string()))?;

    let mut events = Vec::with_capacity(record.rsvped_events.len());
    for id in &record.rsvped_events {
        match db.fetch_event(*id)? {
            Some(event) => events.push(event),
            None => warn!(%user, event = %id, "RSVP points at a missing event"),
        }
    }
    events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(events)
}
