//! The shared event feed and event creation.

use tracing::debug;

use crate::{
    models::{Database, Event, EventBuilder, EventId, UserId},
    Error, Result,
};

/// Form fields of a new event, as entered.
#[derive(Debug, Default, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
}

/// All events, or those whose title contains `search` regardless of case.
pub fn list_events(db: &Database, search: Option<&str>) -> Result<Vec<Event>> {
    let events = db.fetch_events()?;
    let Some(term) = search.map(str::trim).filter(|term| !term.is_empty()) else {
        return Ok(events);
    };

    let term = term.to_lowercase();
    let matching: Vec<Event> = events
        .into_iter()
        .filter(|event| event.title.to_lowercase().contains(&term))
        .collect();
    debug!(%term, found = matching.len(), "Searched feed");
    Ok(matching)
}

pub fn create_event(db: &Database, creator: &UserId, new: NewEvent) -> Result<Event> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput(String::from("Events need a title.")));
    }

    EventBuilder::new(title, creator.clone())
        .description(new.description.trim())
        .date(new.date.trim())
        .location(new.location.trim())
        .build()
        .save_to_db(db)
}

pub fn get_event(db: &Database, id: EventId) -> Result<Event> {
    db.fetch_event(id)?
        .ok_or_else(|| Error::EventNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cheap_authenticator;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Database, UserId) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path()).unwrap();
        let alice = cheap_authenticator().register(&db, "alice", "pw").unwrap();
        (dir, db, alice.id)
    }
    fn titled(title: &str) -> NewEvent {
        NewEvent {
            title: String::from(title),
            ..NewEvent::default()
        }
    }
    fn titles(events: Vec<Event>) -> Vec<String> {
        events.into_iter().map(|e| e.title).collect()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let (_dir, db, alice) = setup();
        for title in ["Summer BBQ", "Board games", "bbq cleanup", "Book club"] {
            create_event(&db, &alice, titled(title)).unwrap();
        }

        assert_eq!(
            titles(list_events(&db, Some("bbq")).unwrap()),
            ["Summer BBQ", "bbq cleanup"]
        );
        assert_eq!(
            titles(list_events(&db, Some("  BO ")).unwrap()),
            ["Board games", "Book club"]
        );
        assert!(list_events(&db, Some("gala")).unwrap().is_empty());
    }

    #[test]
    fn search_terms_are_not_patterns() {
        let (_dir, db, alice) = setup();
        create_event(&db, &alice, titled("Q&A (live)")).unwrap();
        create_event(&db, &alice, titled("Quiz")).unwrap();

        assert_eq!(titles(list_events(&db, Some("(live)")).unwrap()), ["Q&A (live)"]);
        assert!(list_events(&db, Some("Q.*z")).unwrap().is_empty());
    }

    #[test]
    fn empty_search_lists_everything() {
        let (_dir, db, alice) = setup();
        create_event(&db, &alice, titled("One")).unwrap();
        create_event(&db, &alice, titled("Two")).unwrap();

        assert_eq!(list_events(&db, None).unwrap().len(), 2);
        assert_eq!(list_events(&db, Some("")).unwrap().len(), 2);
        assert_eq!(list_events(&db, Some("   ")).unwrap().len(), 2);
    }

    #[test]
    fn created_events_reach_feed_and_creator() {
        let (_dir, db, alice) = setup();
        let event = create_event(
            &db,
            &alice,
            NewEvent {
                title: String::from(" Hackathon "),
                description: String::from("48 hours"),
                date: String::from("next friday"),
                location: String::from("Lab 3"),
            },
        )
        .unwrap();

        assert_eq!(event.title, "Hackathon");
        assert_eq!(event.creator, alice);
        assert!(event.attendees.is_empty());
        let feed = list_events(&db, None).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, event.id);
        assert_eq!(feed[0].date, "next friday");
        let user = db.fetch_user(&alice).unwrap().unwrap();
        assert!(user.created_events.contains(&event.id));
    }

    #[test]
    fn untitled_events_are_rejected() {
        let (_dir, db, alice) = setup();

        assert!(matches!(
            create_event(&db, &alice, titled("   ")),
            Err(Error::InvalidInput(_))
        ));
        assert!(list_events(&db, None).unwrap().is_empty());
    }

    #[test]
    fn missing_event_is_not_found() {
        let (_dir, db, _) = setup();
        assert!(matches!(
            get_event(&db, EventId::generate()),
            Err(Error::EventNotFound(_))
        ));
    }
}
