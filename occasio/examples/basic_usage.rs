use occasio::{
    auth::Authenticator,
    events::{self, NewEvent},
    models::{Database, RsvpOutcome},
    rsvp, Result,
};

fn main() -> Result<()> {
    // Create a new database, with it we also create recursively the necessary folders.
    // Start from scratch on every run, usernames are unique.
    let path = std::env::temp_dir().join("occasio-basic-usage");
    let _ = std::fs::remove_dir_all(&path);
    let db = Database::new(&path)?;
    let auth = Authenticator::default();

    // Accounts only ever store an Argon2 hash of the password
    let alice = auth.register(&db, "alice", "correct horse")?;
    let bob = auth.register(&db, "bob", "battery staple")?;
    // Logging in hands back the id a session would be bound to
    let alice_id = auth.login(&db, "alice", "correct horse")?;
    assert_eq!(alice_id, alice.id);

    // Creating an event also records it on its creator
    let meeting = events::create_event(
        &db,
        &alice.id,
        NewEvent {
            title: String::from("Monthly club meeting"),
            description: String::from("Monthly updates of the activities related to the club"),
            date: String::from("first Monday, 18:00"),
            location: String::from("Club house"),
        },
    )?;

    // RSVPs are recorded on both the event and the user
    let (_, outcome) = rsvp::rsvp(&db, &bob.id, meeting.id)?;
    assert_eq!(outcome, RsvpOutcome::Confirmed);
    let (_, outcome) = rsvp::rsvp(&db, &bob.id, meeting.id)?;
    assert_eq!(outcome, RsvpOutcome::AlreadyRsvped);

    for event in events::list_events(&db, Some("club"))? {
        println!(
            "{} ({}) at {}, {} attending",
            event.title,
            event.date,
            event.location,
            event.attendees.len()
        );
    }
    for event in rsvp::list_my_rsvps(&db, &bob.id)? {
        println!("bob is going to {}", event.title);
    }
    Ok(())
}
