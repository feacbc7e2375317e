mod database;
pub mod event;
mod id;
mod user;

pub use self::database::Database;
pub use self::event::{Event, EventBuilder, RsvpOutcome};
pub use self::id::{EventId, UserId};
pub use self::user::User;
