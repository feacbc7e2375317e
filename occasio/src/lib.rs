//! Occasio is a crate for planning events together: people register, publish events
//! to a shared feed and RSVP to the ones they want to attend.
//!
//! It is built with consistency between runs in mind, to achieve this it keeps all of
//! its information in the filesystem, one human readable([`.ron`]) document per user
//! and per event. These files are not supposed to be edited outside of occasio.
//!
//! [`Database`] owns that directory. Writes touching several documents (creating an
//! event and linking it to its creator, or recording both sides of an RSVP) run in a
//! single [`Database::transaction`], so users and events never disagree.
//!
//! [`Authenticator`] registers accounts and checks credentials, storing only Argon2
//! hashes. [`events`] holds the feed and event creation, [`rsvp`] the attendance
//! bookkeeping.
//!
//! [`Database`]: crate::models::Database
//! [`Database::transaction`]: crate::models::Database::transaction
//! [`Authenticator`]: crate::auth::Authenticator
//! [`.ron`]: https://github.com/ron-rs/ron

pub mod auth;
mod error;
pub mod events;
/// This module holds the structure of occasio.
pub mod models;
pub mod rsvp;

pub use error::{Error, Result};
