use super::{event::Event, EventId, RsvpOutcome, User, UserId};
use crate::{Error, Result};
use file_lock::{FileLock, FileOptions};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::{self, create_dir_all, File},
    io::{self, BufReader, BufWriter},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::{debug, error, info, warn};

const USERS: &str = "users";
const EVENTS: &str = "events";
const LOCK_FILE: &str = ".lock";
const EXTENSION: &str = "ron";

/// A directory of RON documents, one per user and one per event.
///
/// Reads never take a lock: every document is written to a temporary sibling and
/// renamed into place. Writes that touch more than one document run inside
/// [`Database::transaction`].
pub struct Database {
    base_path: PathBuf,
    writer: Mutex<()>,
}
impl Database {
    pub fn new<P>(base_path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let base_path = base_path.as_ref().to_path_buf();
        create_dir_all(base_path.join(USERS))?;
        create_dir_all(base_path.join(EVENTS))?;
        debug!(path = %base_path.display(), "Opened document store");

        Ok(Self {
            base_path,
            writer: Mutex::new(()),
        })
    }
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn add_user(&self, user: &User) -> Result<()> {
        self.transaction(|| {
            let path = self.document_path(user.id.as_str(), USERS);
            if path.exists() {
                return Err(Error::DuplicateUser(user.id.to_string()));
            }
            self.write_document(&path, user)?;
            info!(user = %user.id, "Created user");
            Ok(())
        })
    }
    pub fn fetch_user(&self, id: &UserId) -> Result<Option<User>> {
        self.read_document(&self.document_path(id.as_str(), USERS))
    }

    /// Stores a new event and records it in its creator's `created_events`.
    pub fn add_event(&self, event: Event) -> Result<Event> {
        self.transaction(move || {
            let user_path = self.document_path(event.creator.as_str(), USERS);
            let mut creator: User = self
                .read_document(&user_path)?
                .ok_or_else(|| Error::UnknownUser(event.creator.to_string()))?;

            let event_path = self.document_path(&event.id.to_string(), EVENTS);
            self.write_document(&event_path, &event)?;

            creator.created_events.insert(event.id);
            if let Err(e) = self.write_document(&user_path, &creator) {
                warn!(event = %event.id, "Linking event to {} failed, removing it: {e}", event.creator);
                if let Err(remove) = fs::remove_file(&event_path) {
                    error!(event = %event.id, "Could not remove unlinked event: {remove}");
                }
                return Err(e);
            }

            info!(event = %event.id, creator = %event.creator, "Created event");
            Ok(event)
        })
    }
    pub fn fetch_event(&self, id: EventId) -> Result<Option<Event>> {
        self.read_document(&self.document_path(&id.to_string(), EVENTS))
    }
    /// Every stored event, oldest first.
    pub fn fetch_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = vec![];
        for entry in fs::read_dir(self.base_path.join(EVENTS))? {
            let path = entry?.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != EXTENSION) {
                continue;
            }
            // Gone between listing and opening means a creation was rolled back.
            if let Some(event) = self.read_document(&path)? {
                events.push(event);
            }
        }
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    /// Links `user_id` and `event_id` on both documents.
    ///
    /// The outcome reflects the event's attendee list; a user document that already
    /// names the event is left as is, one that does not is repaired.
    pub fn add_user_to_event(
        &self,
        user_id: &UserId,
        event_id: EventId,
    ) -> Result<(Event, RsvpOutcome)> {
        self.transaction(|| {
            let event_path = self.document_path(&event_id.to_string(), EVENTS);
            let mut event: Event = self
                .read_document(&event_path)?
                .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;
            let user_path = self.document_path(user_id.as_str(), USERS);
            let mut user: User = self
                .read_document(&user_path)?
                .ok_or_else(|| Error::UnknownUser(user_id.to_string()))?;

            let outcome = if event.attendees.insert(user_id.clone()) {
                self.write_document(&event_path, &event)?;
                RsvpOutcome::Confirmed
            } else {
                RsvpOutcome::AlreadyRsvped
            };

            if user.rsvped_events.insert(event_id) {
                if let Err(e) = self.write_document(&user_path, &user) {
                    if outcome == RsvpOutcome::Confirmed {
                        event.attendees.remove(user_id);
                        if let Err(undo) = self.write_document(&event_path, &event) {
                            error!(event = %event_id, user = %user_id, "Could not undo attendee: {undo}");
                        }
                    }
                    return Err(e);
                }
            }

            info!(event = %event_id, user = %user_id, ?outcome, "Recorded RSVP");
            Ok((event, outcome))
        })
    }

    /// Runs `f` as the only writer of this store, across threads and processes.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        // Documents are replaced by rename, a panicked writer leaves nothing half-written.
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let options = FileOptions::new().write(true).create(true);
        let _filelock = FileLock::lock(self.base_path.join(LOCK_FILE), true, options)?;
        f()
    }

    fn document_path(&self, id: &str, folder: &str) -> PathBuf {
        [
            &self.base_path,
            &PathBuf::from(folder),
            &PathBuf::from(format!("{id}.{EXTENSION}")),
        ]
        .iter()
        .collect()
    }
    fn read_document<T>(&self, path: &Path) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(ron::de::from_reader(BufReader::new(file))?))
    }
    fn write_document<T>(&self, path: &Path, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        let mut buf = BufWriter::new(File::create(&tmp)?);
        ron::ser::to_writer(&mut buf, value)?;
        buf.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
