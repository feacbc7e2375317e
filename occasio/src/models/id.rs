use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

const MAX_USERNAME_LEN: usize = 32;

/// A username. It is both the account key and the file name of the user's document,
/// so only a conservative set of characters is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() || name.len() > MAX_USERNAME_LEN {
            return Err(Error::InvalidInput(format!(
                "Usernames must be between 1 and {MAX_USERNAME_LEN} characters."
            )));
        }
        if name.starts_with('.')
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(Error::InvalidInput(String::from(
                "Usernames may only contain letters, digits, '_', '-' and '.'.",
            )));
        }
        Ok(Self(String::from(name)))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for EventId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::EventNotFound(String::from(s)))
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_usernames() {
        assert_eq!(UserId::parse("alice").unwrap().as_str(), "alice");
        assert_eq!(UserId::parse("  bob_99 ").unwrap().as_str(), "bob_99");
        assert!(UserId::parse("j.doe-2").is_ok());
    }

    #[test]
    fn rejects_usernames_unfit_for_file_names() {
        for bad in ["", "   ", ".hidden", "../etc", "a/b", "ü", "x".repeat(33).as_str()] {
            assert!(
                matches!(UserId::parse(bad), Err(Error::InvalidInput(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_event_ids_are_not_found() {
        assert!(matches!(
            "not-a-uuid".parse::<EventId>(),
            Err(Error::EventNotFound(_))
        ));
        let id = EventId::generate();
        assert_eq!(id.to_string().parse::<EventId>().unwrap(), id);
    }
}
