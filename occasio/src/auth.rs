use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{debug, info};

pub use argon2::Params;

use crate::{
    models::{Database, User, UserId},
    Error, Result,
};

const SALT_LEN: usize = 16;

/// Registers accounts and checks credentials against the user documents.
#[derive(Clone, Default)]
pub struct Authenticator {
    argon2: Argon2<'static>,
}
impl Authenticator {
    pub fn new(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }

    pub fn register(&self, db: &Database, username: &str, password: &str) -> Result<User> {
        let id = UserId::parse(username)?;
        if password.is_empty() {
            return Err(Error::InvalidInput(String::from("Passwords cannot be empty.")));
        }
        if db.fetch_user(&id)?.is_some() {
            return Err(Error::DuplicateUser(id.to_string()));
        }

        let user = User::new(id, self.hash(password)?);
        db.add_user(&user)?;
        info!(user = %user.id, "Registered");
        Ok(user)
    }

    pub fn login(&self, db: &Database, username: &str, password: &str) -> Result<UserId> {
        let id = UserId::parse(username).map_err(|_| Error::InvalidCredentials)?;
        let Some(user) = db.fetch_user(&id)? else {
            debug!(user = %id, "Login for unknown user");
            return Err(Error::InvalidCredentials);
        };

        let hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        self.argon2
            .verify_password(password.as_bytes(), &hash)
            .map_err(|_| Error::InvalidCredentials)?;

        info!(user = %id, "Logged in");
        Ok(id)
    }

    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::encode_b64(&rand::random::<[u8; SALT_LEN]>())
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::PasswordHash(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) fn cheap_authenticator() -> Authenticator {
    Authenticator::new(Params::new(1024, 1, 1, None).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Database, Authenticator) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path()).unwrap();
        (dir, db, cheap_authenticator())
    }

    #[test]
    fn second_registration_is_a_duplicate() {
        let (_dir, db, auth) = setup();
        auth.register(&db, "alice", "pw1").unwrap();

        assert!(matches!(
            auth.register(&db, "alice", "pw2"),
            Err(Error::DuplicateUser(_))
        ));
        assert!(auth.login(&db, "alice", "pw1").is_ok());
        assert!(matches!(
            auth.login(&db, "alice", "pw2"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn passwords_are_stored_hashed_and_salted() {
        let (_dir, db, auth) = setup();
        let alice = auth.register(&db, "alice", "hunter2").unwrap();
        let bob = auth.register(&db, "bob", "hunter2").unwrap();

        assert_ne!(alice.password_hash, "hunter2");
        assert!(!alice.password_hash.contains("hunter2"));
        assert!(alice.password_hash.starts_with("$argon2id$"));
        assert_ne!(alice.password_hash, bob.password_hash);

        let raw = std::fs::read_to_string(dir_file(&db, "alice")).unwrap();
        assert!(!raw.contains("hunter2"));
    }

    fn dir_file(db: &Database, name: &str) -> std::path::PathBuf {
        db.path().join("users").join(format!("{name}.ron"))
    }

    #[test]
    fn login_checks_credentials() {
        let (_dir, db, auth) = setup();
        auth.register(&db, "alice", "pw1").unwrap();

        assert_eq!(auth.login(&db, "alice", "pw1").unwrap().as_str(), "alice");
        for (user, password) in [("alice", "wrong"), ("alice", ""), ("bob", "pw1"), ("../x", "pw1")] {
            assert!(
                matches!(auth.login(&db, user, password), Err(Error::InvalidCredentials)),
                "{user}/{password} should not log in"
            );
        }
    }

    #[test]
    fn registration_validates_input() {
        let (_dir, db, auth) = setup();

        assert!(matches!(
            auth.register(&db, "alice", ""),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            auth.register(&db, "a/b", "pw"),
            Err(Error::InvalidInput(_))
        ));
        assert!(db.fetch_user(&UserId::parse("alice").unwrap()).unwrap().is_none());
    }
}
