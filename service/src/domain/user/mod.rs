//! [`User`] definitions.

pub mod session;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
use secrecy::{zeroize::Zeroize, CloneableSecret, ExposeSecret as _, SecretBox};
use serde::{Deserialize, Serialize};
use tokio::task;
use uuid::Uuid;

pub use self::session::Session;

/// Blog user able to author [`Post`]s.
///
/// [`Post`]: crate::domain::Post
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Email address of a [`User`].
///
/// Unique across all [`User`]s. Its format is not validated.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Email(String);

/// Password of a [`User`] in clear text.
#[derive(AsRef, Clone, Debug, Display, Eq, From, FromStr, PartialEq)]
#[as_ref(str)]
#[from(&str, String)]
pub struct Password(String);

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// [bcrypt] hash of a [`User`]'s [`Password`].
///
/// [bcrypt]: https://en.wikipedia.org/wiki/Bcrypt
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Creates a new [`PasswordHash`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `hash` was produced by
    /// [`PasswordHash::new()`].
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Hashes the provided [`Password`] with the provided `cost` factor.
    ///
    /// Hashing is performed on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// If the `cost` is out of the range supported by [`bcrypt`], or the
    /// hashing task panicked.
    pub async fn new(
        password: SecretBox<Password>,
        cost: u32,
    ) -> Result<Self, HashingError> {
        task::spawn_blocking(move || {
            let password: &str = password.expose_secret().as_ref();
            bcrypt::hash(password, cost)
        })
        .await?
        .map(Self)
        .map_err(Into::into)
    }

    /// Checks whether the provided [`Password`] matches this
    /// [`PasswordHash`].
    ///
    /// # Errors
    ///
    /// If this [`PasswordHash`] is malformed, or the verifying task panicked.
    pub async fn verify(
        &self,
        password: SecretBox<Password>,
    ) -> Result<bool, HashingError> {
        let hash = self.0.clone();
        task::spawn_blocking(move || {
            let password: &str = password.expose_secret().as_ref();
            bcrypt::verify(password, &hash)
        })
        .await?
        .map_err(Into::into)
    }
}

/// Error of [`PasswordHash`] computation.
#[derive(Debug, Display, Error, From)]
pub enum HashingError {
    /// [`bcrypt`] failed.
    #[display("`bcrypt` failed: {_0}")]
    Bcrypt(bcrypt::BcryptError),

    /// Blocking hashing task failed to complete.
    #[display("Hashing task failed: {_0}")]
    Task(task::JoinError),
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use super::{Password, PasswordHash};

    fn secret(password: &str) -> SecretBox<Password> {
        SecretBox::new(Box::new(password.into()))
    }

    #[tokio::test]
    async fn hashes_and_verifies() {
        let hash = PasswordHash::new(secret("secret1"), 4).await.unwrap();

        assert_ne!(hash.to_string(), "secret1");
        assert!(hash.verify(secret("secret1")).await.unwrap());
        assert!(!hash.verify(secret("secret2")).await.unwrap());
    }

    #[tokio::test]
    async fn salts_every_hash() {
        let first = PasswordHash::new(secret("secret1"), 4).await.unwrap();
        let second = PasswordHash::new(secret("secret1"), 4).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn rejects_invalid_cost() {
        assert!(PasswordHash::new(secret("secret1"), 2).await.is_err());
    }

    #[tokio::test]
    async fn fails_on_malformed_hash() {
        #[expect(unsafe_code, reason = "testing malformed input")]
        let hash = unsafe { PasswordHash::new_unchecked("not-a-hash") };

        assert!(hash.verify(secret("secret1")).await.is_err());
    }
}
