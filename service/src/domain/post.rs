//! [`Post`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use uuid::Uuid;

/// Blog post.
#[derive(Clone, Debug)]
pub struct Post {
    /// ID of this [`Post`].
    pub id: Id,

    /// [`Title`] of this [`Post`].
    pub title: Option<Title>,

    /// [`Body`] of this [`Post`].
    pub body: Option<Body>,

    /// [`Image`] of this [`Post`].
    pub image: Option<Image>,

    /// [`Author`] of this [`Post`].
    pub author: Option<Author>,

    /// [`DateTime`] this [`Post`] is published at.
    pub date: PublicationDateTime,
}

/// ID of a [`Post`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Defines free-form text fields of a [`Post`].
macro_rules! define_text {
    ($(
        #[doc = $doc:literal]
        $name:ident
    ),* $(,)?) => {$(
        #[doc = $doc]
        #[derive(AsRef, Clone, Debug, Display, Eq, From, Into, PartialEq)]
        #[as_ref(str, String)]
        #[from(&str, String)]
        pub struct $name(String);
    )*};
}

define_text! {
    /// Title of a [`Post`].
    Title,

    /// Body of a [`Post`].
    Body,

    /// Image reference (usually a URL) of a [`Post`].
    Image,

    /// Author name of a [`Post`].
    Author,
}

/// [`DateTime`] when a [`Post`] is published.
pub type PublicationDateTime = DateTimeOf<(Post, unit::Publication)>;
