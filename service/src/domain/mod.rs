//! Domain definitions.

pub mod post;
pub mod user;

pub use self::{post::Post, user::User};
