//! Marker types.

/// Marker of an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker of an entity publication.
#[derive(Clone, Copy, Debug)]
pub struct Publication;

/// Marker of an entity expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
