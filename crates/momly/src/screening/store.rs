use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::ScreeningSession;

/// Opaque handle a client holds between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("not a valid session id")]
pub struct InvalidSessionId;

impl FromStr for SessionId {
    type Err = InvalidSessionId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| InvalidSessionId)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("screening session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Where live sessions are kept between requests. Implementations must be
/// safe to share across the handler tasks of one server.
pub trait SessionStore: Send + Sync {
    fn insert(&self, id: SessionId, session: ScreeningSession) -> Result<(), StoreError>;

    fn fetch(&self, id: &SessionId) -> Result<Option<ScreeningSession>, StoreError>;

    /// Replace the stored session. Fails with [`StoreError::NotFound`] when
    /// the id was never inserted.
    fn update(&self, id: &SessionId, session: ScreeningSession) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_their_display_form() {
        let id = SessionId::generate();
        let parsed: SessionId = id.to_string().parse().expect("well-formed id");
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert_eq!("not-a-uuid".parse::<SessionId>(), Err(InvalidSessionId));
        assert_eq!("".parse::<SessionId>(), Err(InvalidSessionId));
    }
}
