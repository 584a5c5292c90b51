//! Character identifiers.
//!
//! Actions, hooks and selectors address characters by id rather than by
//! reference, so the combat can lend out one mutable character at a time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a character, unique across both teams of a combat.
///
/// Serialized as a bare string.
///
/// ```rust
/// use zzcombat::CharacterId;
///
/// let hero: CharacterId = "hero".into();
/// assert_eq!(hero.as_str(), "hero");
/// assert_eq!(CharacterId::from(7u32).to_string(), "7");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CharacterId(Arc<str>);

impl CharacterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CharacterId {
    fn from(id: &str) -> Self {
        Self(Arc::from(id))
    }
}

impl From<String> for CharacterId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

// Numeric ids from data files keep their decimal form.
impl From<u32> for CharacterId {
    fn from(id: u32) -> Self {
        Self::from(id.to_string())
    }
}

impl From<&CharacterId> for CharacterId {
    fn from(id: &CharacterId) -> Self {
        id.clone()
    }
}

impl From<CharacterId> for String {
    fn from(id: CharacterId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_text_ids_match() {
        assert_eq!(CharacterId::from(12u32), CharacterId::from("12"));
        assert_ne!(CharacterId::from(12u32), CharacterId::from("012"));
    }

    #[test]
    fn test_id_is_plain_json_string() {
        let id = CharacterId::from("archer");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"archer\"");
        let parsed: Vec<CharacterId> = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(parsed, vec![CharacterId::from("a"), CharacterId::from("b")]);
    }
}
