use serde::{Deserialize, Deserializer, Serialize};

/// Campaign role vocabulary. Stored as `"GM"` / `"Player"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "GM")]
    Gm,
    #[serde(rename = "Player")]
    Player,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gm => "GM",
            Self::Player => "Player",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GM" => Some(Self::Gm),
            "Player" => Some(Self::Player),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field of a partial update.
///
/// `Unset` means the caller did not mention the field and the stored value
/// must be left alone. `Set(v)` overwrites it, even when `v` is empty. For
/// nullable columns use `Patch<Option<T>>` so that an explicit `null` clears
/// the value while an omitted field does not.
///
/// When deserializing, put `#[serde(default)]` on the field: a missing key
/// becomes `Unset`, any present value (including `null`) becomes `Set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Unset,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        name: Patch<String>,
        #[serde(default)]
        description: Patch<Option<String>>,
    }

    #[test]
    fn test_missing_field_is_unset() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(body.name, Patch::Unset);
        assert_eq!(body.description, Patch::Unset);
    }

    #[test]
    fn test_null_is_set_to_none() {
        let body: Body = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(body.name, Patch::Unset);
        assert_eq!(body.description, Patch::Set(None));
    }

    #[test]
    fn test_empty_string_is_set() {
        let body: Body = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert_eq!(body.name, Patch::Set(String::new()));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("GM"), Some(Role::Gm));
        assert_eq!(Role::parse("Player"), Some(Role::Player));
        assert_eq!(Role::parse("gm"), None);
        assert_eq!(serde_json::to_string(&Role::Gm).unwrap(), r#""GM""#);
    }
}
