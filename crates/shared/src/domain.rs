use std::{fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

const MAX_PARAMETER_LEN: usize = 128;

macro_rules! key_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

key_newtype!(EntryId);
key_newtype!(MatchId);

/// An externally sourced item shown in a list view.
///
/// The view core only ever looks at the key; anything else it needs (a sort
/// field, a filter) is handed to it as a function over the record.
pub trait Record: fmt::Debug + Clone + Send + Sync + 'static {
    type Key: fmt::Debug + Clone + Eq + Hash + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
}

/// Validated identifier selecting which collection to fetch, e.g. a player
/// PUUID taken from a route segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchParameter(String);

impl FetchParameter {
    pub fn parse(raw: Option<&str>) -> Result<Self, FetchError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        let well_formed = !raw.is_empty()
            && raw.len() <= MAX_PARAMETER_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(FetchError::InvalidParameter);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_absent_and_blank() {
        assert_eq!(FetchParameter::parse(None), Err(FetchError::InvalidParameter));
        assert_eq!(FetchParameter::parse(Some("")), Err(FetchError::InvalidParameter));
        assert_eq!(FetchParameter::parse(Some("   ")), Err(FetchError::InvalidParameter));
    }

    #[test]
    fn parse_rejects_path_breaking_characters() {
        assert!(FetchParameter::parse(Some("abc/def")).is_err());
        assert!(FetchParameter::parse(Some("abc?x=1")).is_err());
        assert!(FetchParameter::parse(Some("a".repeat(MAX_PARAMETER_LEN + 1).as_str())).is_err());
    }

    #[test]
    fn parse_accepts_riot_puuid_shape() {
        let raw = "Xb3k_9Qm-2LwZr1yT0pA8sVdN4hJ6uE5cF7gH2iK";
        let parameter = FetchParameter::parse(Some(format!("  {raw} ").as_str())).expect("valid");
        assert_eq!(parameter.as_str(), raw);
    }
}
