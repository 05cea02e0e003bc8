use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

/// Textual identifier of an on-chain actor: the bot itself, a token ledger,
/// or an operator allowed to administer the bot.
///
/// Validation is structural only — dash-separated base32 groups of five with
/// a shorter final group — which is enough to reject typos before a command
/// leaves the console. The remote side remains the authority on whether the
/// identifier exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

const MAX_TEXT_LEN: usize = 63;

impl Principal {
    pub fn from_text(text: &str) -> Result<Self> {
        let invalid = || ConsoleError::InvalidArgument(format!("invalid principal: {text:?}"));

        if text.is_empty() || text.len() > MAX_TEXT_LEN {
            return Err(invalid());
        }
        let groups: Vec<&str> = text.split('-').collect();
        if groups.len() < 2 {
            return Err(invalid());
        }
        for (i, group) in groups.iter().enumerate() {
            let last = i == groups.len() - 1;
            if (last && (group.is_empty() || group.len() > 5)) || (!last && group.len() != 5) {
                return Err(invalid());
            }
            if !group
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
            {
                return Err(invalid());
            }
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Principal {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

impl TryFrom<String> for Principal {
    type Error = ConsoleError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_text(&value)
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_forms() {
        for text in [
            "aaaaa-aa",
            "ryjl3-tyaaa-aaaaa-aaaba-cai",
            "mxzaz-hqaaa-aaaar-qaada-cai",
        ] {
            assert_eq!(Principal::from_text(text).unwrap().as_str(), text);
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for text in [
            "",
            "noseparator",
            "UPPER-case",
            "aaaa-aa",       // non-final group must be exactly five
            "aaaaa-aaaaaa",  // final group too long
            "aaaaa-",        // empty final group
            "aaaaa--aa",     // empty middle group
            "aaaaa-aa!aa",
        ] {
            assert!(Principal::from_text(text).is_err(), "{text:?}");
        }
    }

    #[test]
    fn rejects_overlong_text() {
        let long = ["aaaaa"; 12].join("-");
        assert!(long.len() > 63);
        assert!(Principal::from_text(&long).is_err());
    }

    #[test]
    fn serde_roundtrip_validates() {
        let p: Principal = serde_json::from_str("\"aaaaa-aa\"").unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"aaaaa-aa\"");
        assert!(serde_json::from_str::<Principal>("\"bad\"").is_err());
    }
}
