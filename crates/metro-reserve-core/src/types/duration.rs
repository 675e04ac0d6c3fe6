//! Human-readable durations for config files and CLI flags

use crate::error::Error;
use crate::utils::{format_duration, parse_duration};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A [`Duration`] written as `500ms`, `1s`, `2m`, `1h` or bare seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct HumanDuration(pub Duration);

impl HumanDuration {
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl From<Duration> for HumanDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl From<HumanDuration> for Duration {
    fn from(d: HumanDuration) -> Self {
        d.0
    }
}

impl FromStr for HumanDuration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s).map(Self)
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}

impl Serialize for HumanDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(self.0))
    }
}

impl<'de> Deserialize<'de> for HumanDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Ok(Self::from_secs(secs)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Holder {
        wait: HumanDuration,
    }

    #[test]
    fn test_deserialize_from_string_and_integer() {
        let text: Holder = serde_yaml_ng::from_str("wait: 2m").unwrap();
        assert_eq!(text.wait.as_duration(), Duration::from_secs(120));

        let number: Holder = serde_yaml_ng::from_str("wait: 7").unwrap();
        assert_eq!(number.wait.as_duration(), Duration::from_secs(7));
    }

    #[test]
    fn test_deserialize_rejects_invalid_text() {
        let result: Result<Holder, _> = serde_yaml_ng::from_str("wait: soon");
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_text() {
        let yaml = serde_yaml_ng::to_string(&Holder {
            wait: HumanDuration::from_millis(1500),
        })
        .unwrap();
        assert_eq!(yaml.trim(), "wait: 1500ms");
    }
}
