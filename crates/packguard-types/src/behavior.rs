use serde::{Deserialize, Serialize};
use std::fmt;

/// How strictly a protection is enforced for one package.
///
/// Variants are declared from least to most strict, so `Ord` follows strictness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationBehavior {
    /// Never report anything.
    FailNever,
    /// Report only violations introduced since the backlog was recorded.
    FailOnNew,
    /// Report every violation, including the recorded backlog.
    FailOnAny,
}

/// A raw token that is not one of the three behaviors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error(
    "The metadata value {value} is not a valid behavior. Double check your spelling! Acceptable values are {acceptable:?}."
)]
pub struct InvalidBehavior {
    pub value: String,
    pub acceptable: Vec<&'static str>,
}

impl ViolationBehavior {
    pub const ALL: [ViolationBehavior; 3] = [
        ViolationBehavior::FailOnAny,
        ViolationBehavior::FailOnNew,
        ViolationBehavior::FailNever,
    ];

    pub fn from_raw(token: &str) -> Result<Self, InvalidBehavior> {
        match token {
            "fail_on_any" => Ok(ViolationBehavior::FailOnAny),
            "fail_on_new" => Ok(ViolationBehavior::FailOnNew),
            "fail_never" => Ok(ViolationBehavior::FailNever),
            other => Err(InvalidBehavior {
                value: other.to_string(),
                acceptable: Self::ALL.iter().map(|b| b.as_str()).collect(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViolationBehavior::FailOnAny => "fail_on_any",
            ViolationBehavior::FailOnNew => "fail_on_new",
            ViolationBehavior::FailNever => "fail_never",
        }
    }

    pub fn enabled(self) -> bool {
        !self.fails_never()
    }

    pub fn fails_on_any(self) -> bool {
        self == ViolationBehavior::FailOnAny
    }

    pub fn fails_on_new(self) -> bool {
        self == ViolationBehavior::FailOnNew
    }

    pub fn fails_never(self) -> bool {
        self == ViolationBehavior::FailNever
    }
}

impl fmt::Display for ViolationBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViolationBehavior {
    type Err = InvalidBehavior;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_raw(s)
    }
}
