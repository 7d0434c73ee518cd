use serde::{Deserialize, Serialize};
use std::fmt;

/// A volunteer's declared willingness to help with a skill category
///
/// Variants are declared from highest to lowest priority, so the derived
/// `Ord` sorts the most eager volunteers first. Anything that is not one of
/// the three known labels becomes `Unspecified` when the document is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum PreferenceLevel {
    WouldLoveTo,
    WouldLikeTo,
    WouldntMind,
    #[default]
    Unspecified,
}

impl PreferenceLevel {
    pub const WOULD_LOVE_TO: &'static str = "Would love to!";
    pub const WOULD_LIKE_TO: &'static str = "Would like to.";
    pub const WOULDNT_MIND: &'static str = "Wouldn't mind helping.";

    /// Labels that count as a declared preference
    pub const DECLARED_LABELS: [&'static str; 3] =
        [Self::WOULD_LOVE_TO, Self::WOULD_LIKE_TO, Self::WOULDNT_MIND];

    /// Parse a stored label; unknown labels map to `Unspecified`
    pub fn parse(label: &str) -> Self {
        match label {
            Self::WOULD_LOVE_TO => Self::WouldLoveTo,
            Self::WOULD_LIKE_TO => Self::WouldLikeTo,
            Self::WOULDNT_MIND => Self::WouldntMind,
            _ => Self::Unspecified,
        }
    }

    /// Numeric rank, 1 (highest priority) to 4
    pub fn rank(self) -> u8 {
        match self {
            Self::WouldLoveTo => 1,
            Self::WouldLikeTo => 2,
            Self::WouldntMind => 3,
            Self::Unspecified => 4,
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::WouldLoveTo => Some(Self::WOULD_LOVE_TO),
            Self::WouldLikeTo => Some(Self::WOULD_LIKE_TO),
            Self::WouldntMind => Some(Self::WOULDNT_MIND),
            Self::Unspecified => None,
        }
    }

    #[inline]
    pub fn is_declared(self) -> bool {
        self != Self::Unspecified
    }
}

impl From<Option<String>> for PreferenceLevel {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::parse).unwrap_or_default()
    }
}

impl From<PreferenceLevel> for Option<String> {
    fn from(value: PreferenceLevel) -> Self {
        value.label().map(str::to_string)
    }
}

impl fmt::Display for PreferenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("unspecified"))
    }
}
