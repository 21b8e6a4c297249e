//! Item types and model variants.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// ItemType
// ---------------------------------------------------------------------------

/// Kind of screening item. Each kind has its own answer comparison policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Single letter recognition. Case-insensitive.
    Letter,
    /// Whole word reading. Case-insensitive.
    Word,
    /// Arrange scrambled letters into a word. Prompt is `"<scrambled> -> <target>"`.
    Arrange,
}

impl ItemType {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::Word => "word",
            Self::Arrange => "arrange",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "letter" => Ok(Self::Letter),
            "word" => Ok(Self::Word),
            "arrange" => Ok(Self::Arrange),
            other => Err(CoreError::Validation(format!("unknown item type '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// ModelVariant
// ---------------------------------------------------------------------------

/// Which risk network architecture and feature layout to use.
///
/// ```text
/// standard: [letters, words, arrange, speech, image, rt_norm] -> 32 -> 16 -> 8 -> 1
/// compact:  [letters, words, arrange]                         -> 8 -> 4 -> 1
/// ```
///
/// `Standard` is canonical; `Compact` reproduces the legacy in-process backend model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    #[default]
    Standard,
    Compact,
}

impl ModelVariant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Compact => "compact",
        }
    }

    /// Number of input features the network of this variant consumes.
    #[must_use]
    pub const fn input_dim(self) -> usize {
        match self {
            Self::Standard => 6,
            Self::Compact => 3,
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "compact" => Ok(Self::Compact),
            other => Err(CoreError::Validation(format!(
                "unknown model variant '{other}'"
            ))),
        }
    }
}
