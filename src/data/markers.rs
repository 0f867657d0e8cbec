//! Known conversion limitations
//!
//! Substrings that mark a conversion failure as a documented gap in operator
//! coverage rather than a defect. Matching is exact and case-sensitive
//! against `"{kind}: {message}"` of the converter error.
//!
//! These strings track the converter's error wording and go stale when it
//! changes. Extend them from the config file instead of editing this table
//! for one-off cases.

use serde::Deserialize;
use std::fmt;

/// Which side lacks support for the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LimitationKind {
    /// The ONNX schema deliberately leaves the operation to frontends
    SchemaUnsupported,
    /// The target runtime has no equivalent operation
    RuntimeUnsupported,
}

impl fmt::Display for LimitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitationKind::SchemaUnsupported => write!(f, "unsupported by schema"),
            LimitationKind::RuntimeUnsupported => write!(f, "unsupported by runtime"),
        }
    }
}

/// A marker substring and the limitation it indicates
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnownLimitation {
    pub pattern: String,
    pub kind: LimitationKind,
}

impl KnownLimitation {
    pub fn new(pattern: &str, kind: LimitationKind) -> Self {
        KnownLimitation {
            pattern: pattern.to_string(),
            kind,
        }
    }
}

/// Built-in marker table
pub fn builtin_limitations() -> Vec<KnownLimitation> {
    vec![
        KnownLimitation::new(
            "BackendIsNotSupposedToImplementIt",
            LimitationKind::SchemaUnsupported,
        ),
        KnownLimitation::new(
            "is not supported in Tensorflow",
            LimitationKind::RuntimeUnsupported,
        ),
        KnownLimitation::new(
            "is not supported in TensorFlow",
            LimitationKind::RuntimeUnsupported,
        ),
    ]
}
