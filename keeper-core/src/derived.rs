//! Derived-value calculation (half and fifth of a base score)
use serde::{Deserialize, Serialize};

/// Half of a score, floor division. Negative input coerces to 0.
#[must_use]
pub fn half(value: i32) -> i32 {
    value.max(0) / 2
}

/// Fifth of a score, floor division. Negative input coerces to 0.
#[must_use]
pub fn fifth(value: i32) -> i32 {
    value.max(0) / 5
}

/// Display-only companion values computed from a base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Derived {
    pub half: i32,
    pub fifth: i32,
}

impl Derived {
    #[must_use]
    pub fn of(value: i32) -> Self {
        Self {
            half: half(value),
            fifth: fifth(value),
        }
    }
}
