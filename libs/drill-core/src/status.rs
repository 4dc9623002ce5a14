//! Per-word learning status stored as a bitmask of passed drills.
//!
//! Every drill type owns one bit. A word is `new` while no bit is set and
//! `done` once every bit in [`StatusFlag::ALL`] is set. The classification is
//! always computed against the current flag set, so adding a drill type
//! changes what `done` means for records that were stored earlier.

use serde::{Deserialize, Serialize};

/// One drill type's bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    Repetition,
    Listening,
    WordBuilder,
}

impl StatusFlag {
    /// The complete set of flags currently defined.
    pub const ALL: [StatusFlag; 3] = [Self::Repetition, Self::Listening, Self::WordBuilder];

    /// The single bit this flag occupies.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Repetition => 1 << 0,
            Self::Listening => 1 << 1,
            Self::WordBuilder => 1 << 2,
        }
    }
}

/// Bitmask of drills a word has passed since its last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(u32);

/// Derived status used for coloring word lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusClass {
    pub new: bool,
    pub done: bool,
    pub in_progress: bool,
}

impl Status {
    pub const NEW: Status = Status(0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Value with every currently defined flag set.
    pub fn all() -> Self {
        StatusFlag::ALL
            .iter()
            .fold(Self::NEW, |status, flag| status.add(*flag))
    }

    #[must_use]
    pub const fn add(self, flag: StatusFlag) -> Self {
        Self(self.0 | flag.bits())
    }

    #[must_use]
    pub const fn remove(self, flag: StatusFlag) -> Self {
        Self(self.0 & !flag.bits())
    }

    pub const fn has(self, flag: StatusFlag) -> bool {
        self.0 & flag.bits() == flag.bits()
    }

    pub fn is_new(self) -> bool {
        self.0 == 0
    }

    pub fn is_done(self) -> bool {
        StatusFlag::ALL.iter().all(|flag| self.has(*flag))
    }

    pub fn classify(self) -> StatusClass {
        let new = self.is_new();
        let done = self.is_done();
        StatusClass {
            new,
            done,
            in_progress: !new && !done,
        }
    }

    /// Binary rendering, handy in logs.
    pub fn binary(self) -> String {
        format!("{:04b}", self.0)
    }
}

impl From<u32> for Status {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_are_distinct_single_bits() {
        for (i, a) in StatusFlag::ALL.iter().enumerate() {
            assert_eq!(a.bits().count_ones(), 1);
            for b in &StatusFlag::ALL[i + 1..] {
                assert_eq!(a.bits() & b.bits(), 0);
            }
        }
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        for bits in 0..8 {
            let value = Status::from_bits(bits);
            for flag in StatusFlag::ALL {
                assert!(value.add(flag).has(flag));
                assert!(!value.add(flag).remove(flag).has(flag));
            }
        }
    }

    #[test]
    fn test_operations_leave_other_bits_alone() {
        let value = Status::NEW.add(StatusFlag::Repetition).add(StatusFlag::WordBuilder);
        let removed = value.remove(StatusFlag::WordBuilder);
        assert!(removed.has(StatusFlag::Repetition));
        assert!(!removed.has(StatusFlag::Listening));
        assert_eq!(value.add(StatusFlag::Repetition), value);
    }

    #[test]
    fn test_classify_new() {
        assert_eq!(
            Status::NEW.classify(),
            StatusClass { new: true, done: false, in_progress: false }
        );
    }

    #[test]
    fn test_classify_done() {
        assert_eq!(
            Status::all().classify(),
            StatusClass { new: false, done: true, in_progress: false }
        );
    }

    #[test]
    fn test_classify_intermediate_values() {
        let all = Status::all().bits();
        for bits in 1..all {
            let class = Status::from_bits(bits).classify();
            assert!(class.in_progress, "bits {bits:03b} should be in progress");
            assert!(!class.new);
            assert!(!class.done);
        }
    }

    #[test]
    fn test_binary_rendering() {
        assert_eq!(Status::from_bits(5).binary(), "0101");
    }
}
