//! Leveled internal assertions.
//!
//! Violations of internal invariants (e.g. a tree walk reaching a block of the wrong variant, or a
//! solve on an unfrozen curriculum) are programmer errors. They are checked with the macros below
//! in tests and when the `debug-checks` feature is enabled; release builds only run the simple
//! level.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const ADVISOR_ASSERT_LEVEL_DEFINITION: u8 = ADVISOR_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const ADVISOR_ASSERT_LEVEL_DEFINITION: u8 = ADVISOR_ASSERT_ADVANCED;

pub const ADVISOR_ASSERT_SIMPLE: u8 = 1;
pub const ADVISOR_ASSERT_MODERATE: u8 = 2;
pub const ADVISOR_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! advisor_assert_simple {
    ($($arg:tt)*) => {
        if $crate::advisor_asserts::ADVISOR_ASSERT_LEVEL_DEFINITION >= $crate::advisor_asserts::ADVISOR_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! advisor_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::advisor_asserts::ADVISOR_ASSERT_LEVEL_DEFINITION >= $crate::advisor_asserts::ADVISOR_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! advisor_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::advisor_asserts::ADVISOR_ASSERT_LEVEL_DEFINITION >= $crate::advisor_asserts::ADVISOR_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! advisor_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::advisor_asserts::ADVISOR_ASSERT_LEVEL_DEFINITION >= $crate::advisor_asserts::ADVISOR_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}
