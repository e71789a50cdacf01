use core::fmt;
use core::num::NonZeroU32;

/// Upper bound on consecutive attempts made for a single value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RetryBudget(NonZeroU32);

impl RetryBudget {
    pub const DEFAULT: RetryBudget = match NonZeroU32::new(10) {
        Some(attempts) => RetryBudget(attempts),
        None => unreachable!(),
    };

    /// Returns `None` for a zero budget.
    pub const fn new(attempts: u32) -> Option<Self> {
        match NonZeroU32::new(attempts) {
            Some(attempts) => Some(RetryBudget(attempts)),
            None => None,
        }
    }

    pub const fn attempts(self) -> u32 {
        self.0.get()
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RetryBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} attempts", self.0)
    }
}

/// Calls `attempt` until it yields a value or `budget` calls have been made.
///
/// The loop is a tight busy-retry: nothing sleeps, yields or backs off between
/// attempts, and the remaining budget is left untouched once a value arrives.
pub fn retry<T, F>(budget: RetryBudget, mut attempt: F) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    (0..budget.attempts()).find_map(|_| attempt())
}
