use std::fmt;

use alloy::dyn_abi::DynSolValue;

/// What the on-chain value of a step is expected to be.
pub enum Expected {
    /// The step is never considered satisfied by a read. Used by steps without a read.
    Never,
    Equals(DynSolValue),
    Matches(Box<dyn Fn(&DynSolValue) -> bool + Send + Sync>),
}

impl Expected {
    pub fn holds(&self, observed: &DynSolValue) -> bool {
        match self {
            Expected::Never => false,
            Expected::Equals(expected) => expected == observed,
            Expected::Matches(predicate) => predicate(observed),
        }
    }
}

impl fmt::Debug for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Never => f.write_str("Never"),
            Expected::Equals(value) => f.debug_tuple("Equals").field(value).finish(),
            Expected::Matches(_) => f.write_str("Matches(<predicate>)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Write,
}

/// Decides whether a step needs a write.
///
/// `observed` is `None` for steps without a read. Those are written once per run:
/// `already_written` tells whether the same write was already performed (or recorded) earlier.
pub fn decide(observed: Option<&DynSolValue>, expected: &Expected, already_written: bool) -> Action {
    match observed {
        Some(value) if expected.holds(value) => Action::None,
        Some(_) => Action::Write,
        None if already_written => Action::None,
        None => Action::Write,
    }
}
