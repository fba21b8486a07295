#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input graph or a level structure derived from it is structurally inconsistent.
    #[error("bad element: {reason}")]
    BadElement { reason: String },

    /// The scratch arena could not hold a phase. Retrying with a fresh arena of at least
    /// `required` words succeeds.
    #[error("scratch arena too small: retry with at least {required} words")]
    NoSpace { required: usize },
}

impl Error {
    pub(crate) fn bad(reason: impl Into<String>) -> Self {
        Self::BadElement {
            reason: reason.into(),
        }
    }

    pub(crate) fn no_space(required: usize) -> Self {
        Self::NoSpace { required }
    }

    /// `true` for errors a caller can recover from by retrying with a larger arena.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoSpace { .. })
    }

    /// Raises a `NoSpace` hint to at least `floor` words.
    pub(crate) fn with_space_floor(self, floor: usize) -> Self {
        match self {
            Self::NoSpace { required } => Self::NoSpace {
                required: required.max(floor),
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// An objective name that is neither `bandwidth` nor `profile` (or one of their aliases).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown objective `{name}` (expected `bandwidth` or `profile`)")]
pub struct ParseObjectiveError {
    pub name: String,
}
