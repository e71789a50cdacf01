use std::fmt;
use std::io;

/// Why a collection run did not write every requested word.
#[derive(Debug)]
pub enum CollectionError {
    /// The retry budget ran out on a word; `written` words made it to the sink.
    HardwareExhausted { written: u64 },
    Io(io::Error),
    /// The collector already reached a terminal state.
    AlreadyFinished,
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::HardwareExhausted { written } => write!(
                f,
                "hardware randomness exhausted after {} word(s) were written",
                written
            ),
            CollectionError::Io(e) => write!(f, "output error: {}", e),
            CollectionError::AlreadyFinished => f.write_str("collector has already finished"),
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CollectionError {
    fn from(err: io::Error) -> Self {
        CollectionError::Io(err)
    }
}

/// No word could be produced within the retry budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Underflow;

impl fmt::Display for Underflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("hardware randomness instruction kept underflowing")
    }
}

impl std::error::Error for Underflow {}

impl From<Underflow> for io::Error {
    fn from(err: Underflow) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}
