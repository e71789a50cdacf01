//! Process exit status of `drng-dump`.

/// Every requested word was written.
pub const SUCCESS: u8 = 0;
/// The hardware kept underflowing; the output holds a truncated prefix.
pub const HARDWARE_EXHAUSTED: u8 = 1;
/// Malformed or missing command-line arguments. Matches clap's usage error.
pub const INVALID_ARGUMENT: u8 = 2;
/// The output could not be opened, written or closed.
pub const IO_FAILURE: u8 = 3;
/// The CPU has no hardware randomness instruction.
pub const UNSUPPORTED_CPU: u8 = 4;
