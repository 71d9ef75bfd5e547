use std::io;

/// Problems found while reading a batch of test cases.
///
/// Line numbers are 1-based and count blank lines.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("line {line}: invalid {field} {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unknown garrison label {label:?} (expected A, B or -)")]
    InvalidGarrison { line: usize, label: String },

    #[error("line {line}: city {city} out of range 1..={cities}")]
    CityOutOfRange {
        line: usize,
        city: u64,
        cities: u32,
    },

    #[error("line {line}: unexpected trailing input {rest:?}")]
    TrailingInput { line: usize, rest: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}
