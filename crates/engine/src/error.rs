#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The foreign allocator could not satisfy a request. Nothing was kept.
    Allocation { bytes: usize },
    /// The engine reported a length that is negative or exceeds the buffer.
    Corruption { reported: i64, capacity: usize },
    /// The decoded data has the wrong shape for the call that produced it.
    Protocol(String),
    /// A value that must encode an integer failed the exact-integer check.
    NonIntegral { index: usize, value: f64 },
    /// The buffer was used after it had been released.
    Released,
    /// The buffer's element size does not match the call's element type.
    ElementSize { expected: usize, actual: usize },
    /// A fixture document could not be parsed.
    Fixture(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Allocation { bytes } => {
                write!(f, "foreign allocation of {bytes} bytes failed")
            }
            EngineError::Corruption { reported, capacity } => write!(
                f,
                "native engine reported length {reported} for a buffer of capacity {capacity}"
            ),
            EngineError::Protocol(msg) => write!(f, "native engine protocol error: {msg}"),
            EngineError::NonIntegral { index, value } => {
                write!(f, "value {value} at position {index} is not an exact integer")
            }
            EngineError::Released => write!(f, "foreign buffer used after release"),
            EngineError::ElementSize { expected, actual } => write!(
                f,
                "foreign buffer element size is {actual} bytes, call expects {expected}"
            ),
            EngineError::Fixture(msg) => write!(f, "invalid engine fixture: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
