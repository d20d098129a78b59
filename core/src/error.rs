use thiserror::Error;

/// Recoverable errors: conditions the caller set up wrong, reported instead
/// of panicking because they're reachable from ordinary misuse (a bad ROM
/// image, an oversized bulk write) rather than a CPU-decode bug.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum CoreError {
    #[error("write of {len} bytes at {start:#06x} exceeds {capacity}-byte address space")]
    OutOfRangeWrite {
        start: usize,
        len: usize,
        capacity: usize,
    },
}
