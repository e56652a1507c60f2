//! Password verification
//!
//! The search engine only ever asks one question: does this candidate unlock
//! the target? [`CrackOracle`] is that question. Implementations must be safe to
//! call from many worker threads at once and must answer `false` for any
//! failure while verifying, never panic or error.

mod archive;

pub use archive::ZipOracle;

/// Verifies whether a candidate password unlocks the target
pub trait CrackOracle: Send + Sync {
    fn try_password(&self, password: &str) -> bool;
}

/// Any `Fn(&str) -> bool` closure is an oracle
impl<F> CrackOracle for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn try_password(&self, password: &str) -> bool {
        self(password)
    }
}
