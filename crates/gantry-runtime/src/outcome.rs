//! Outcome of a single instantiate-and-invoke cycle.

use wasmtime::Val;

use gantry_core::error::GantryError;

/// What one run of the shim produced.
///
/// On success the interesting output has usually already flowed through
/// the host callables; the values here are whatever the entry point
/// returned (often nothing).
#[derive(Debug)]
pub enum Outcome {
    Success(Vec<Val>),
    Failure(GantryError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn into_result(self) -> Result<Vec<Val>, GantryError> {
        match self {
            Outcome::Success(vals) => Ok(vals),
            Outcome::Failure(err) => Err(err),
        }
    }
}

impl From<Result<Vec<Val>, GantryError>> for Outcome {
    fn from(result: Result<Vec<Val>, GantryError>) -> Self {
        match result {
            Ok(vals) => Outcome::Success(vals),
            Err(err) => Outcome::Failure(err),
        }
    }
}
