//! Engine seam.

use crate::contract::{EngineOutput, PathData};
use crate::error::EngineResult;

/// Computes the noise at the end of an assembled path.
///
/// Implementations are deterministic: the same `PathData` gives the same
/// output. A returned `Err` is an engine fault; a path that can be computed
/// but is physically questionable should come back as `Ok` with
/// `calculation_valid = false` and warnings.
pub trait PropagationEngine {
    /// Name recorded alongside stored results.
    fn name(&self) -> &str;

    fn calculate(&self, data: &PathData) -> EngineResult<EngineOutput>;
}
