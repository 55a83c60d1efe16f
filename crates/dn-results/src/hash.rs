//! Content-based hashing for analysis ids.

use dn_engine::PathData;
use sha2::{Digest, Sha256};

/// Id of an analysis: SHA-256 over the assembled input, the path it belongs
/// to and the engine that computed it.
pub fn compute_analysis_id(path_id: &str, data: &PathData, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    hasher.update(path_id.as_bytes());
    hasher.update([0u8]);

    let data_json = serde_json::to_string(data).unwrap_or_default();
    hasher.update(data_json.as_bytes());
    hasher.update([0u8]);

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
