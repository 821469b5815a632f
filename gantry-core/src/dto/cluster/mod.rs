//! Cluster DTOs for the management handshake

use serde::{Deserialize, Serialize};

/// Management-plane description of a running cluster
///
/// Returned when a configured cluster id is looked up against the management
/// endpoint; `endpoint` is the data-plane base URL jobs are submitted to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub id: String,
    pub endpoint: String,
}
