//! Job DTOs for client/cluster communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::JobStatus;

/// Submission-ready job descriptor compiled from an execution plan
///
/// Produced once per submission by the plan compiler and handed to the
/// cluster as a single value; the submission path never inspects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub name: String,
    pub default_parallelism: u32,
    pub vertices: Vec<JobVertex>,
    pub edges: Vec<JobEdge>,
}

/// One compiled operator with its resolved parallelism
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobVertex {
    pub id: String,
    pub operator: String,
    pub parallelism: u32,
}

/// Directed edge between two compiled operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEdge {
    pub source: String,
    pub target: String,
}

/// Raw acknowledgment returned by the cluster once a job is accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub job_id: Uuid,
    pub accepted_at: chrono::DateTime<chrono::Utc>,
}

/// Job record returned by status queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetails {
    pub id: Uuid,
    pub status: JobStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
    pub outcome: Option<JobOutcome>,
}

/// Terminal outcome reported for a finished job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub success: bool,
    pub output: Option<serde_json::Value>,
    pub error_message: Option<String>,
}
