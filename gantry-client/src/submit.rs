//! Submission adapter
//!
//! Issues the submission call on a live client and adapts the asynchronous
//! acknowledgment into a caller-facing job handle. The call is spawned onto
//! the runtime so it is already in flight when the caller's connection scope
//! is released; the pending job resolves later without blocking anyone.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use gantry_core::domain::job::JobStatus;
use gantry_core::dto::job::JobSpec;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::cluster::ClusterClient;
use crate::error::{Result, SubmitError, TransportError};

/// Issues the submission call and wires up the result adaptation
///
/// The returned [`PendingJob`] resolves once the cluster acknowledges the
/// job: the job id is extracted from the receipt first, then the handle is
/// constructed around the shared client. A failed submission passes through
/// both steps unchanged; no handle is ever built from one.
pub fn dispatch(client: Arc<dyn ClusterClient>, spec: JobSpec) -> PendingJob {
    let task = tokio::spawn(async move {
        let receipt = client
            .submit(spec)
            .await
            .map_err(SubmitError::Submission)?;

        let job_id = receipt.job_id;
        debug!("Job accepted with id {}", job_id);

        Ok(JobHandle::new(client, job_id, false))
    });

    PendingJob { task }
}

/// A job submission that is in flight
///
/// Resolves to a [`JobHandle`] once the cluster acknowledges the job, or to
/// the submission error. Dropping a pending job detaches from the
/// submission; it does not abort it.
pub struct PendingJob {
    task: JoinHandle<Result<JobHandle>>,
}

impl Future for PendingJob {
    type Output = Result<JobHandle>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        match Pin::new(&mut this.task).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => Poll::Ready(Err(SubmitError::Internal(format!(
                "submission task failed: {}",
                e
            )))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Caller-facing handle to a submitted job
///
/// Pairs the live client with the identifier the cluster assigned. The
/// handle is constructed once the submission is acknowledged and never
/// mutated; the job itself may still be queued or running.
pub struct JobHandle {
    client: Arc<dyn ClusterClient>,
    job_id: Uuid,
    detached: bool,
}

impl JobHandle {
    pub(crate) fn new(client: Arc<dyn ClusterClient>, job_id: Uuid, detached: bool) -> Self {
        Self {
            client,
            job_id,
            detached,
        }
    }

    /// Identifier the cluster assigned to this job
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Whether this process merely observes the job instead of owning its
    /// lifecycle
    pub fn detached(&self) -> bool {
        self.detached
    }

    /// Fetches the job's current status from the cluster
    pub async fn status(&self) -> std::result::Result<JobStatus, TransportError> {
        let details = self.client.job_details(self.job_id).await?;
        Ok(details.status)
    }

    /// Requests cancellation of the job
    pub async fn cancel(&self) -> std::result::Result<(), TransportError> {
        self.client.cancel(self.job_id).await
    }
}

impl fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("job_id", &self.job_id)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}
