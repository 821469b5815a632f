//! Session-cluster executor
//!
//! End-to-end orchestration of one submission: compile the plan, resolve the
//! target cluster, retrieve a live client through a short-lived connection
//! scope, dispatch the submission, and hand back the pending job. The scope
//! is released as soon as the call is in flight; it never waits for the
//! cluster's acknowledgment.

use std::sync::Arc;

use gantry_core::config::Configuration;
use gantry_core::domain::plan::ExecutionPlan;
use tracing::{debug, info, warn};

use crate::cluster::{ClusterProvider, ConnectionScope};
use crate::compiler::{PlanCompiler, StandardPlanCompiler};
use crate::error::{Result, SubmitError};
use crate::submit::{PendingJob, dispatch};

/// Submits execution plans to an already-running cluster
///
/// One executor serves many submissions; every call acquires and releases
/// its own connection scope. The cluster type is fixed by the provider.
pub struct SessionExecutor<P: ClusterProvider> {
    provider: P,
    compiler: Arc<dyn PlanCompiler>,
}

impl<P: ClusterProvider> SessionExecutor<P> {
    /// Creates an executor with the standard plan compiler
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            compiler: Arc::new(StandardPlanCompiler::new()),
        }
    }

    /// Creates an executor with a custom plan compiler
    pub fn with_compiler(provider: P, compiler: Arc<dyn PlanCompiler>) -> Self {
        Self { provider, compiler }
    }

    /// Submits `plan` to the cluster designated by `config`
    ///
    /// Returns as soon as the submission call is in flight; the returned
    /// [`PendingJob`] resolves to a job handle once the cluster acknowledges
    /// the job. Compilation, resolution, and client-retrieval failures are
    /// returned synchronously; a submission failure fails the pending job
    /// instead. Never blocks on cluster-side completion.
    pub async fn execute(
        &self,
        plan: &ExecutionPlan,
        config: &Configuration,
    ) -> Result<PendingJob> {
        let spec = self.compiler.compile(plan, config)?;
        debug!("Compiled plan '{}' for submission", plan.name);

        // The id must resolve before any scope resources are allocated.
        let cluster_id = self.provider.cluster_id(config).ok_or_else(|| {
            SubmitError::MissingClusterId(
                "configuration does not name an existing cluster".to_string(),
            )
        })?;

        let scope = self.provider.create_scope(config)?;

        let client = match scope.retrieve_client(&cluster_id).await {
            Ok(client) => client,
            Err(source) => {
                if source.is_not_found() {
                    warn!(
                        "Cluster '{}' is not known to the management endpoint",
                        cluster_id
                    );
                }
                return Err(SubmitError::ClusterUnavailable {
                    cluster: cluster_id.to_string(),
                    source,
                });
            }
        };

        let pending = dispatch(client, spec);

        // The submission is in flight; the management channel must not
        // outlive this call.
        drop(scope);

        info!("Submitted plan '{}' to cluster '{}'", plan.name, cluster_id);
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterClient;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use gantry_core::config::keys;
    use gantry_core::domain::job::JobStatus;
    use gantry_core::domain::plan::PlanNode;
    use gantry_core::dto::job::{JobDetails, JobSpec, SubmissionReceipt};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Counters shared by the mock provider, scope, and client
    #[derive(Default)]
    struct Probe {
        scopes_created: AtomicUsize,
        scopes_released: AtomicUsize,
        submits: AtomicUsize,
        detail_queries: AtomicUsize,
        submitted_to: Mutex<Option<String>>,
    }

    struct MockProvider {
        probe: Arc<Probe>,
        reachable: bool,
        accept_jobs: bool,
        job_id: Uuid,
    }

    impl MockProvider {
        fn new(probe: Arc<Probe>, job_id: Uuid) -> Self {
            Self {
                probe,
                reachable: true,
                accept_jobs: true,
                job_id,
            }
        }

        fn unreachable(mut self) -> Self {
            self.reachable = false;
            self
        }

        fn rejecting(mut self) -> Self {
            self.accept_jobs = false;
            self
        }
    }

    impl ClusterProvider for MockProvider {
        type Id = String;
        type Scope = MockScope;

        fn cluster_id(&self, config: &Configuration) -> Option<String> {
            config.get(keys::CLUSTER_ID).map(str::to_string)
        }

        fn create_scope(&self, _config: &Configuration) -> Result<MockScope> {
            self.probe.scopes_created.fetch_add(1, Ordering::SeqCst);
            Ok(MockScope {
                probe: Arc::clone(&self.probe),
                reachable: self.reachable,
                accept_jobs: self.accept_jobs,
                job_id: self.job_id,
            })
        }
    }

    struct MockScope {
        probe: Arc<Probe>,
        reachable: bool,
        accept_jobs: bool,
        job_id: Uuid,
    }

    #[async_trait]
    impl ConnectionScope for MockScope {
        type Id = String;

        async fn retrieve_client(
            &self,
            id: &String,
        ) -> std::result::Result<Arc<dyn ClusterClient>, TransportError> {
            if !self.reachable {
                return Err(TransportError::api(404, format!("cluster {} not found", id)));
            }

            Ok(Arc::new(MockClient {
                probe: Arc::clone(&self.probe),
                cluster: id.clone(),
                accept_jobs: self.accept_jobs,
                job_id: self.job_id,
            }))
        }
    }

    impl Drop for MockScope {
        fn drop(&mut self) {
            self.probe.scopes_released.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct MockClient {
        probe: Arc<Probe>,
        cluster: String,
        accept_jobs: bool,
        job_id: Uuid,
    }

    #[async_trait]
    impl ClusterClient for MockClient {
        async fn submit(
            &self,
            _spec: JobSpec,
        ) -> std::result::Result<SubmissionReceipt, TransportError> {
            self.probe.submits.fetch_add(1, Ordering::SeqCst);
            *self.probe.submitted_to.lock().unwrap() = Some(self.cluster.clone());

            if !self.accept_jobs {
                return Err(TransportError::api(503, "dispatcher overloaded"));
            }

            Ok(SubmissionReceipt {
                job_id: self.job_id,
                accepted_at: chrono::Utc::now(),
            })
        }

        async fn job_details(
            &self,
            job_id: Uuid,
        ) -> std::result::Result<JobDetails, TransportError> {
            self.probe.detail_queries.fetch_add(1, Ordering::SeqCst);
            Ok(JobDetails {
                id: job_id,
                status: JobStatus::Running,
                submitted_at: chrono::Utc::now(),
                finished_at: None,
                outcome: None,
            })
        }

        async fn cancel(&self, _job_id: Uuid) -> std::result::Result<(), TransportError> {
            Ok(())
        }
    }

    fn plan() -> ExecutionPlan {
        ExecutionPlan::new("wordcount")
            .with_node(PlanNode::new("source", "read"))
            .with_node(PlanNode::new("count", "aggregate"))
            .with_edge("source", "count")
    }

    fn config_for(cluster: &str) -> Configuration {
        Configuration::builder().set(keys::CLUSTER_ID, cluster).build()
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let probe = Arc::new(Probe::default());
        let job_id = Uuid::new_v4();
        let executor = SessionExecutor::new(MockProvider::new(Arc::clone(&probe), job_id));

        let pending = executor.execute(&plan(), &config_for("c1")).await.unwrap();

        // The scope is gone before the pending job is even polled.
        assert_eq!(probe.scopes_created.load(Ordering::SeqCst), 1);
        assert_eq!(probe.scopes_released.load(Ordering::SeqCst), 1);

        let handle = pending.await.unwrap();
        assert_eq!(handle.job_id(), job_id);
        assert!(!handle.detached());
        assert_eq!(probe.submits.load(Ordering::SeqCst), 1);
        assert_eq!(
            probe.submitted_to.lock().unwrap().as_deref(),
            Some("c1")
        );

        // The handle shares the client that performed the submission.
        assert_eq!(handle.status().await.unwrap(), JobStatus::Running);
        assert_eq!(probe.detail_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_cluster_id_fails_before_any_scope() {
        let probe = Arc::new(Probe::default());
        let executor = SessionExecutor::new(MockProvider::new(Arc::clone(&probe), Uuid::new_v4()));

        let result = executor.execute(&plan(), &Configuration::default()).await;

        assert!(matches!(result, Err(SubmitError::MissingClusterId(_))));
        assert_eq!(probe.scopes_created.load(Ordering::SeqCst), 0);
        assert_eq!(probe.scopes_released.load(Ordering::SeqCst), 0);
        assert_eq!(probe.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreachable_cluster_releases_scope() {
        let probe = Arc::new(Probe::default());
        let executor = SessionExecutor::new(
            MockProvider::new(Arc::clone(&probe), Uuid::new_v4()).unreachable(),
        );

        let result = executor.execute(&plan(), &config_for("c2")).await;

        match result {
            Err(SubmitError::ClusterUnavailable { cluster, source }) => {
                assert_eq!(cluster, "c2");
                assert!(source.is_not_found());
            }
            other => panic!("expected ClusterUnavailable, got {:?}", other.map(|_| ())),
        }

        assert_eq!(probe.scopes_created.load(Ordering::SeqCst), 1);
        assert_eq!(probe.scopes_released.load(Ordering::SeqCst), 1);
        assert_eq!(probe.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submission_failure_fails_pending_job() {
        let probe = Arc::new(Probe::default());
        let executor = SessionExecutor::new(
            MockProvider::new(Arc::clone(&probe), Uuid::new_v4()).rejecting(),
        );

        let pending = executor.execute(&plan(), &config_for("c1")).await.unwrap();

        // Dispatch succeeded, so the scope is already released.
        assert_eq!(probe.scopes_released.load(Ordering::SeqCst), 1);

        let result = pending.await;
        assert!(matches!(
            result,
            Err(SubmitError::Submission(TransportError::Api { status: 503, .. }))
        ));
        assert_eq!(probe.submits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_compilation_failure_stops_before_resolution() {
        let probe = Arc::new(Probe::default());
        let executor = SessionExecutor::new(MockProvider::new(Arc::clone(&probe), Uuid::new_v4()));

        let result = executor
            .execute(&ExecutionPlan::new("empty"), &config_for("c1"))
            .await;

        assert!(matches!(result, Err(SubmitError::Compilation(_))));
        assert_eq!(probe.scopes_created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retry_after_failure_is_a_fresh_attempt() {
        let probe = Arc::new(Probe::default());
        let executor = SessionExecutor::new(
            MockProvider::new(Arc::clone(&probe), Uuid::new_v4()).rejecting(),
        );
        let config = config_for("c1");

        let first = executor.execute(&plan(), &config).await.unwrap().await;
        let second = executor.execute(&plan(), &config).await.unwrap().await;

        assert!(first.is_err());
        assert!(second.is_err());

        // Each attempt acquires its own scope and issues its own call.
        assert_eq!(probe.scopes_created.load(Ordering::SeqCst), 2);
        assert_eq!(probe.scopes_released.load(Ordering::SeqCst), 2);
        assert_eq!(probe.submits.load(Ordering::SeqCst), 2);
    }
}
