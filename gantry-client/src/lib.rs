//! Gantry submission client
//!
//! Hands compiled execution plans to an already-running processing cluster
//! and returns a non-blocking handle to the resulting job.
//!
//! This crate owns the submission protocol only: resolving the target
//! cluster from configuration, scoping the management connection, issuing
//! the submission call, and adapting the acknowledgment into a [`JobHandle`].
//! Provisioning and tearing down clusters is out of scope, as is anything
//! the cluster does with the job afterwards.
//!
//! # Example
//!
//! ```no_run
//! use gantry_client::{RestClusterProvider, SessionExecutor};
//! use gantry_core::config::{Configuration, keys};
//! use gantry_core::domain::plan::{ExecutionPlan, PlanNode};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Configuration::builder()
//!         .set(keys::CLUSTER_ENDPOINT, "http://localhost:8080")
//!         .set(keys::CLUSTER_ID, "analytics-1")
//!         .build();
//!
//!     let plan = ExecutionPlan::new("wordcount")
//!         .with_node(PlanNode::new("source", "read"))
//!         .with_node(PlanNode::new("count", "aggregate"))
//!         .with_edge("source", "count");
//!
//!     let executor = SessionExecutor::new(RestClusterProvider::new());
//!
//!     // Returns once the submission is in flight, not once it completes.
//!     let pending = executor.execute(&plan, &config).await?;
//!     let handle = pending.await?;
//!
//!     println!("Submitted job {}", handle.job_id());
//!     Ok(())
//! }
//! ```

pub mod cluster;
pub mod compiler;
pub mod error;
pub mod executor;
pub mod rest;
pub mod submit;

// Re-export commonly used types
pub use cluster::{ClusterClient, ClusterProvider, ConnectionScope};
pub use compiler::{CompilationError, PlanCompiler, StandardPlanCompiler};
pub use error::{Result, SubmitError, TransportError};
pub use executor::SessionExecutor;
pub use rest::{RestClusterClient, RestClusterProvider};
pub use submit::{JobHandle, PendingJob};
