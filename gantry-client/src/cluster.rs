//! Cluster provider boundary
//!
//! The pluggable seam between the submission path and a concrete cluster
//! type. A provider derives two independent things from one configuration:
//! the identifier of the target cluster, and a connection scope able to
//! retrieve a live client bound to that identifier.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use gantry_core::config::Configuration;
use gantry_core::dto::job::{JobDetails, JobSpec, SubmissionReceipt};
use uuid::Uuid;

use crate::error::{Result, TransportError};

/// A cluster-type plugin
///
/// Implementations know how to locate already-running clusters of one kind.
/// Both derivations read the same configuration instance; the executor
/// requires the identifier to resolve before any scope is created.
pub trait ClusterProvider: Send + Sync {
    /// Opaque identifier naming one cluster of this type
    type Id: fmt::Display + Clone + Send + Sync;

    /// Scope type granting access to this cluster type's management plane
    type Scope: ConnectionScope<Id = Self::Id>;

    /// Derives the target cluster's identifier from the configuration
    ///
    /// `None` means the configuration does not designate an existing
    /// cluster; the executor treats that as a fatal precondition failure,
    /// not something to retry.
    fn cluster_id(&self, config: &Configuration) -> Option<Self::Id>;

    /// Allocates a connection scope for the management plane
    ///
    /// Only local resources are set up here; no remote calls happen until
    /// [`ConnectionScope::retrieve_client`].
    fn create_scope(&self, config: &Configuration) -> Result<Self::Scope>;
}

/// Short-lived, exclusively-owned access to a cluster's management plane
///
/// A scope lives for one submission: created after the cluster id resolves,
/// used to retrieve the live client, and dropped as soon as the submission
/// call is in flight. Dropping the scope releases its resources on every
/// exit path. The retrieved client carries its own resources and outlives
/// the scope.
#[async_trait]
pub trait ConnectionScope: Send {
    /// Identifier type accepted by this scope
    type Id: Send + Sync;

    /// Performs the management-plane handshake and binds a live client
    ///
    /// Fails when the identified cluster cannot be found or contacted; the
    /// executor surfaces that to its caller as a cluster-unavailable error.
    async fn retrieve_client(
        &self,
        id: &Self::Id,
    ) -> std::result::Result<Arc<dyn ClusterClient>, TransportError>;
}

/// A client bound to one running cluster
///
/// Shared behind [`Arc`] between the caller and the submission task, so
/// implementations must tolerate concurrent use from both.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Submits a compiled job spec, returning the cluster's acknowledgment
    async fn submit(
        &self,
        spec: JobSpec,
    ) -> std::result::Result<SubmissionReceipt, TransportError>;

    /// Fetches the current record for a submitted job
    async fn job_details(
        &self,
        job_id: Uuid,
    ) -> std::result::Result<JobDetails, TransportError>;

    /// Requests cancellation of a submitted job
    async fn cancel(&self, job_id: Uuid) -> std::result::Result<(), TransportError>;
}
