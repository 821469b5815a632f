//! Plan compilation
//!
//! Turns an execution plan plus configuration into the job spec a cluster
//! accepts: validates the graph and resolves each node's parallelism against
//! the configured default. Compilation is pure and runs once per submission.

use std::collections::HashSet;

use gantry_core::config::{Configuration, keys};
use gantry_core::domain::plan::ExecutionPlan;
use gantry_core::dto::job::{JobEdge, JobSpec, JobVertex};
use thiserror::Error;
use tracing::debug;

/// Errors raised while compiling an execution plan
#[derive(Debug, Error)]
pub enum CompilationError {
    /// The plan has no nodes to execute
    #[error("plan '{0}' has no nodes")]
    EmptyPlan(String),

    /// Two nodes share the same id
    #[error("plan declares node '{0}' more than once")]
    DuplicateNode(String),

    /// An edge references a node the plan does not declare
    #[error("edge {source_node} -> {target} references an undeclared node")]
    DanglingEdge { source_node: String, target: String },

    /// A node resolved to a parallelism of zero
    #[error("node '{node}' resolved to parallelism 0")]
    InvalidParallelism { node: String },
}

/// Service trait for compiling execution plans
pub trait PlanCompiler: Send + Sync {
    /// Compiles `plan` into a submission-ready job spec
    ///
    /// # Arguments
    /// * `plan` - The dataflow graph to compile
    /// * `config` - Configuration read for compile-time settings
    fn compile(
        &self,
        plan: &ExecutionPlan,
        config: &Configuration,
    ) -> Result<JobSpec, CompilationError>;
}

/// Standard implementation of [`PlanCompiler`]
#[derive(Debug, Default)]
pub struct StandardPlanCompiler;

impl StandardPlanCompiler {
    /// Creates a new standard plan compiler
    pub fn new() -> Self {
        Self
    }
}

impl PlanCompiler for StandardPlanCompiler {
    fn compile(
        &self,
        plan: &ExecutionPlan,
        config: &Configuration,
    ) -> Result<JobSpec, CompilationError> {
        if plan.nodes.is_empty() {
            return Err(CompilationError::EmptyPlan(plan.name.clone()));
        }

        let default_parallelism = config
            .get_parsed::<u32>(keys::DEFAULT_PARALLELISM)
            .unwrap_or(1);

        let mut declared = HashSet::new();
        let mut vertices = Vec::with_capacity(plan.nodes.len());

        for node in &plan.nodes {
            if !declared.insert(node.id.as_str()) {
                return Err(CompilationError::DuplicateNode(node.id.clone()));
            }

            let parallelism = node.parallelism.unwrap_or(default_parallelism);
            if parallelism == 0 {
                return Err(CompilationError::InvalidParallelism {
                    node: node.id.clone(),
                });
            }

            vertices.push(JobVertex {
                id: node.id.clone(),
                operator: node.operator.clone(),
                parallelism,
            });
        }

        let mut edges = Vec::with_capacity(plan.edges.len());
        for edge in &plan.edges {
            if !declared.contains(edge.source.as_str()) || !declared.contains(edge.target.as_str())
            {
                return Err(CompilationError::DanglingEdge {
                    source_node: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }

            edges.push(JobEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }

        debug!(
            "Compiled plan '{}' into {} vertices",
            plan.name,
            vertices.len()
        );

        Ok(JobSpec {
            name: plan.name.clone(),
            default_parallelism,
            vertices,
            edges,
        })
    }
}
