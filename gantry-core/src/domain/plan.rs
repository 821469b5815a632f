//! Execution plan domain types

use serde::{Deserialize, Serialize};

/// A dataflow graph describing one workload
///
/// Plans are produced and owned by the caller and treated as immutable here;
/// the submission path only reads them to compile a job spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub name: String,
    pub nodes: Vec<PlanNode>,
    pub edges: Vec<PlanEdge>,
}

impl ExecutionPlan {
    /// Creates an empty plan with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Appends a node to the graph
    pub fn with_node(mut self, node: PlanNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Appends a directed edge between two node ids
    pub fn with_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(PlanEdge {
            source: source.into(),
            target: target.into(),
        });
        self
    }
}

/// A single operator in the dataflow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanNode {
    pub id: String,
    pub operator: String,
    /// Overrides the configured default parallelism when set
    pub parallelism: Option<u32>,
}

impl PlanNode {
    /// Creates a node that inherits the configured default parallelism
    pub fn new(id: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operator: operator.into(),
            parallelism: None,
        }
    }

    /// Sets an explicit parallelism for this node
    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = Some(parallelism);
        self
    }
}

/// Directed edge between two operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEdge {
    pub source: String,
    pub target: String,
}
