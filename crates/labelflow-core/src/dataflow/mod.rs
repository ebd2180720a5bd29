//! Greatest-fixpoint data flow over constraint graphs
//!
//! This module implements a label-agnostic data flow framework with:
//! - Node transfer and edge propagate functions ([`DataFlowNode`], [`DataFlowEdge`])
//! - The closed family of edge functions produced by constraint reduction ([`FlowEdge`])
//! - A worklist solver that visits strongly connected components in topological order

mod edges;
mod solver;

pub use edges::{FlowEdge, LeftHandEdge, RightHandEdge};
pub use solver::{solve_data_flow, DataFlowEdge, DataFlowNode, FixpointResult, FixpointSolver};
