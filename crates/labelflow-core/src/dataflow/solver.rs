//! Worklist-based greatest-fixpoint solver
//!
//! Given a directed graph whose nodes carry transfer functions and whose edges
//! carry propagate functions, computes the greatest assignment satisfying
//!
//! `value(n) = n.transfer(⋀ { e.propagate(value(source(e))) | e into n })`
//!
//! The graph is split into strongly connected components, which are solved one
//! at a time in topological order. A component's inputs from earlier
//! components are final by the time it is visited, so only edges inside the
//! component need iteration.

use crate::algebra::MeetSemiLattice;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// A node of a data flow graph
pub trait DataFlowNode<A> {
    /// Compute the value of the node from the meet of its incoming edges
    fn transfer(&self, input: &A) -> A;
}

/// An edge of a data flow graph
pub trait DataFlowEdge<A> {
    /// Map the value of the source node to a bound on the target node
    fn propagate(&self, input: &A) -> A;
}

/// Result of fixpoint computation
#[derive(Debug, Clone)]
pub struct FixpointResult<A> {
    /// Value of each node, indexed by [`NodeIndex::index`]
    pub values: Vec<A>,
    /// Number of strongly connected components visited
    pub components: usize,
    /// Number of node updates performed
    pub iterations: usize,
}

impl<A> FixpointResult<A> {
    pub fn value(&self, node: NodeIndex) -> &A {
        &self.values[node.index()]
    }
}

/// Greatest-fixpoint solver over strongly connected components
pub struct FixpointSolver;

impl FixpointSolver {
    /// Compute the greatest solution for every node of `graph`.
    ///
    /// `top` must be the greatest element of `A`. Termination relies on every
    /// transfer and propagate function being monotone over a lattice of finite
    /// height; no iteration bound is imposed.
    pub fn solve<A, N, E>(top: &A, graph: &DiGraph<N, E>) -> FixpointResult<A>
    where
        A: MeetSemiLattice + Clone + PartialEq,
        N: DataFlowNode<A>,
        E: DataFlowEdge<A>,
    {
        // Initialize every node as if it had no incoming edges
        let mut values: Vec<A> = graph
            .node_indices()
            .map(|node| graph[node].transfer(top))
            .collect();

        // Tarjan yields components in reverse topological order
        let components = tarjan_scc(graph);
        let mut component_of = vec![0; graph.node_count()];
        for (component, members) in components.iter().enumerate() {
            for node in members {
                component_of[node.index()] = component;
            }
        }

        let mut iterations = 0;
        for (component, members) in components.iter().enumerate().rev() {
            iterations += Self::solve_component(top, graph, component, members, &component_of, &mut values);
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            components = components.len(),
            iterations,
            "data flow fixpoint reached"
        );

        FixpointResult {
            values,
            components: components.len(),
            iterations,
        }
    }

    /// Solve one component, assuming every component with edges into it is
    /// already solved. Returns the number of node updates.
    fn solve_component<A, N, E>(
        top: &A,
        graph: &DiGraph<N, E>,
        component: usize,
        members: &[NodeIndex],
        component_of: &[usize],
        values: &mut [A],
    ) -> usize
    where
        A: MeetSemiLattice + Clone + PartialEq,
        N: DataFlowNode<A>,
        E: DataFlowEdge<A>,
    {
        let mut worklist: VecDeque<NodeIndex> = members.iter().copied().collect();
        let mut in_worklist: HashSet<NodeIndex> = worklist.iter().copied().collect();
        let mut iterations = 0;

        while let Some(node) = worklist.pop_front() {
            in_worklist.remove(&node);
            iterations += 1;

            // Incoming edges come from the whole graph, not just this component
            let in_value = graph
                .edges_directed(node, Direction::Incoming)
                .fold(top.clone(), |acc, edge| {
                    acc.meet(&edge.weight().propagate(&values[edge.source().index()]))
                });

            let out_value = graph[node].transfer(&in_value);
            if out_value == values[node.index()] {
                continue;
            }

            trace!(node = node.index(), component, "node value lowered");
            values[node.index()] = out_value;

            // Successors outside the component are solved later
            for successor in graph.neighbors_directed(node, Direction::Outgoing) {
                if component_of[successor.index()] == component && in_worklist.insert(successor) {
                    worklist.push_back(successor);
                }
            }
        }

        iterations
    }
}

/// Run data flow analysis on `graph` and return the value of each node
pub fn solve_data_flow<A, N, E>(top: &A, graph: &DiGraph<N, E>) -> Vec<A>
where
    A: MeetSemiLattice + Clone + PartialEq,
    N: DataFlowNode<A>,
    E: DataFlowEdge<A>,
{
    FixpointSolver::solve(top, graph).values
}
