//! Constraint graph construction, solving, and validation

use super::constraint::Constraint;
use super::term::{AtomicTerm, Term};
use crate::algebra::{Bounds, Congruence, HeytingAlgebra, Lattice, StructuralOrder};
use crate::dataflow::{DataFlowEdge, FixpointSolver, FlowEdge};
use indexmap::IndexMap;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::io;
use tracing::{debug, warn};

/// A set of flows-to constraints over one graph.
///
/// The graph has one node per distinct atomic term. Each reduced constraint
/// `from ≤ edge(to)` adds an edge from `to` to `from`. The greatest solution
/// is computed on first use and cached.
pub struct ConstraintSystem<C, V, T, O = StructuralOrder> {
    constraints: Vec<Constraint<C, V, T>>,
    graph: DiGraph<AtomicTerm<C, V>, FlowEdge<C>>,
    nodes: HashMap<AtomicTerm<C, V>, NodeIndex>,
    bounds: Bounds<C>,
    order: O,
    values: OnceCell<Vec<C>>,
}

impl<C, V, T, O> ConstraintSystem<C, V, T, O>
where
    C: HeytingAlgebra + Clone + Eq + Hash,
    V: Clone + Eq + Hash,
    O: Congruence<C>,
{
    /// Build the constraint graph. `order` decides whether the computed
    /// solution satisfies each original constraint.
    pub fn new(constraints: impl IntoIterator<Item = Constraint<C, V, T>>, bounds: Bounds<C>, order: O) -> Self {
        let constraints: Vec<_> = constraints.into_iter().collect();
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for constraint in &constraints {
            for reduced in constraint.reduced() {
                let from = Self::add_node(&mut graph, &mut nodes, &reduced.from);
                let to = Self::add_node(&mut graph, &mut nodes, &reduced.to);
                graph.add_edge(to, from, reduced.edge.clone());
            }
        }

        debug!(
            constraints = constraints.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "constraint graph built"
        );

        Self {
            constraints,
            graph,
            nodes,
            bounds,
            order,
            values: OnceCell::new(),
        }
    }

    fn add_node(
        graph: &mut DiGraph<AtomicTerm<C, V>, FlowEdge<C>>,
        nodes: &mut HashMap<AtomicTerm<C, V>, NodeIndex>,
        term: &AtomicTerm<C, V>,
    ) -> NodeIndex {
        *nodes
            .entry(term.clone())
            .or_insert_with(|| graph.add_node(term.clone()))
    }

    pub fn constraints(&self) -> &[Constraint<C, V, T>] {
        &self.constraints
    }

    pub fn bounds(&self) -> &Bounds<C> {
        &self.bounds
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Graph node for an atomic term, if any constraint mentions it
    pub fn node(&self, term: &AtomicTerm<C, V>) -> Option<NodeIndex> {
        self.nodes.get(term).copied()
    }

    fn values(&self) -> &[C] {
        self.values
            .get_or_init(|| FixpointSolver::solve(&self.bounds.top, &self.graph).values)
    }

    /// The greatest assignment satisfying every reduced constraint, before
    /// validation against the original constraints
    pub fn candidate_solution(&self) -> ConstraintSolution<C, V> {
        let values = self.values();
        let values = self
            .graph
            .node_indices()
            .filter_map(|node| match &self.graph[node] {
                AtomicTerm::Variable(variable) => Some((variable.clone(), values[node.index()].clone())),
                AtomicTerm::Constant(_) => None,
            })
            .collect();
        ConstraintSolution {
            values,
            top: self.bounds.top.clone(),
        }
    }

    /// The greatest solution, or the error of the first constraint it violates
    pub fn solution(&self) -> Result<ConstraintSolution<C, V>, T> {
        let solution = self.candidate_solution();
        let first = self.find_violations(&solution).next();
        match first {
            Some(error) => Err(error),
            None => Ok(solution),
        }
    }

    /// Errors for every constraint the greatest solution violates, in input order
    pub fn violations(&self) -> Vec<T> {
        let solution = self.candidate_solution();
        self.find_violations(&solution).collect()
    }

    fn find_violations<'a>(&'a self, solution: &'a ConstraintSolution<C, V>) -> impl Iterator<Item = T> + 'a {
        self.constraints
            .iter()
            .enumerate()
            .filter_map(move |(index, constraint)| {
                let from = solution.evaluate(constraint.from());
                let to = solution.evaluate(constraint.to());
                if self.order.less_than_or_equal_to(&from, &to) {
                    None
                } else {
                    warn!(constraint = index, "constraint violated by greatest solution");
                    Some(constraint.fail(from, to))
                }
            })
    }

    /// Whether the edge's constraint fails under the candidate solution
    fn is_violated(&self, source: NodeIndex, edge: &FlowEdge<C>, target: NodeIndex) -> bool {
        let values = self.values();
        let bound = edge.propagate(&values[source.index()]);
        !self.order.less_than_or_equal_to(&values[target.index()], &bound)
    }
}

impl<C, V, T, O> ConstraintSystem<C, V, T, O>
where
    C: HeytingAlgebra + Clone + Eq + Hash + fmt::Display,
    V: Clone + Eq + Hash + fmt::Display,
    O: Congruence<C>,
{
    /// Write the constraint graph in Graphviz DOT format.
    ///
    /// Variables are labelled with their candidate value. Constants are
    /// filled gray. Edges violated by the candidate solution are red, other
    /// non-identity edges blue.
    pub fn export_dot_graph<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        let values = self.values();
        let edge_attributes = |edge: EdgeReference<'_, FlowEdge<C>>| {
            let color = if self.is_violated(edge.source(), edge.weight(), edge.target()) {
                "red"
            } else if edge.weight().is_identity() {
                "black"
            } else {
                "blue"
            };
            format!("label = \"{}\", color = {color} ", escape(&edge.weight().to_string()))
        };
        let node_attributes = |node: NodeIndex, term: &AtomicTerm<C, V>| match term {
            AtomicTerm::Variable(variable) => format!(
                "label = \"{}\\n{}\" ",
                escape(&variable.to_string()),
                escape(&values[node.index()].to_string())
            ),
            AtomicTerm::Constant(value) => {
                format!("label = \"{}\", color = gray, style = filled ", escape(&value.to_string()))
            }
        };

        write!(
            writer,
            "{}",
            Dot::with_attr_getters(
                &self.graph,
                &[Config::NodeNoLabel, Config::EdgeNoLabel],
                &|_, edge| edge_attributes(edge),
                &|_, (node, term)| node_attributes(node, term),
            )
        )?;
        Ok(())
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<C: fmt::Debug, V: fmt::Debug, T, O> fmt::Debug for ConstraintSystem<C, V, T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSystem")
            .field("constraints", &self.constraints)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// Solved values for the variables of a [`ConstraintSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSolution<C, V: Hash + Eq> {
    values: IndexMap<V, C>,
    top: C,
}

impl<C, V: Hash + Eq> ConstraintSolution<C, V> {
    /// Value of a variable; variables no constraint mentions are `top`
    pub fn get(&self, variable: &V) -> &C {
        self.values.get(variable).unwrap_or(&self.top)
    }

    /// Solved variables in graph order
    pub fn iter(&self) -> impl Iterator<Item = (&V, &C)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Evaluate a term under this solution
    pub fn evaluate(&self, term: &Term<C, V>) -> C
    where
        C: Lattice + Clone,
    {
        match term {
            Term::Constant(value) => value.clone(),
            Term::Variable(variable) => self.get(variable).clone(),
            Term::Join(lhs, rhs) => self.evaluate(lhs).join(&self.evaluate(rhs)),
            Term::Meet(lhs, rhs) => self.evaluate(lhs).meet(&self.evaluate(rhs)),
        }
    }
}
