//! Label inference tests
//!
//! End-to-end tests that build label-level flows-to constraints, solve them,
//! and check the inferred labels or the reported failure.

use labelflow_core::prelude::*;

type Principal = FreeDistributiveLattice<String>;
type Label = SecurityLattice<Principal>;
type Variable = &'static str;

#[derive(Debug, Clone, PartialEq)]
struct IllegalFlowError {
    from: Label,
    to: Label,
}

impl std::fmt::Display for IllegalFlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "label {} does not flow to {}", self.from, self.to)
    }
}

type FlowConstraint = labelflow_core::security::LabelConstraint<Principal, Variable, IllegalFlowError>;

/// Shorthand for a principal
fn p(name: &str) -> Principal {
    FreeDistributiveLattice::new(name.to_string())
}

/// Shorthand for a uniform constant label
fn c(name: &str) -> Label {
    SecurityLattice::uniform(p(name))
}

fn bounds() -> Bounds<Principal> {
    Principal::bounds()
}

fn tc(label: &Label) -> LabelTerm<Principal, Variable> {
    constant_term(label)
}

fn tv(variable: Variable) -> LabelTerm<Principal, Variable> {
    variable_term(variable)
}

fn flows(from: LabelTerm<Principal, Variable>, to: LabelTerm<Principal, Variable>) -> Vec<FlowConstraint> {
    flows_to(&from, &to, &bounds(), |from, to| IllegalFlowError { from, to }).expect("well-formed terms")
}

fn system(
    constraints: Vec<Vec<FlowConstraint>>,
    assumptions: Vec<LessThanOrEqualTo<String>>,
) -> ConstraintSystem<Principal, ComponentVariable<Variable>, IllegalFlowError, FreeDistributiveLatticeCongruence<String>>
{
    ConstraintSystem::new(
        constraints.into_iter().flatten(),
        bounds(),
        FreeDistributiveLatticeCongruence::new(assumptions),
    )
}

fn solve(constraints: Vec<Vec<FlowConstraint>>) -> Result<LabelSolution<Principal, Variable>, IllegalFlowError> {
    system(constraints, Vec::new()).label_solution()
}

// ============================================================================
// Inference
// ============================================================================

#[test]
fn test_constant_flows_to_constant() {
    assert!(solve(vec![flows(tc(&c("A")), tc(&c("A")))]).is_ok());
}

#[test]
fn test_constant_not_flows_to_constant() {
    let err = solve(vec![flows(tc(&c("A")), tc(&c("B")))]).unwrap_err();

    // Confidentiality is checked first and fails first
    assert_eq!(err.from, c("A").confidentiality(&bounds()));
    assert_eq!(err.to, c("B").confidentiality(&bounds()));
}

#[test]
fn test_constant_flows_to_variable() {
    let solution = solve(vec![flows(tc(&c("A")), tv("x"))]).unwrap();
    assert_eq!(solution.get(&"x"), c("A").confidentiality(&bounds()));
}

#[test]
fn test_variable_flows_to_constant() {
    let solution = solve(vec![flows(tv("x"), tc(&c("A")))]).unwrap();
    assert_eq!(solution.get(&"x"), c("A").integrity(&bounds()));
}

#[test]
fn test_variable_not_flows_to_constant() {
    let err = solve(vec![flows(tc(&c("A")), tv("x")), flows(tv("x"), tc(&c("B")))]).unwrap_err();

    // x is solved to A-> ∧ B<-, so the integrity half of A → x fails first
    assert_eq!(
        err.to_string(),
        format!(
            "label {} does not flow to {}",
            c("A").integrity(&bounds()),
            c("B").integrity(&bounds())
        )
    );
}

#[test]
fn test_variable_flows_to_self() {
    let solution = solve(vec![flows(tv("x"), tv("x"))]).unwrap();
    assert_eq!(solution.get(&"x"), SecurityBounds::new(&bounds()).weakest);
}

#[test]
fn test_variable_flows_to_variable() {
    let solution = solve(vec![
        flows(tv("x"), tc(&c("A"))),
        flows(tv("x"), tv("y")),
        flows(tv("y"), tc(&c("B"))),
    ])
    .unwrap();

    assert_eq!(solution.get(&"x"), c("A").meet(&c("B")).integrity(&bounds()));
    assert_eq!(solution.get(&"y"), c("B").integrity(&bounds()));
}

#[test]
fn test_integrity_constraint_leaves_confidentiality_weakest() {
    let only_integrity = integrity_flows_to(&tv("x"), &tc(&c("A")), &bounds(), |from, to| IllegalFlowError {
        from,
        to,
    })
    .unwrap();
    let solution = solve(vec![only_integrity]).unwrap();

    let label = solution.get(&"x");
    assert_eq!(*label.confidentiality_component(), Principal::top());
    assert_eq!(*label.integrity_component(), p("A"));
}

#[test]
fn test_confidentiality_constraint_leaves_integrity_weakest() {
    let only_confidentiality =
        confidentiality_flows_to(&tc(&c("A")), &tv("x"), &bounds(), |from, to| IllegalFlowError { from, to })
            .unwrap();
    let solution = solve(vec![only_confidentiality]).unwrap();

    assert_eq!(solution.get(&"x"), c("A").confidentiality(&bounds()));
}

#[test]
fn test_join_of_labels() {
    // x ⊔ y flows to A: both x and y must flow to A
    let solution = solve(vec![flows(tv("x").join(&tv("y")), tc(&c("A")))]).unwrap();

    assert_eq!(solution.get(&"x").integrity_component(), &p("A"));
    assert_eq!(solution.get(&"y").integrity_component(), &p("A"));
}

#[test]
fn test_unconstrained_variable_is_weakest() {
    let solution = solve(vec![flows(tv("x"), tc(&c("A")))]).unwrap();
    assert_eq!(solution.get(&"z"), SecurityBounds::new(&bounds()).weakest);
}

#[test]
fn test_evaluate_term() {
    let solution = solve(vec![flows(tv("x"), tc(&c("A"))), flows(tv("y"), tc(&c("B")))]).unwrap();

    let joined = solution.evaluate(&tv("x").join(&tv("y")));
    assert_eq!(joined, solution.get(&"x").join(&solution.get(&"y")));
}

// ============================================================================
// Trust delegation
// ============================================================================

#[test]
fn test_delegation_makes_flow_legal() {
    let constraints = || vec![flows(tc(&c("A")), tc(&c("B")))];

    // A and B trust each other
    let mutual = vec![
        LessThanOrEqualTo::new(p("A"), p("B")),
        LessThanOrEqualTo::new(p("B"), p("A")),
    ];
    assert!(system(constraints(), mutual).label_solution().is_ok());

    // A acts for B, but confidentiality needs B to act for A
    let one_way = vec![LessThanOrEqualTo::new(p("A"), p("B"))];
    assert!(system(constraints(), one_way).label_solution().is_err());
}

#[test]
fn test_delegation_through_variable() {
    // A → x → B is legal once A and B are equivalent
    let assumptions = vec![
        LessThanOrEqualTo::new(p("A"), p("B")),
        LessThanOrEqualTo::new(p("B"), p("A")),
    ];
    let system = system(
        vec![flows(tc(&c("A")), tv("x")), flows(tv("x"), tc(&c("B")))],
        assumptions,
    );

    assert!(system.label_solution().is_ok());
    assert!(system.violations().is_empty());
}

#[test]
fn test_all_violations() {
    let system = system(
        vec![flows(tc(&c("A")), tc(&c("B"))), flows(tc(&c("C")), tc(&c("D")))],
        Vec::new(),
    );

    // Each label flow contributes a confidentiality and an integrity failure
    assert_eq!(system.violations().len(), 4);
}

// ============================================================================
// Graph export
// ============================================================================

fn dot_graph(constraints: Vec<Vec<FlowConstraint>>) -> String {
    let mut out = Vec::new();
    system(constraints, Vec::new())
        .export_dot_graph(&mut out)
        .expect("writing to memory");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn test_dot_solvable_system() {
    let dot = dot_graph(vec![
        flows(tv("x"), tc(&c("A"))),
        flows(tv("y"), tv("x").join(&tc(&c("B")))),
        flows(tc(&c("A")).meet(&tv("z")), tc(&c("A"))),
    ]);

    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("x←"));
    assert!(dot.contains("x→"));
    assert!(!dot.contains("color = red"));
}

#[test]
fn test_dot_unsolvable_system() {
    let dot = dot_graph(vec![flows(tc(&c("A")), tv("x")), flows(tv("x"), tc(&c("B")))]);
    assert!(dot.contains("color = red"));
}
