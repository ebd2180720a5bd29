//! Problem files: trust assumptions and flows-to constraints between labels
//!
//! A problem is read from JSON or TOML, picked by file extension:
//!
//! ```toml
//! [[assumptions]]
//! from = { host = "alice" }
//! to = { host = "bob" }
//!
//! [[constraints]]
//! from = { host = "alice" }
//! to = { var = "x" }
//! ```

use crate::error::CliError;
use anyhow::{Context, Result};
use labelflow_core::prelude::*;
use labelflow_core::security::LabelConstraint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub type Principal = FreeDistributiveLattice<String>;
pub type Label = SecurityLattice<Principal>;
pub type LabelSystem =
    ConstraintSystem<Principal, ComponentVariable<String>, Violation, FreeDistributiveLatticeCongruence<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Problem {
    /// Trust delegations that hold in every solution
    #[serde(default)]
    pub assumptions: Vec<Assumption>,
    #[serde(default)]
    pub constraints: Vec<FlowConstraint>,
}

/// `from` acts for `to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assumption {
    pub from: PrincipalExpr,
    pub to: PrincipalExpr,
}

/// Information labelled `from` may flow to `to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowConstraint {
    pub from: LabelExpr,
    pub to: LabelExpr,
    /// Shown alongside the violation if the flow is illegal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalExpr {
    Host(String),
    /// Trusted iff every operand is
    And(Vec<PrincipalExpr>),
    /// Trusted iff some operand is
    Or(Vec<PrincipalExpr>),
    Strongest,
    Weakest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelExpr {
    /// The label with both components set to one host
    Host(String),
    Var(String),
    Label {
        confidentiality: PrincipalExpr,
        integrity: PrincipalExpr,
    },
    Join(Vec<LabelExpr>),
    Meet(Vec<LabelExpr>),
    Top,
    Bottom,
}

impl PrincipalExpr {
    pub fn evaluate(&self) -> Principal {
        match self {
            PrincipalExpr::Host(name) => FreeDistributiveLattice::new(name.clone()),
            PrincipalExpr::And(operands) => operands
                .iter()
                .fold(Principal::top(), |acc, operand| acc.meet(&operand.evaluate())),
            PrincipalExpr::Or(operands) => operands
                .iter()
                .fold(Principal::bottom(), |acc, operand| acc.join(&operand.evaluate())),
            PrincipalExpr::Strongest => Principal::bottom(),
            PrincipalExpr::Weakest => Principal::top(),
        }
    }
}

impl LabelExpr {
    pub fn to_term(&self, bounds: &SecurityBounds<Principal>) -> LabelTerm<Principal, String> {
        match self {
            LabelExpr::Host(name) => constant_term(&SecurityLattice::uniform(FreeDistributiveLattice::new(name.clone()))),
            LabelExpr::Var(name) => variable_term(name.clone()),
            LabelExpr::Label {
                confidentiality,
                integrity,
            } => constant_term(&SecurityLattice::new(confidentiality.evaluate(), integrity.evaluate())),
            LabelExpr::Join(operands) => operands
                .iter()
                .map(|operand| operand.to_term(bounds))
                .reduce(|acc, term| acc.join(&term))
                .unwrap_or_else(|| constant_term(&bounds.bottom)),
            LabelExpr::Meet(operands) => operands
                .iter()
                .map(|operand| operand.to_term(bounds))
                .reduce(|acc, term| acc.meet(&term))
                .unwrap_or_else(|| constant_term(&bounds.top)),
            LabelExpr::Top => constant_term(&bounds.top),
            LabelExpr::Bottom => constant_term(&bounds.bottom),
        }
    }
}

/// A constraint the greatest solution cannot satisfy
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub index: usize,
    pub reason: Option<String>,
    pub from: Label,
    pub to: Label,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint {}: {} does not flow to {}", self.index, self.from, self.to)?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}

impl Problem {
    /// Read a problem file
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("failed to read problem file {}", path.display()))?;
        Self::parse(&contents, path)
    }

    /// Parse problem text in the format named by `path`'s extension
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => serde_json::from_str(contents)
                .with_context(|| format!("failed to parse JSON problem {}", path.display())),
            Some("toml") => {
                toml::from_str(contents).with_context(|| format!("failed to parse TOML problem {}", path.display()))
            }
            _ => Err(CliError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
            .into()),
        }
    }

    pub fn congruence(&self) -> FreeDistributiveLatticeCongruence<String> {
        FreeDistributiveLatticeCongruence::new(
            self.assumptions
                .iter()
                .map(|assumption| LessThanOrEqualTo::new(assumption.from.evaluate(), assumption.to.evaluate()))
                .collect(),
        )
    }

    /// Reduce every constraint to component constraints
    pub fn label_constraints(&self) -> Result<Vec<LabelConstraint<Principal, String, Violation>>, CliError> {
        let bounds = Principal::bounds();
        let security = SecurityBounds::new(&bounds);
        let mut constraints = Vec::with_capacity(self.constraints.len() * 2);

        for (index, constraint) in self.constraints.iter().enumerate() {
            let from = constraint.from.to_term(&security);
            let to = constraint.to.to_term(&security);
            let reason = constraint.reason.clone();
            let reduced = flows_to(&from, &to, &bounds, move |from, to| Violation {
                index,
                reason: reason.clone(),
                from,
                to,
            })
            .map_err(|source| CliError::IllegalConstraint { index, source })?;
            constraints.extend(reduced);
        }
        Ok(constraints)
    }

    pub fn system(&self) -> Result<LabelSystem, CliError> {
        Ok(ConstraintSystem::new(
            self.label_constraints()?,
            Principal::bounds(),
            self.congruence(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(name: &str) -> PrincipalExpr {
        PrincipalExpr::Host(name.to_string())
    }

    #[test]
    fn test_parse_json() {
        let problem = Problem::parse(
            r#"{
                "assumptions": [{ "from": { "host": "alice" }, "to": { "host": "bob" } }],
                "constraints": [
                    { "from": { "host": "alice" }, "to": { "var": "x" } },
                    { "from": { "join": [{ "var": "x" }, "bottom"] }, "to": "top", "reason": "sink" }
                ]
            }"#,
            Path::new("problem.json"),
        )
        .unwrap();

        assert_eq!(problem.assumptions.len(), 1);
        assert_eq!(problem.assumptions[0].from, host("alice"));
        assert_eq!(problem.constraints[0].to, LabelExpr::Var("x".to_string()));
        assert_eq!(problem.constraints[1].to, LabelExpr::Top);
        assert_eq!(problem.constraints[1].reason.as_deref(), Some("sink"));
    }

    #[test]
    fn test_parse_toml() {
        let problem = Problem::parse(
            r#"
[[constraints]]
from = { var = "x" }
to = { label = { confidentiality = { host = "alice" }, integrity = { and = [{ host = "alice" }, { host = "bob" }] } } }
"#,
            Path::new("problem.toml"),
        )
        .unwrap();

        assert!(problem.assumptions.is_empty());
        assert_eq!(
            problem.constraints[0].to,
            LabelExpr::Label {
                confidentiality: host("alice"),
                integrity: PrincipalExpr::And(vec![host("alice"), host("bob")]),
            }
        );
    }

    #[test]
    fn test_unknown_extension() {
        let err = Problem::parse("{}", Path::new("problem.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported problem file extension"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Problem::parse(r#"{ "constraint": [] }"#, Path::new("p.json")).is_err());
    }

    #[test]
    fn test_principal_evaluation() {
        let alice = FreeDistributiveLattice::new("alice".to_string());
        let bob = FreeDistributiveLattice::new("bob".to_string());

        assert_eq!(PrincipalExpr::And(vec![host("alice"), host("bob")]).evaluate(), alice.meet(&bob));
        assert_eq!(PrincipalExpr::Or(vec![host("alice"), host("bob")]).evaluate(), alice.join(&bob));
        assert_eq!(PrincipalExpr::And(Vec::new()).evaluate(), Principal::top());
        assert_eq!(PrincipalExpr::Strongest.evaluate(), Principal::bottom());
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation {
            index: 2,
            reason: Some("password leak".to_string()),
            from: SecurityLattice::uniform(FreeDistributiveLattice::new("alice".to_string())),
            to: SecurityLattice::uniform(FreeDistributiveLattice::new("bob".to_string())),
        };
        insta::assert_snapshot!(violation.to_string(), @"constraint 2: {alice} does not flow to {bob} (password leak)");
    }

    #[test]
    fn test_illegal_constraint_reported() {
        // The confidentiality half meets both variables on the left
        let problem = Problem {
            assumptions: Vec::new(),
            constraints: vec![FlowConstraint {
                from: LabelExpr::Host("alice".to_string()),
                to: LabelExpr::Join(vec![LabelExpr::Var("x".to_string()), LabelExpr::Var("y".to_string())]),
                reason: None,
            }],
        };

        let err = problem.label_constraints().unwrap_err();
        assert!(matches!(err, CliError::IllegalConstraint { index: 0, .. }));
    }
}
