use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::problem::{Label, LabelSystem, Principal, Problem, Violation};
use anyhow::{Context, Result};
use colored::Colorize;
use labelflow_core::security::LabelSolution;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

fn load_system(path: &Path) -> Result<LabelSystem> {
    let problem = Problem::load(path)?;
    debug!(
        path = %path.display(),
        assumptions = problem.assumptions.len(),
        constraints = problem.constraints.len(),
        "problem loaded"
    );
    Ok(problem.system()?)
}

fn write_dot(system: &LabelSystem, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            system.export_dot_graph(&mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), "constraint graph written");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            system.export_dot_graph(&mut writer)?;
        }
    }
    Ok(())
}

/// Solve a problem and print the inferred labels or the violations
pub fn solve(path: &Path, format: OutputFormat, all_violations: bool, dot: Option<&Path>) -> Result<()> {
    let system = load_system(path)?;
    if let Some(dot) = dot {
        write_dot(&system, Some(dot))?;
    }

    let outcome = if all_violations {
        let violations = system.violations();
        if violations.is_empty() {
            Ok(LabelSolution::new(system.candidate_solution()))
        } else {
            Err(violations)
        }
    } else {
        system.label_solution().map_err(|violation| vec![violation])
    };

    match outcome {
        Ok(solution) => {
            print_solution(&solution, format)?;
            Ok(())
        }
        Err(violations) => {
            print_violations(&violations, format)?;
            Err(CliError::Unsatisfiable {
                count: violations.len(),
            }
            .into())
        }
    }
}

/// Write the constraint graph of a problem
pub fn dot(path: &Path, output: Option<&Path>) -> Result<()> {
    let system = load_system(path)?;
    write_dot(&system, output)
}

fn label_json(label: &Label) -> Value {
    json!({
        "label": label.to_string(),
        "confidentiality": label.confidentiality_component().to_string(),
        "integrity": label.integrity_component().to_string(),
    })
}

fn print_solution(solution: &LabelSolution<Principal, String>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for variable in solution.variables() {
                let label = solution.get(variable);
                println!("{}: {}", variable.bold(), label.to_string().green());
            }
        }
        OutputFormat::Json => {
            let labels: serde_json::Map<String, Value> = solution
                .variables()
                .into_iter()
                .map(|variable| (variable.clone(), label_json(&solution.get(variable))))
                .collect();
            let report = json!({ "status": "ok", "labels": labels });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn print_violations(violations: &[Violation], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for violation in violations {
                println!("{} {}", "violation:".red().bold(), violation);
            }
        }
        OutputFormat::Json => {
            let violations: Vec<Value> = violations
                .iter()
                .map(|violation| {
                    json!({
                        "constraint": violation.index,
                        "reason": violation.reason,
                        "from": label_json(&violation.from),
                        "to": label_json(&violation.to),
                    })
                })
                .collect();
            let report = json!({ "status": "unsatisfiable", "violations": violations });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
