//! Validate command implementation.

use anyhow::Result;
use console::style;

use pasqal_device::{DeviceResult, PasqalDevice};
use pasqal_ir::Operation;

use super::common::{load_device, load_operations};

/// Outcome of checking one input operation.
#[derive(Debug)]
pub struct Verdict {
    /// Native operations the input lowered to.
    pub native: Vec<Operation>,
    /// First failure, if any.
    pub error: Option<String>,
}

/// Check one operation, lowering it first when `decompose` is set.
pub fn check(device: &PasqalDevice, operation: &Operation, decompose: bool) -> Verdict {
    let lowered: DeviceResult<Vec<Operation>> = if decompose && operation.is_gate_operation() {
        device.decompose_operation(operation)
    } else {
        Ok(vec![operation.clone()])
    };

    match lowered {
        Ok(native) => {
            let error = native
                .iter()
                .find_map(|op| device.validate_operation(op).err())
                .map(|e| e.to_string());
            Verdict { native, error }
        }
        Err(e) => Verdict {
            native: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

/// Execute the validate command.
pub fn execute(device_path: &str, ops_path: &str, decompose: bool) -> Result<()> {
    let device = load_device(device_path)?;
    let operations = load_operations(ops_path)?;

    println!(
        "{} Validating {} operations against {} ({} sites)",
        style("→").cyan().bold(),
        operations.len(),
        style(device_path).green(),
        device.len()
    );

    let mut failures = 0usize;
    for (index, operation) in operations.iter().enumerate() {
        let verdict = check(&device, operation, decompose);
        match verdict.error {
            None => {
                println!("  {} [{index}] {operation}", style("✓").green().bold());
                if decompose && verdict.native.len() > 1 {
                    for op in &verdict.native {
                        println!("      {}", style(op).dim());
                    }
                }
            }
            Some(reason) => {
                failures += 1;
                println!(
                    "  {} [{index}] {operation}: {}",
                    style("✗").red().bold(),
                    style(reason).red()
                );
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} operations failed validation", operations.len());
    }

    println!("{} All operations valid", style("✓").green().bold());
    Ok(())
}
