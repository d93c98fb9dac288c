//! Describe command implementation.

use anyhow::Result;
use console::style;

use super::common::load_device;

/// Execute the describe command.
pub fn execute(path: &str) -> Result<()> {
    let device = load_device(path)?;
    let durations = device.durations();

    println!("{} {}", style("Device").cyan().bold(), style(path).green());
    println!("  Control radius: {}", style(device.control_radius()).yellow());
    println!("  Sites:          {}", device.len());
    println!("  Identity:       {:?}", durations.identity);
    println!("  Measurement:    {:?}", durations.measurement);
    println!();

    println!("  {:<24} {}", style("Site").bold(), style("Neighbors").bold());
    for site in device.qubit_set() {
        let neighbors = device.neighbors(site).len();
        println!("  {:<24} {}", site.to_string(), neighbors);
    }

    Ok(())
}
