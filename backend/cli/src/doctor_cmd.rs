//! CLI Doctor Command
//!
//! Prints the effective config (secrets masked) and every validation finding.

use anyhow::{bail, Result};
use cardwire_config::{redact, CardwireConfig, ValidationReport};

pub fn run(config: &CardwireConfig, report: &ValidationReport) -> Result<()> {
    println!("\n🔍 Running cardwire doctor...\n");

    println!("Effective config:");
    let redacted = serde_json::to_string_pretty(&redact(config))?;
    for line in redacted.lines() {
        println!("  {line}");
    }
    println!();

    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }

    println!();
    if report.is_valid() {
        println!("✅ Config is valid.");
        Ok(())
    } else {
        println!("❌ Some checks failed! Please fix the errors above.");
        bail!("{} config error(s)", report.errors.len())
    }
}

