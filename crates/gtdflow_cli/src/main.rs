//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `gtdflow_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("gtdflow_core version={}", gtdflow_core::core_version());
    println!(
        "gtdflow_core schema_version={}",
        gtdflow_core::db::migrations::latest_version()
    );
}
