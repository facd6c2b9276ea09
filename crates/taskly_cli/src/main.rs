//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskly_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from Flutter/FFI runtime setup.
    println!("taskly_core ping={}", taskly_core::ping());
    println!("taskly_core version={}", taskly_core::core_version());
}
