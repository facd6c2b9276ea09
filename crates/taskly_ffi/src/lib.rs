//! Flutter-facing FFI crate for the Taskly core.
//!
//! Bridge glue is generated by flutter_rust_bridge; the stable surface
//! lives in [`api`].

pub mod api;
