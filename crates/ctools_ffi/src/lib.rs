//! FFI crate for the ctools UI shell.
//!
//! All exported use cases live in [`api`].

pub mod api;
