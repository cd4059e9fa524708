//! Library wrapper around the `javelin` CLI implementation.
//!
//! The binary (`src/main.rs`) is compiled as a module here as well, so
//! `cargo test -p javelin-cli --lib` typechecks the CLI without building the integration suite.

#[allow(dead_code)]
#[path = "main.rs"]
mod main_bin;
