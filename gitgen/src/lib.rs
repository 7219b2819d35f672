//! Generate commit subjects, branch slugs and pull-request text from git context
//! by driving the `claude` CLI as a subprocess.
//!
//! The crate keeps the same split throughout:
//!
//! - **[`core`]**: Pure, deterministic logic (prompt rendering, output record
//!   selection, fence stripping, artifact validation). No I/O.
//! - **[`io`]**: Side-effecting operations (process execution, debug log,
//!   git, configuration files).
//!
//! [`generate`] wires the two together into the three public operations.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod generate;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
