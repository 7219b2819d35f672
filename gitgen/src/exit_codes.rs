//! Stable exit codes for gitgen CLI commands.

/// Command succeeded and printed its artifact.
pub const OK: i32 = 0;
/// Invalid config, git failure, or other errors outside the generation pipeline.
pub const INVALID: i32 = 1;
/// The external tool could not be launched, exited non-zero, or timed out.
pub const TOOL_FAILED: i32 = 2;
/// The tool ran but its output could not be turned into a valid artifact.
pub const BAD_OUTPUT: i32 = 3;
