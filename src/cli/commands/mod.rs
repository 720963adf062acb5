//! CLI command implementations
//!
//! Every command returns the process exit code:
//! 0 success, 2 configuration error, 3 invalid document data, 5 fatal.

pub mod init;
pub mod map;
pub mod validate;
