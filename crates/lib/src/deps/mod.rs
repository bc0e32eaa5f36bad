//! Implicit dependency reporting.
//!
//! Scripts read files (the script itself, modules it requires, directories
//! it globs) and write files (the rule output). These are reported to a
//! parent build process as a stream of binary records so it can decide when
//! the rules need regenerating.

pub mod record;
pub mod sender;

pub use record::{DecodeError, Dependency, HEADER_LEN, MAX_NAME_LEN};
pub use sender::DepSender;
