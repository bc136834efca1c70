//! Confined file lookup beneath the content root.
//!
//! - **`root`**: the long-lived content-root directory handle
//! - **`resolver`**: segment-at-a-time walk from a URL path to an open file
//! - **`segment`**: per-segment safety checks
//! - **`sys`**: `openat`/`fstatat` wrappers

pub mod resolver;
pub mod root;
pub mod segment;
pub mod sys;

pub use resolver::{ResolveError, ResolvedResource};
pub use root::ContentRoot;
