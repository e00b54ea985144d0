/// Core functionality modules
///
/// Contains the repair logic: resolving the environment layout,
/// detecting where it was installed, and rewriting its scripts.

pub mod detector;
pub mod layout;
pub mod rewriter;

pub use detector::PathDetector;
pub use layout::EnvLayout;
pub use rewriter::{eligible_files, replace_in_file, Rewriter};
