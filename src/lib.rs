/// Numeric Annotation - background knowledge for annotating numeric table columns
///
/// This is the root crate that provides workspace-level documentation.
/// Actual implementation is in the subcrates:
/// - `numeric-annotation-core`: property trees, background knowledge graphs, matching and annotation
/// - `numeric-annotation-cli`: command line adapter reading JSON table documents

/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
