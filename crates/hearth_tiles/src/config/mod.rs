//! Configuration file parsing and structures.
//!
//! hearth_tiles reads TOML files holding logging and API settings plus one
//! `[tiles.<id>]` table per configured update tile. Several files can be
//! given, and files can `imports = [...]` others; everything is merged
//! first-wins with conflicts reported as diagnostics.

mod config;
mod diagnostics;
mod partial;

pub use config::*;
pub use diagnostics::format_diagnostics;
pub use diagnostics::Diagnostic;
pub use diagnostics::Error;
pub use diagnostics::LoadError;
pub use diagnostics::MergeError;
pub use diagnostics::SourceInfo;
pub use diagnostics::SourceLocation;
pub use diagnostics::ValidationError;
pub use diagnostics::Warning;
pub use partial::MergedConfig;
pub use partial::PartialConfig;
