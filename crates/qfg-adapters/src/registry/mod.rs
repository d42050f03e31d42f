//! Template registry adapters.
//!
//! [`BuiltinRegistry`] ships inside the binary. [`FilesystemRegistry`]
//! reads a user directory with a `registry.toml` manifest. [`open`] picks
//! one for the CLI.

mod builtin;
mod filesystem;
mod render;

pub use builtin::{BUILTIN_VERSION, BuiltinRegistry};
pub use filesystem::{FilesystemRegistry, MANIFEST_FILE};
pub use render::{placeholders, render_placeholders};

use std::path::Path;

use qfg_core::{application::ports::TemplateRegistry, error::QfgResult};
use tracing::debug;

/// The directory registry when `templates_dir` is set, the built-ins
/// otherwise.
pub fn open(templates_dir: Option<&Path>) -> QfgResult<Box<dyn TemplateRegistry>> {
    match templates_dir {
        Some(dir) => {
            debug!(path = %dir.display(), "using templates directory");
            Ok(Box::new(FilesystemRegistry::load(dir)?))
        }
        None => Ok(Box::new(BuiltinRegistry::new())),
    }
}
