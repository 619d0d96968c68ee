//! Template location and application

pub mod locator;
pub mod renderer;

pub use locator::{Concern, FileSet, PackageDir, TemplateStep};
pub use renderer::{apply_step, render_file, substitute, TemplateContext, TEMPLATE_SUFFIX};
