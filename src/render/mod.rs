//! Report rendering.

pub mod markdown;

pub use markdown::{PLACEHOLDER, RenderSummary, render_directory, render_markdown};
