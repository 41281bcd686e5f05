//! Pipeline stages for batch PDF conversion.
//!
//! Each submodule implements exactly one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ exec ──▶ rewrite
//! (list PDFs)  (external converter)  (image URLs)
//! ```
//!
//! 1. [`scan`]    — resolve the run's directories and list `.pdf` candidates
//!    in directory-listing order
//! 2. [`exec`]    — launch the converter without a shell and forward its
//!    stdout/stderr chunk by chunk while it runs
//! 3. [`rewrite`] — replace bare `_page…jpeg` references in the generated
//!    Markdown with absolute content-server URLs

pub mod exec;
pub mod rewrite;
pub mod scan;
