//! Braille document pagination.
//!
//! Takes a styled document tree whose content nodes already carry
//! finalized embossable text and lays it onto fixed-geometry pages of
//! cells. Translation, style-rule matching and export all live upstream
//! or downstream of this workspace; this crate ties the member crates
//! together and offers the one-call entry point.

pub use emboss_canvas as canvas;
pub use emboss_doc as doc;
pub use emboss_format as format;
pub use emboss_style as style;
pub use emboss_types as types;

pub use emboss_canvas::{PageCanvas, PageSet};
pub use emboss_doc::Document;
pub use emboss_format::{FormatConfig, FormatContext, FormatError, LiteraryFormatter};
pub use emboss_style::{StyleMap, StyleResolver};
pub use emboss_types::PageGeometry;

/// Paginates a whole document onto a fresh page sequence.
pub fn paginate(
    doc: &mut Document,
    styles: &dyn StyleResolver,
    geometry: PageGeometry,
    config: &FormatConfig,
) -> Result<PageSet, FormatError> {
    let root = doc.root();
    // Separators, dividers and labels injected by an earlier run are
    // stale layout, not content.
    doc.clear_synthetic(root);

    let mut pages = PageSet::with_options(geometry, 1, config.running_head);
    let formatter = LiteraryFormatter::new();
    let mut ctx = FormatContext::new(doc, styles, config);
    formatter.format(&mut ctx, root, &mut pages)?;
    pages.process_spacing();
    Ok(pages)
}

/// Installs the default `env_logger` backend. Embedders that bring their
/// own `log` implementation skip this.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
