use crate::config::FormatConfig;
use emboss_doc::Document;
use emboss_style::StyleResolver;

/// Everything a formatting pass reads and annotates besides the canvas.
///
/// Group-scoped layout state (poetry line lists, title-page section
/// counts) does NOT live here: each formatter threads its own state
/// struct through its calls so nothing leaks across unrelated subtrees.
pub struct FormatContext<'a> {
    pub doc: &'a mut Document,
    pub styles: &'a dyn StyleResolver,
    pub config: &'a FormatConfig,
}

impl<'a> FormatContext<'a> {
    pub fn new(
        doc: &'a mut Document,
        styles: &'a dyn StyleResolver,
        config: &'a FormatConfig,
    ) -> Self {
        Self {
            doc,
            styles,
            config,
        }
    }
}
