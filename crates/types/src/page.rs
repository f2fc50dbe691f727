use serde::{Deserialize, Serialize};

/// Which numbering sequence a page belongs to.
///
/// Body pages count in the normal sequence, front-matter pages in the
/// preliminary one; title pages and deliberately unnumbered pages carry no
/// printed number at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum PageNumberKind {
    #[default]
    Normal,
    Preliminary,
    TitlePage,
    Unnumbered,
}
