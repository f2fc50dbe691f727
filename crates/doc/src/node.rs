use emboss_types::PageNumberKind;

/// A run of finalized embossable text together with its index map back to
/// source-text offsets. The text is produced by the translation engine
/// upstream and is never rewritten by layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrailleSegment {
    pub text: String,
    pub source_map: Vec<u32>,
}

impl BrailleSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_map: Vec::new(),
        }
    }

    pub fn with_source_map(text: impl Into<String>, source_map: Vec<u32>) -> Self {
        Self {
            text: text.into(),
            source_map,
        }
    }

    /// Width in cells. One character is one cell on the grid.
    pub fn len_cells(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.chars().all(|c| c == ' ' || c == '\u{2800}')
    }
}

/// Represents a block-level element in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A generic container.
    Block,
    /// A table; children are rows (and optionally a caption).
    Table,
    TableRow,
    TableCell,
    TableCaption,
    /// A poetry stanza or line-numbered prose passage.
    LineGroup { prose: bool },
    /// One numbered line within a group. `number` is the final label text,
    /// known once numbering upstream has run.
    Line { number: Option<String> },
    /// Front-matter page requiring vertical centering.
    TitlePage,
    TitleSection,
    /// Horizontal tab stop: advance to cell `target` on the current line.
    Tab { target: u16 },
    /// End of a volume; page numbering policy applies at the break.
    VolumeEnd,
    /// Placeholder braille to be discarded, not embossed.
    Placeholder,
    /// Reserved vertical space for a tactile graphic.
    Graphic { lines: u16 },
    /// Technical notation laid out by the math line-wrapper.
    Math,
    PageBreak,
}

impl ElementKind {
    /// A string identifier for the element type, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Block => "block",
            ElementKind::Table => "table",
            ElementKind::TableRow => "table-row",
            ElementKind::TableCell => "table-cell",
            ElementKind::TableCaption => "table-caption",
            ElementKind::LineGroup { .. } => "line-group",
            ElementKind::Line { .. } => "line",
            ElementKind::TitlePage => "title-page",
            ElementKind::TitleSection => "title-section",
            ElementKind::Tab { .. } => "tab",
            ElementKind::VolumeEnd => "volume-end",
            ElementKind::Placeholder => "placeholder",
            ElementKind::Graphic { .. } => "graphic",
            ElementKind::Math => "math",
            ElementKind::PageBreak => "page-break",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementKind),
    Braille(BrailleSegment),
}

/// Input attributes carried by an element, set by the upstream stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAttrs {
    /// Overrides the page-number sequence from this node onward.
    pub page_number_kind: Option<PageNumberKind>,
    /// Entry word for dictionary-style running heads.
    pub guide_word: Option<String>,
    /// This table and its adjacent sibling form a left/right spread.
    pub facing: bool,
}
