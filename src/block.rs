/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
}

/// Block-level elements of a rendered fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#` is level 1 (summary banner), `##` and `###` are card titles.
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        content: Vec<Span>,
    },
    List {
        items: Vec<Vec<Span>>,
    },
    /// A standalone bold line such as `**Overview**`.
    Label {
        text: String,
    },
    Source {
        content: Vec<Span>,
    },
}
