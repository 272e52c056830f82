//! Dashboard layout: card descriptors and their placement in a responsive grid.
//!
//! Placement is pure arithmetic: given the cards and a breakpoint, compute the
//! row/column each card occupies. Text resolution happens in the app layer.

use serde::{Deserialize, Serialize};

use crate::id::CardId;

/// What a card shows. The presentation layer picks a renderer per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    BasicInformation,
    Placeholder,
}

/// A card registered with the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDescriptor {
    pub id: CardId,
    pub kind: CardKind,
    pub title_key: String,
    pub subtitle_key: Option<String>,
    /// Requested column span; clamped to the grid width when placed.
    pub span: usize,
}

impl CardDescriptor {
    #[must_use]
    pub fn new(kind: CardKind, title_key: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            kind,
            title_key: title_key.into(),
            subtitle_key: None,
            span: 1,
        }
    }

    /// The "Basic Information" configuration card.
    #[must_use]
    pub fn basic_information() -> Self {
        Self::new(CardKind::BasicInformation, "BASIC.TITLE").with_subtitle_key("BASIC.SUB_TITLE")
    }

    #[must_use]
    pub fn with_subtitle_key(mut self, key: impl Into<String>) -> Self {
        self.subtitle_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span.max(1);
        self
    }
}

/// Viewport width class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Small,
    Medium,
    Large,
}

impl Breakpoint {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Minimum viewport width in CSS pixels at which this breakpoint applies.
    #[must_use]
    pub fn min_width_px(self) -> u16 {
        match self {
            Self::Small => 0,
            Self::Medium => 768,
            Self::Large => 1024,
        }
    }
}

/// One column track of a grid template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Fraction(u8),
    Fixed(u16),
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fraction(fr) => write!(f, "{fr}fr"),
            Self::Fixed(px) => write!(f, "{px}px"),
        }
    }
}

/// Column tracks and gap for one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTemplate {
    pub tracks: Vec<Track>,
    /// Gap between cells, in quarter-rem steps.
    pub gap: u8,
}

impl GridTemplate {
    /// Dashboard grid: one column on small screens, a main column plus a
    /// 250px side column on medium screens, two equal columns on large ones.
    #[must_use]
    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        match breakpoint {
            Breakpoint::Small => Self {
                tracks: vec![Track::Fraction(1)],
                gap: 4,
            },
            Breakpoint::Medium => Self {
                tracks: vec![Track::Fraction(1), Track::Fixed(250)],
                gap: 4,
            },
            Breakpoint::Large => Self {
                tracks: vec![Track::Fraction(1), Track::Fraction(1)],
                gap: 8,
            },
        }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.tracks.len().max(1)
    }

    /// CSS declarations for this template.
    #[must_use]
    pub fn css(&self) -> String {
        let tracks = self
            .tracks
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let gap_rem = f32::from(self.gap) / 4.0;
        format!("grid-template-columns: {tracks}; gap: {gap_rem}rem;")
    }
}

/// Where a single card lands in the grid (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub card: CardId,
    pub row: usize,
    pub column: usize,
    pub span: usize,
}

/// Place `cards` row-major into `template`.
///
/// A card that does not fit in the remaining columns of the current row moves
/// to the start of the next row. Spans wider than the grid are clamped.
#[must_use]
pub fn arrange(cards: &[CardDescriptor], template: &GridTemplate) -> Vec<Placement> {
    let columns = template.columns();
    let mut row = 0;
    let mut column = 0;
    let mut placements = Vec::with_capacity(cards.len());

    for card in cards {
        let span = card.span.clamp(1, columns);
        if column + span > columns {
            row += 1;
            column = 0;
        }
        placements.push(Placement {
            card: card.id,
            row,
            column,
            span,
        });
        column += span;
        if column == columns {
            row += 1;
            column = 0;
        }
    }

    placements
}
