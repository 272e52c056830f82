//! Dashboard shell: composes registered cards into a localized, responsive
//! page layout.

use serde::Serialize;

use pumpsim_domain::id::CardId;
use pumpsim_domain::layout::{
    Breakpoint, CardDescriptor, CardKind, GridTemplate, Placement, arrange,
};

use crate::ports::Translator;

/// Translation key of the page title.
pub const TITLE_KEY: &str = "TITLE";

/// A card with its labels already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCard {
    pub id: CardId,
    pub kind: CardKind,
    pub title: String,
    pub subtitle: Option<String>,
}

/// Grid template and card placements for one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsiveGrid {
    pub breakpoint: Breakpoint,
    pub min_width_px: u16,
    pub template: GridTemplate,
    pub css: String,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub title: String,
    pub cards: Vec<RenderedCard>,
    pub grids: Vec<ResponsiveGrid>,
}

impl Layout {
    #[must_use]
    pub fn grid(&self, breakpoint: Breakpoint) -> Option<&ResponsiveGrid> {
        self.grids.iter().find(|grid| grid.breakpoint == breakpoint)
    }
}

/// Compose `cards` into a layout, resolving labels through `translator`.
pub fn render(cards: &[CardDescriptor], title_key: &str, translator: &impl Translator) -> Layout {
    let rendered = cards
        .iter()
        .map(|card| RenderedCard {
            id: card.id,
            kind: card.kind,
            title: translator.lookup(&card.title_key).to_string(),
            subtitle: card
                .subtitle_key
                .as_deref()
                .map(|key| translator.lookup(key).to_string()),
        })
        .collect();

    let grids = Breakpoint::ALL
        .into_iter()
        .map(|breakpoint| {
            let template = GridTemplate::for_breakpoint(breakpoint);
            ResponsiveGrid {
                breakpoint,
                min_width_px: breakpoint.min_width_px(),
                css: template.css(),
                placements: arrange(cards, &template),
                template,
            }
        })
        .collect();

    Layout {
        title: translator.lookup(title_key).to_string(),
        cards: rendered,
        grids,
    }
}

/// The set of cards shown on the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardShell {
    title_key: String,
    cards: Vec<CardDescriptor>,
}

impl Default for DashboardShell {
    /// A shell showing only the "Basic Information" card.
    fn default() -> Self {
        Self::empty().register(CardDescriptor::basic_information())
    }
}

impl DashboardShell {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            title_key: TITLE_KEY.to_string(),
            cards: Vec::new(),
        }
    }

    /// Append a card; cards render in registration order.
    #[must_use]
    pub fn register(mut self, card: CardDescriptor) -> Self {
        tracing::debug!(card = %card.id, kind = ?card.kind, "registered dashboard card");
        self.cards.push(card);
        self
    }

    #[must_use]
    pub fn cards(&self) -> &[CardDescriptor] {
        &self.cards
    }

    pub fn render(&self, translator: &impl Translator) -> Layout {
        render(&self.cards, &self.title_key, translator)
    }
}
