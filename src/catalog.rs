//! Product Catalog
//!
//! In-memory view of the rendered product cards: which category each card
//! belongs to, whether it is shown, and whether it is a favorite.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    /// `data-category` of the card, if any
    pub category: Option<String>,
    /// Position in document order
    pub order: usize,
    pub visible: bool,
    pub favorite: bool,
}

impl ProductCard {
    pub fn new(order: usize, category: Option<String>, favorite: bool) -> Self {
        Self {
            category,
            order,
            visible: true,
            favorite,
        }
    }
}

/// How a card should be displayed after a category swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVisibility {
    /// Shown, with its reveal animation delayed by `delay_ms`
    Shown { delay_ms: u32 },
    Hidden,
}

#[derive(Debug, Default)]
pub struct Catalog {
    cards: Vec<ProductCard>,
}

impl Catalog {
    pub fn new(cards: Vec<ProductCard>) -> Self {
        Self { cards }
    }

    /// Show only cards tagged `key`. The reveal delay is staggered by the
    /// card's position among all cards.
    pub fn show_category(&mut self, key: &str, stagger_ms: u32) -> Vec<CardVisibility> {
        self.cards
            .iter_mut()
            .map(|card| {
                card.visible = card.category.as_deref() == Some(key);
                if card.visible {
                    let delay_ms = u32::try_from(card.order)
                        .unwrap_or(u32::MAX)
                        .saturating_mul(stagger_ms);
                    CardVisibility::Shown { delay_ms }
                } else {
                    CardVisibility::Hidden
                }
            })
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.cards.iter().filter(|card| card.visible).count()
    }

    /// Categories that currently have at least one visible card
    #[cfg(test)]
    pub fn visible_categories(&self) -> std::collections::BTreeSet<&str> {
        self.cards
            .iter()
            .filter(|card| card.visible)
            .filter_map(|card| card.category.as_deref())
            .collect()
    }

    /// Flip the favorite flag; returns the new value
    pub fn toggle_favorite(&mut self, order: usize) -> Option<bool> {
        let card = self.cards.get_mut(order)?;
        card.favorite = !card.favorite;
        Some(card.favorite)
    }

    pub fn favorite_count(&self) -> usize {
        self.cards.iter().filter(|card| card.favorite).count()
    }
}
