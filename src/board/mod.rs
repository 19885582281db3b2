//! Kanban board: lane partition plus the drop engine.
//!
//! Lane membership is a pure function over the card collection's `status`
//! field — there is no lane entity holding its own member list, so the
//! partition can never drift out of sync with the cards.

pub mod engine;

pub use engine::{BoardEngine, DropOutcome};

use crate::model::Card;

/// The cards belonging to one lane, in collection order.
pub fn lane_cards<'a>(cards: &'a [Card], lane_key: &str) -> Vec<&'a Card> {
    cards.iter().filter(|c| c.status == lane_key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_lanes;

    fn sample_cards() -> Vec<Card> {
        vec![
            Card::new(1, "not_started"),
            Card::new(2, "in_progress"),
            Card::new(3, "done"),
            Card::new(4, "not_started"),
        ]
    }

    #[test]
    fn test_lane_cards_filters_by_status() {
        let cards = sample_cards();
        let not_started = lane_cards(&cards, "not_started");
        assert_eq!(not_started.len(), 2);
        assert!(not_started.iter().all(|c| c.status == "not_started"));
    }

    #[test]
    fn test_partition_is_complete() {
        // Every card lands in exactly one lane.
        let cards = sample_cards();
        let total: usize = default_lanes()
            .iter()
            .map(|lane| lane_cards(&cards, &lane.key).len())
            .sum();
        assert_eq!(total, cards.len());
    }

    #[test]
    fn test_lane_cards_preserves_collection_order() {
        let cards = sample_cards();
        let not_started = lane_cards(&cards, "not_started");
        assert_eq!(not_started[0].id, crate::model::CardId::Num(1));
        assert_eq!(not_started[1].id, crate::model::CardId::Num(4));
    }

    #[test]
    fn test_unknown_lane_is_empty() {
        let cards = sample_cards();
        assert!(lane_cards(&cards, "archived").is_empty());
    }
}
