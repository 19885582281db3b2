//! The drop engine: optimistic lane transitions kept in sync with the
//! remote system of record.
//!
//! A drop is processed in two explicit phases so the rollback path is
//! testable on its own:
//!
//! 1. *Tentative apply* — the card's status is mutated in place and the
//!    prior card is snapshotted into a [`PendingMove`], stamped with a
//!    per-card generation counter.
//! 2. *Confirm or revert* — on a successful persist the server's canonical
//!    card replaces the optimistic one; on failure the authoritative
//!    collection is re-fetched (falling back to the snapshot if even that
//!    fails), so an un-synced optimistic mutation never stands.
//!
//! The generation stamp orders overlapping persists on the same card by
//! completion: a response carrying a stale generation is dropped instead of
//! overwriting newer optimistic state. Responses for cards that have left
//! the collection entirely are dropped the same way.
//!
//! Transitions are free-form: any lane-to-lane move is legal, there is no
//! enforced workflow ordering between lanes.

use crate::api::RecordStore;
use crate::errors::ApiError;
use crate::model::{Card, CardId, Lane};
use crate::notify::{NoticeKind, Notifier};
use crate::query;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Terminal outcome of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The card moved and the server's canonical copy is in place.
    Moved,
    /// Source and target lane are the same; nothing changed, no request
    /// was issued.
    SameLane,
    /// Unknown card or lane key; the collection was not touched.
    Ignored,
    /// The persist failed; local state was re-synced from the backend (or
    /// the snapshot restored) and the failure surfaced to the user.
    RolledBack,
}

/// One optimistic move awaiting its persist result.
struct PendingMove {
    id: CardId,
    generation: u64,
    prior: Card,
}

/// Owns the card collection for one board and every mutation of it.
pub struct BoardEngine {
    cards: Vec<Card>,
    lanes: Vec<Lane>,
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    generations: HashMap<CardId, u64>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl BoardEngine {
    pub fn new(lanes: Vec<Lane>, store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        BoardEngine {
            cards: Vec::new(),
            lanes,
            store,
            notifier,
            generations: HashMap::new(),
            refreshed_at: None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// When the collection was last replaced from the backend.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Cards currently in one lane, in collection order.
    pub fn lane_cards(&self, lane_key: &str) -> Vec<&Card> {
        super::lane_cards(&self.cards, lane_key)
    }

    /// Lane partition restricted to cards matching a search query. Search
    /// and partition compose: filtering happens first, then the status
    /// filter.
    pub fn visible_lane_cards(
        &self,
        lane_key: &str,
        search_query: &str,
        search_fields: &[String],
    ) -> Vec<&Card> {
        query::search(&self.cards, search_query, search_fields)
            .into_iter()
            .filter(|c| c.status == lane_key)
            .collect()
    }

    /// Replace the collection wholesale from the backend. On failure the
    /// local collection is left untouched and the error is surfaced through
    /// the notifier as well as the return value.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let store = self.store.clone();
        match store.fetch_all().await {
            Ok(cards) => {
                debug!(count = cards.len(), "board refreshed from backend");
                self.replace_cards(cards);
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .notify(&format!("Failed to load board: {}", err), NoticeKind::Error);
                Err(err)
            }
        }
    }

    /// Process a user-initiated lane transition.
    ///
    /// Unknown lane keys and unknown card ids are no-ops; a same-lane drop
    /// issues no request. Otherwise the move is applied optimistically,
    /// persisted, and confirmed or rolled back — every terminal outcome is
    /// reported through the notifier, and failures never escape this method.
    pub async fn handle_drop(&mut self, id: &CardId, from_lane: &str, to_lane: &str) -> DropOutcome {
        if !self.has_lane(from_lane) || !self.has_lane(to_lane) {
            warn!(from = from_lane, to = to_lane, "drop with unknown lane ignored");
            return DropOutcome::Ignored;
        }
        if from_lane == to_lane {
            return DropOutcome::SameLane;
        }
        let Some((pending, updated)) = self.begin_move(id, to_lane) else {
            warn!(card = %id, "drop for unknown card ignored");
            return DropOutcome::Ignored;
        };

        let store = self.store.clone();
        match store.update(&updated).await {
            Ok(server_card) => {
                self.confirm(&pending, server_card);
                self.notifier.notify(
                    &format!("Moved {} to {}", id, self.lane_label(to_lane)),
                    NoticeKind::Success,
                );
                DropOutcome::Moved
            }
            Err(err) => {
                self.notifier.notify(
                    &format!("Failed to move {}: {}", id, err),
                    NoticeKind::Error,
                );
                self.rollback(&pending).await;
                DropOutcome::RolledBack
            }
        }
    }

    // ── two-phase internals ──────────────────────────────────────────

    /// Phase one: mutate the card's status in place and snapshot the prior
    /// card. Returns the pending move plus a clone of the updated card for
    /// the persist request, or `None` if the card is not in the collection.
    fn begin_move(&mut self, id: &CardId, to_lane: &str) -> Option<(PendingMove, Card)> {
        let idx = self.cards.iter().position(|c| &c.id == id)?;
        let prior = self.cards[idx].clone();
        self.cards[idx].status = to_lane.to_string();
        let generation = self.bump_generation(id);
        let updated = self.cards[idx].clone();
        Some((
            PendingMove {
                id: id.clone(),
                generation,
                prior,
            },
            updated,
        ))
    }

    /// Phase two, success: substitute the server's canonical card — unless
    /// a newer move on the same card has superseded this one, or the card
    /// has left the collection, in which case the response is dropped.
    fn confirm(&mut self, pending: &PendingMove, server_card: Card) {
        if !self.is_current(pending) {
            debug!(card = %pending.id, "stale persist response dropped");
            return;
        }
        match self.cards.iter().position(|c| c.id == pending.id) {
            Some(idx) => self.cards[idx] = server_card,
            None => debug!(card = %pending.id, "persist response for departed card dropped"),
        }
    }

    /// Phase two, failure: restore consistency with the backend. The
    /// authoritative collection is re-fetched; if even that fails, the
    /// snapshot is restored locally so the optimistic mutation cannot
    /// outlive its failed persist.
    async fn rollback(&mut self, pending: &PendingMove) {
        let store = self.store.clone();
        match store.fetch_all().await {
            Ok(cards) => self.replace_cards(cards),
            Err(err) => {
                self.revert(pending);
                self.notifier.notify(
                    &format!("Failed to reload board after error: {}", err),
                    NoticeKind::Error,
                );
            }
        }
    }

    fn revert(&mut self, pending: &PendingMove) {
        if !self.is_current(pending) {
            return;
        }
        if let Some(idx) = self.cards.iter().position(|c| c.id == pending.id) {
            self.cards[idx] = pending.prior.clone();
        }
    }

    /// Replacing the collection invalidates every in-flight move: the
    /// generation table is cleared, so late confirms and reverts become
    /// no-ops.
    fn replace_cards(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.generations.clear();
        self.refreshed_at = Some(Utc::now());
    }

    fn bump_generation(&mut self, id: &CardId) -> u64 {
        let counter = self.generations.entry(id.clone()).or_insert(0);
        *counter += 1;
        *counter
    }

    fn is_current(&self, pending: &PendingMove) -> bool {
        self.generations.get(&pending.id).copied() == Some(pending.generation)
    }

    fn has_lane(&self, key: &str) -> bool {
        self.lanes.iter().any(|l| l.key == key)
    }

    fn lane_label(&self, key: &str) -> String {
        self.lanes
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.label.clone())
            .unwrap_or_else(|| key.to_string())
    }
}
