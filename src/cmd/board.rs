//! Board rendering and card movement commands.

use anyhow::{Context, Result, bail};
use auditboard::api::HttpStore;
use auditboard::board::{BoardEngine, DropOutcome};
use auditboard::config::AppConfig;
use auditboard::model::{Card, CardId};
use auditboard::notify::ConsoleNotifier;
use auditboard::query;
use console::style;
use std::sync::Arc;

fn build_engine(config: &AppConfig) -> Result<BoardEngine> {
    let store = HttpStore::new(config.backend.base_url.clone(), config.backend.timeout())
        .context("Failed to build HTTP client")?;
    Ok(BoardEngine::new(
        config.board.lanes.clone(),
        Arc::new(store),
        Arc::new(ConsoleNotifier),
    ))
}

/// Numeric-looking ids are sent as JSON numbers, everything else as strings,
/// matching what the backends hand out.
fn parse_card_id(raw: &str) -> CardId {
    match raw.parse::<i64>() {
        Ok(n) => CardId::Num(n),
        Err(_) => CardId::from(raw),
    }
}

pub async fn cmd_show(
    config: &AppConfig,
    lane_filter: Option<&str>,
    search_query: &str,
    page: usize,
    per_page: usize,
) -> Result<()> {
    let mut engine = build_engine(config)?;
    engine.refresh().await.context("Could not load the board")?;

    if let Some(key) = lane_filter {
        if !config.board.lanes.iter().any(|l| l.key == key) {
            bail!(
                "Unknown lane '{}'. Configured lanes: {}",
                key,
                config
                    .board
                    .lanes
                    .iter()
                    .map(|l| l.key.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    println!();
    for lane in engine.lanes().iter().filter(|l| {
        lane_filter.is_none() || lane_filter == Some(l.key.as_str())
    }) {
        let visible: Vec<&Card> =
            engine.visible_lane_cards(&lane.key, search_query, &config.search.fields);
        let paged = query::paginate(&visible, page, per_page);

        println!(
            "{} ({} of {})",
            style(&lane.label).bold().underlined(),
            paged.items.len(),
            paged.total
        );
        if paged.items.is_empty() {
            println!("  {}", style("(empty)").dim());
        }
        for card in &paged.items {
            println!("  {:<10} {}", style(&card.id).cyan(), card_title(card, config));
        }
        if paged.total_pages() > 1 {
            println!(
                "  {}",
                style(format!("page {} of {}", paged.page, paged.total_pages())).dim()
            );
        }
        println!();
    }

    if let Some(ts) = engine.refreshed_at() {
        println!("{}", style(format!("as of {}", ts.to_rfc3339())).dim());
    }
    Ok(())
}

/// The first configured search field that has a value, falling back to the
/// raw status.
fn card_title(card: &Card, config: &AppConfig) -> String {
    config
        .search
        .fields
        .iter()
        .find_map(|f| card.text_field(f))
        .unwrap_or(&card.status)
        .to_string()
}

pub async fn cmd_move(config: &AppConfig, id: &str, from: &str, to: &str) -> Result<()> {
    let mut engine = build_engine(config)?;
    engine.refresh().await.context("Could not load the board")?;

    let card_id = parse_card_id(id);
    match engine.handle_drop(&card_id, from, to).await {
        DropOutcome::Moved => Ok(()),
        DropOutcome::SameLane => {
            println!("Card {} is already in '{}'; nothing to do.", id, to);
            Ok(())
        }
        DropOutcome::Ignored => bail!(
            "Move ignored: check that card '{}' exists and that '{}' and '{}' are configured lanes",
            id,
            from,
            to
        ),
        // The engine already reloaded authoritative state and surfaced the
        // failure; exit non-zero so scripts notice.
        DropOutcome::RolledBack => bail!("Backend rejected the move; board was reloaded"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card_id_numeric() {
        assert_eq!(parse_card_id("42"), CardId::Num(42));
        assert_eq!(parse_card_id("-3"), CardId::Num(-3));
    }

    #[test]
    fn test_parse_card_id_text() {
        assert_eq!(parse_card_id("F-42"), CardId::from("F-42"));
        assert_eq!(parse_card_id("42a"), CardId::from("42a"));
    }

    #[test]
    fn test_card_title_prefers_first_populated_search_field() {
        let config = AppConfig::default();
        let card = Card::new(1, "done")
            .with_field("auditor", serde_json::json!("Rina"));
        // "name" is configured first but absent; "auditor" wins.
        assert_eq!(card_title(&card, &config), "Rina");
    }

    #[test]
    fn test_card_title_falls_back_to_status() {
        let config = AppConfig::default();
        let card = Card::new(1, "done");
        assert_eq!(card_title(&card, &config), "done");
    }
}
