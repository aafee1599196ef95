//! Matcher/Ranker — scores active knowledge entries against a visitor message
//! and picks the best answer, if any clears the threshold.
//!
//! Scoring: token overlap between the query and the entry's question+keywords,
//! divided by the query token count, nudged by the entry's priority. A
//! zero-overlap entry scores 0.0 no matter its priority, so priority can only
//! reorder genuine candidates. Ordering is fully deterministic: score
//! descending, then priority descending, then lower id.
//!
//! `AppState` holds an `Arc<dyn Matcher>` so the scoring backend can be
//! swapped without touching handlers.

use std::cmp::Ordering;
use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::knowledge::normalize::normalize;
use crate::models::knowledge::KnowledgeEntryRow;

/// Priority is clamped to this ceiling before boosting.
pub const MAX_PRIORITY: i32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum final score for `best_match` to return an entry.
    pub threshold: f64,
    /// Weight of the priority nudge: `final = overlap + (priority/10) * weight`.
    pub priority_boost_weight: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            priority_boost_weight: 0.1,
        }
    }
}

/// A knowledge entry ranked against a query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMatch {
    pub entry: KnowledgeEntryRow,
    /// Final score: overlap plus priority boost (0.0 when overlap is 0.0).
    pub score: f64,
    /// Raw token overlap in [0, 1].
    pub overlap: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The matcher seam. Implement this to swap scoring backends without touching
/// the chat handlers.
#[async_trait]
pub trait Matcher: Send + Sync {
    async fn best_match(
        &self,
        message: &str,
        entries: &[KnowledgeEntryRow],
    ) -> Option<ScoredMatch>;
}

/// Default token-overlap matcher. Fast, deterministic, no external calls.
pub struct KeywordMatcher {
    config: MatchConfig,
}

impl KeywordMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Matcher for KeywordMatcher {
    async fn best_match(
        &self,
        message: &str,
        entries: &[KnowledgeEntryRow],
    ) -> Option<ScoredMatch> {
        best_match(&normalize(message), entries, &self.config)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Token overlap between the query and the union of the entry's normalized
/// question and keyword tokens, over the distinct query token count.
///
/// Query length as denominator keeps precise keyword hits valuable even when
/// the entry text is long.
pub fn overlap_score(query_tokens: &[String], entry: &KnowledgeEntryRow) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let mut entry_tokens: HashSet<String> = normalize(&entry.question).into_iter().collect();
    for keyword in &entry.keywords {
        entry_tokens.extend(normalize(keyword));
    }
    if entry_tokens.is_empty() {
        return 0.0;
    }

    let query_set: HashSet<&String> = query_tokens.iter().collect();
    let shared = query_set
        .iter()
        .filter(|token| entry_tokens.contains(token.as_str()))
        .count();

    (shared as f64 / query_set.len() as f64).clamp(0.0, 1.0)
}

/// Applies the priority boost. Zero overlap stays zero regardless of priority.
pub fn final_score(overlap: f64, priority: i32, config: &MatchConfig) -> f64 {
    if overlap <= 0.0 {
        return 0.0;
    }
    overlap + (priority.clamp(0, MAX_PRIORITY) as f64 / MAX_PRIORITY as f64)
        * config.priority_boost_weight
}

/// Scores all active entries against the query tokens and returns them ranked.
/// Inactive entries are excluded before scoring, not merely scored low.
pub fn rank(
    query_tokens: &[String],
    entries: &[KnowledgeEntryRow],
    config: &MatchConfig,
) -> Vec<ScoredMatch> {
    let mut ranked: Vec<ScoredMatch> = entries
        .iter()
        .filter(|entry| entry.is_active)
        .map(|entry| {
            let overlap = overlap_score(query_tokens, entry);
            ScoredMatch {
                score: final_score(overlap, entry.priority, config),
                overlap,
                entry: entry.clone(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.entry.priority.cmp(&a.entry.priority))
            .then_with(|| a.entry.id.cmp(&b.entry.id))
    });

    ranked
}

/// Returns the top-ranked entry if it overlaps the query at all and its final
/// score clears the threshold. Empty query tokens or an empty entry set is a
/// normal "no knowledge available" outcome, never an error.
pub fn best_match(
    query_tokens: &[String],
    entries: &[KnowledgeEntryRow],
    config: &MatchConfig,
) -> Option<ScoredMatch> {
    if query_tokens.is_empty() {
        return None;
    }
    rank(query_tokens, entries, config)
        .into_iter()
        .next()
        .filter(|m| m.overlap > 0.0 && m.score >= config.threshold)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_entry(
        id: i64,
        question: &str,
        keywords: &[&str],
        priority: i32,
        is_active: bool,
    ) -> KnowledgeEntryRow {
        KnowledgeEntryRow {
            id,
            category: "brand".to_string(),
            question: question.to_string(),
            answer: format!("answer for entry {id}"),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            priority,
            is_active,
            usage_count: 0,
            last_used_at: None,
            created_at: Utc::now(),
        }
    }

    fn tokens(text: &str) -> Vec<String> {
        normalize(text)
    }

    #[test]
    fn test_no_match_on_empty_store() {
        let result = best_match(&tokens("any question"), &[], &MatchConfig::default());
        assert!(result.is_none());
    }

    #[test]
    fn test_no_match_on_empty_query_tokens() {
        let entries = vec![make_entry(1, "What is the mission?", &[], 10, true)];
        assert!(best_match(&[], &entries, &MatchConfig::default()).is_none());
    }

    #[test]
    fn test_perfect_overlap_scores_one() {
        let entry = make_entry(1, "somatic restoration", &[], 0, true);
        let overlap = overlap_score(&tokens("somatic restoration"), &entry);
        assert!((overlap - 1.0).abs() < f64::EPSILON, "got {overlap}");
    }

    #[test]
    fn test_overlap_uses_query_length_as_denominator() {
        // 1 of 2 query tokens hits → 0.5, even though the entry is short
        let entry = make_entry(1, "retreat", &[], 0, true);
        let overlap = overlap_score(&tokens("retreat pricing"), &entry);
        assert!((overlap - 0.5).abs() < f64::EPSILON, "got {overlap}");
    }

    #[test]
    fn test_keywords_count_toward_overlap() {
        let entry = make_entry(1, "unrelated text", &["sovereignty", "leadership"], 0, true);
        let overlap = overlap_score(&tokens("leadership sovereignty"), &entry);
        assert!((overlap - 1.0).abs() < f64::EPSILON, "got {overlap}");
    }

    #[test]
    fn test_inactive_entry_never_returned() {
        // Perfect keyword overlap, but inactive
        let entries = vec![make_entry(1, "What is the mission?", &["mission"], 10, false)];
        let result = best_match(&tokens("mission"), &entries, &MatchConfig::default());
        assert!(result.is_none());
    }

    #[test]
    fn test_zero_overlap_entry_scores_zero_despite_priority() {
        let config = MatchConfig::default();
        assert_eq!(final_score(0.0, 10, &config), 0.0);
    }

    #[test]
    fn test_priority_boost_nudges_close_matches() {
        let config = MatchConfig::default();
        let low = final_score(0.5, 0, &config);
        let high = final_score(0.5, 10, &config);
        assert!((low - 0.5).abs() < f64::EPSILON);
        assert!((high - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_priority_clamped_before_boost() {
        let config = MatchConfig::default();
        assert_eq!(final_score(0.5, 25, &config), final_score(0.5, 10, &config));
        assert_eq!(final_score(0.5, -3, &config), final_score(0.5, 0, &config));
    }

    #[test]
    fn test_zero_overlap_never_outranks_nonzero() {
        let entries = vec![
            make_entry(1, "shipping and returns", &[], 10, true),
            make_entry(2, "membership pricing", &["pricing"], 0, true),
        ];
        let ranked = rank(&tokens("pricing"), &entries, &MatchConfig::default());
        assert_eq!(ranked[0].entry.id, 2);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_tie_break_prefers_higher_priority() {
        // Same overlap, different priority, boost disabled so scores tie
        let config = MatchConfig {
            threshold: 0.3,
            priority_boost_weight: 0.0,
        };
        let entries = vec![
            make_entry(1, "community circle", &[], 2, true),
            make_entry(2, "community circle", &[], 7, true),
        ];
        let ranked = rank(&tokens("community circle"), &entries, &config);
        assert_eq!(ranked[0].entry.id, 2);
    }

    #[test]
    fn test_tie_break_prefers_lower_id() {
        let entries = vec![
            make_entry(9, "community circle", &[], 5, true),
            make_entry(3, "community circle", &[], 5, true),
        ];
        // Identical overlap and priority → lower id wins, repeatably
        for _ in 0..10 {
            let ranked = rank(&tokens("community circle"), &entries, &MatchConfig::default());
            assert_eq!(ranked[0].entry.id, 3);
        }
    }

    #[test]
    fn test_threshold_gate_inclusive() {
        let config = MatchConfig {
            threshold: 0.5,
            priority_boost_weight: 0.0,
        };
        // 1 of 2 tokens → exactly 0.5, which passes (≥)
        let entries = vec![make_entry(1, "retreat", &[], 0, true)];
        assert!(best_match(&tokens("retreat pricing"), &entries, &config).is_some());

        // 1 of 5 tokens → 0.2, below threshold
        let entries = vec![make_entry(1, "retreat", &[], 0, true)];
        let result = best_match(
            &tokens("retreat pricing schedule location details"),
            &entries,
            &config,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_mission_query_matches_brand_entry() {
        let entries = vec![make_entry(
            1,
            "What is Just Empower?",
            &["empowerment", "mission"],
            5,
            true,
        )];
        let result = best_match(
            &tokens("Tell me about Just Empower's mission"),
            &entries,
            &MatchConfig::default(),
        )
        .expect("mission query should match the brand entry");
        assert_eq!(result.entry.id, 1);
        assert!(result.score >= 0.3, "score was {}", result.score);
    }

    #[test]
    fn test_weather_query_matches_nothing() {
        let entries = vec![make_entry(
            1,
            "What is Just Empower?",
            &["empowerment", "mission"],
            10,
            true,
        )];
        let result = best_match(
            &tokens("What's the weather today?"),
            &entries,
            &MatchConfig::default(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_rank_is_deterministic_across_runs() {
        let entries = vec![
            make_entry(4, "nervous system regulation", &["somatic"], 3, true),
            make_entry(2, "somatic restoration practice", &[], 3, true),
            make_entry(7, "archetypal embodiment", &["somatic", "practice"], 3, true),
        ];
        let first: Vec<i64> = rank(&tokens("somatic practice"), &entries, &MatchConfig::default())
            .iter()
            .map(|m| m.entry.id)
            .collect();
        for _ in 0..5 {
            let again: Vec<i64> =
                rank(&tokens("somatic practice"), &entries, &MatchConfig::default())
                    .iter()
                    .map(|m| m.entry.id)
                    .collect();
            assert_eq!(first, again);
        }
    }
}
