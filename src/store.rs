//! Interaction store: likes, comments and display name with durable state.
//!
//! The store owns an [`InteractionState`] and a [`Persistence`] backend. Every
//! mutation updates memory first and then writes the affected key back, so a
//! fresh [`InteractionStore::hydrate`] over the same backend reproduces the
//! state. Persisted values that fail to decode are treated as absent.
//!
//! [`InteractionStore::refresh`] reloads likes and comments from the backend
//! and overwrites memory without merging: whatever was persisted last wins.

use crate::error::Result;
use crate::models::{Aggregates, Comment, DEFAULT_DISPLAY_NAME, InteractionState};
use crate::persistence::{COMMENTS_KEY, DISPLAY_NAME_KEY, LIKES_KEY, Persistence};
use crate::utils::{generate_comment_id, truncate_for_log};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

pub struct InteractionStore<P> {
    persistence: P,
    state: InteractionState,
}

impl<P: Persistence> InteractionStore<P> {
    /// Build a store from whatever `persistence` currently holds.
    ///
    /// Missing or corrupt keys fall back to empty maps, and a missing or
    /// blank name falls back to the default display name.
    #[instrument(level = "info", skip_all)]
    pub fn hydrate(persistence: P) -> Self {
        let state = InteractionState {
            like_counts: read_json(&persistence, LIKES_KEY),
            comments_by_article: read_json(&persistence, COMMENTS_KEY),
            display_name: persistence
                .get(DISPLAY_NAME_KEY)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
        };
        let totals = state.aggregates();
        info!(
            total_likes = totals.total_likes,
            total_comments = totals.total_comments,
            display_name = %state.display_name,
            "Hydrated interaction state"
        );
        Self { persistence, state }
    }

    /// Reload likes and comments from persistence, discarding in-memory values.
    #[instrument(level = "info", skip_all)]
    pub fn refresh(&mut self) {
        self.state.like_counts = read_json(&self.persistence, LIKES_KEY);
        self.state.comments_by_article = read_json(&self.persistence, COMMENTS_KEY);
        let totals = self.state.aggregates();
        info!(
            total_likes = totals.total_likes,
            total_comments = totals.total_comments,
            "Refreshed interaction state"
        );
    }

    /// Add one like to `article_id` and return its new count.
    #[instrument(level = "info", skip(self))]
    pub fn like(&mut self, article_id: &str) -> Result<u64> {
        let count = self
            .state
            .like_counts
            .entry(article_id.to_string())
            .or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;

        write_json(&mut self.persistence, LIKES_KEY, &self.state.like_counts)?;
        debug!(count, "Recorded like");
        Ok(count)
    }

    /// Append a comment to `article_id`.
    ///
    /// Returns `None` without touching state when `text` is blank.
    #[instrument(level = "info", skip(self, text), fields(preview = %truncate_for_log(text, 40)))]
    pub fn add_comment(
        &mut self,
        article_id: &str,
        text: &str,
        author: &str,
    ) -> Result<Option<Comment>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank comment");
            return Ok(None);
        }

        let comment = Comment {
            id: generate_comment_id(),
            author: author.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        self.state
            .comments_by_article
            .entry(article_id.to_string())
            .or_default()
            .push(comment.clone());

        write_json(&mut self.persistence, COMMENTS_KEY, &self.state.comments_by_article)?;
        debug!(comment_id = %comment.id, "Recorded comment");
        Ok(Some(comment))
    }

    /// Change the display name used for new comments.
    #[instrument(level = "info", skip(self))]
    pub fn set_display_name(&mut self, name: &str) -> Result<()> {
        self.state.display_name = name.to_string();
        self.persistence.set(DISPLAY_NAME_KEY, name)
    }

    pub fn aggregates(&self) -> Aggregates {
        self.state.aggregates()
    }

    pub fn likes_for(&self, article_id: &str) -> u64 {
        self.state.like_counts.get(article_id).copied().unwrap_or(0)
    }

    pub fn comments_for(&self, article_id: &str) -> &[Comment] {
        self.state
            .comments_by_article
            .get(article_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn display_name(&self) -> &str {
        &self.state.display_name
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }
}

fn write_json<P: Persistence, T: Serialize>(persistence: &mut P, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    persistence.set(key, &json)
}

/// Decode the JSON map under `key`, treating absence or corruption as empty.
fn read_json<P, V>(persistence: &P, key: &str) -> BTreeMap<String, V>
where
    P: Persistence,
    V: DeserializeOwned,
{
    let Some(raw) = persistence.get(key) else {
        return BTreeMap::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, raw = %truncate_for_log(&raw, 120), "Ignoring corrupt persisted value");
        BTreeMap::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FilePersistence, MemoryPersistence};

    fn fresh() -> (InteractionStore<MemoryPersistence>, MemoryPersistence) {
        let backend = MemoryPersistence::new();
        (InteractionStore::hydrate(backend.clone()), backend)
    }

    #[test]
    fn test_hydrate_defaults() {
        let (store, _) = fresh();
        assert_eq!(store.display_name(), "Anonymous User");
        assert_eq!(store.aggregates(), Aggregates::default());
        assert_eq!(store.likes_for("article_1"), 0);
        assert!(store.comments_for("article_1").is_empty());
    }

    #[test]
    fn test_likes_count_every_call() {
        let (mut store, _) = fresh();
        store.like("A").unwrap();
        store.like("A").unwrap();
        assert_eq!(store.like("A").unwrap(), 3);
        store.like("B").unwrap();

        assert_eq!(store.likes_for("A"), 3);
        assert_eq!(store.likes_for("B"), 1);
        assert_eq!(store.aggregates().total_likes, 4);
    }

    #[test]
    fn test_like_is_persisted_immediately() {
        let (mut store, backend) = fresh();
        store.like("article_7").unwrap();
        assert_eq!(backend.get(LIKES_KEY).as_deref(), Some(r#"{"article_7":1}"#));
    }

    #[test]
    fn test_blank_comment_rejected() {
        let (mut store, backend) = fresh();
        assert!(store.add_comment("A", "   ", "x").unwrap().is_none());
        assert!(store.comments_for("A").is_empty());
        assert_eq!(backend.get(COMMENTS_KEY), None);

        let comment = store.add_comment("A", "hi", "x").unwrap().unwrap();
        assert_eq!(comment.text, "hi");
        assert_eq!(comment.author, "x");
        assert_eq!(store.comments_for("A"), &[comment]);
        assert_eq!(store.aggregates().total_comments, 1);
    }

    #[test]
    fn test_comment_text_is_trimmed() {
        let (mut store, _) = fresh();
        let comment = store.add_comment("A", "  great read \n", "x").unwrap().unwrap();
        assert_eq!(comment.text, "great read");
    }

    #[test]
    fn test_comments_append_in_order_with_unique_ids() {
        let (mut store, _) = fresh();
        for i in 0..5 {
            store.add_comment("A", &format!("c{i}"), "x").unwrap();
        }
        let texts: Vec<_> = store.comments_for("A").iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["c0", "c1", "c2", "c3", "c4"]);

        let mut ids: Vec<_> = store.comments_for("A").iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_display_name_does_not_rewrite_comments() {
        let (mut store, backend) = fresh();
        let author = store.display_name().to_string();
        store.add_comment("A", "first", &author).unwrap();
        store.set_display_name("Ada").unwrap();
        store.add_comment("A", "second", "Ada").unwrap();

        assert_eq!(backend.get(DISPLAY_NAME_KEY).as_deref(), Some("Ada"));
        let authors: Vec<_> = store.comments_for("A").iter().map(|c| c.author.as_str()).collect();
        assert_eq!(authors, vec!["Anonymous User", "Ada"]);
    }

    #[test]
    fn test_round_trip_through_fresh_hydrate() {
        let (mut store, backend) = fresh();
        store.like("A").unwrap();
        store.like("A").unwrap();
        store.like("B").unwrap();
        store.add_comment("A", "hello", "x").unwrap();
        store.add_comment("C", "world", "y").unwrap();
        store.set_display_name("Ada").unwrap();

        let reloaded = InteractionStore::hydrate(backend);
        assert_eq!(reloaded.state(), store.state());
    }

    #[test]
    fn test_round_trip_through_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state.json");
        let mut store = InteractionStore::hydrate(FilePersistence::new(&path));
        store.like("article_1").unwrap();
        store.add_comment("article_1", "on disk", "x").unwrap();

        let reloaded = InteractionStore::hydrate(FilePersistence::new(&path));
        assert_eq!(reloaded.state().like_counts, store.state().like_counts);
        assert_eq!(
            reloaded.state().comments_by_article,
            store.state().comments_by_article
        );
    }

    #[test]
    fn test_corrupt_values_are_treated_as_absent() {
        let mut backend = MemoryPersistence::new();
        backend.set(LIKES_KEY, "{not json").unwrap();
        backend.set(COMMENTS_KEY, r#"{"A":[{"id":1}]}"#).unwrap();
        backend.set(DISPLAY_NAME_KEY, "Ada").unwrap();

        let store = InteractionStore::hydrate(backend);
        assert!(store.state().like_counts.is_empty());
        assert!(store.state().comments_by_article.is_empty());
        assert_eq!(store.display_name(), "Ada");
    }

    #[test]
    fn test_like_totals_saturate_instead_of_overflowing() {
        let mut backend = MemoryPersistence::new();
        backend
            .set(LIKES_KEY, r#"{"A":18446744073709551615,"B":1}"#)
            .unwrap();

        let mut store = InteractionStore::hydrate(backend);
        assert_eq!(store.aggregates().total_likes, u64::MAX);
        assert_eq!(store.like("A").unwrap(), u64::MAX);
        assert_eq!(store.likes_for("A"), u64::MAX);
        assert_eq!(store.like("B").unwrap(), 2);
        assert_eq!(store.aggregates().total_likes, u64::MAX);
    }

    #[test]
    fn test_blank_persisted_name_falls_back_to_default() {
        for saved in ["", "   "] {
            let mut backend = MemoryPersistence::new();
            backend.set(DISPLAY_NAME_KEY, saved).unwrap();
            let store = InteractionStore::hydrate(backend);
            assert_eq!(store.display_name(), DEFAULT_DISPLAY_NAME);
        }
    }

    #[test]
    fn test_like_refuses_to_clobber_undecodable_state_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state.json");
        let original = r#"{"user_name":"Ada","news_comments":"{}","extra":1}"#;
        std::fs::write(&path, original).unwrap();

        let mut store = InteractionStore::hydrate(FilePersistence::new(&path));
        assert!(store.like("A").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_refresh_overwrites_with_persisted_state() {
        let (mut store, mut backend) = fresh();
        store.like("A").unwrap();
        store.set_display_name("Ada").unwrap();

        backend.set(LIKES_KEY, r#"{"A":10,"B":2}"#).unwrap();
        backend.set(COMMENTS_KEY, "{}").unwrap();
        backend.set(DISPLAY_NAME_KEY, "Other").unwrap();
        store.refresh();

        assert_eq!(store.likes_for("A"), 10);
        assert_eq!(store.likes_for("B"), 2);
        assert_eq!(store.aggregates().total_likes, 12);
        assert_eq!(store.display_name(), "Ada");
    }

    #[test]
    fn test_refresh_between_two_file_stores_is_last_write_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state.json");
        let mut first = InteractionStore::hydrate(FilePersistence::new(&path));
        let mut second = InteractionStore::hydrate(FilePersistence::new(&path));

        first.like("A").unwrap();
        second.like("B").unwrap();
        first.refresh();

        assert_eq!(first.likes_for("A"), 0);
        assert_eq!(first.likes_for("B"), 1);
    }
}
