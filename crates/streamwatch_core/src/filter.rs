use std::collections::BTreeSet;

use crate::BroadcastCandidate;

/// Pure qualification predicate over raw catalog entries.
///
/// A candidate qualifies when its game id is watched AND its title contains
/// any configured keyword or any of its tags is a configured tag. Keyword and
/// tag comparisons are case-insensitive; game ids match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFilter {
    game_ids: BTreeSet<String>,
    // Stored lowercased so qualification is a plain substring scan.
    keywords: Vec<String>,
    tags: BTreeSet<String>,
}

impl StreamFilter {
    pub fn new<I, J, K>(game_ids: I, keywords: J, tags: K) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            game_ids: game_ids.into_iter().map(Into::into).collect(),
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
            tags: tags
                .into_iter()
                .map(|t| t.into().to_lowercase())
                .collect(),
        }
    }

    pub fn qualifies(&self, candidate: &BroadcastCandidate) -> bool {
        if !self.game_ids.contains(&candidate.game_id) {
            return false;
        }

        let title = candidate.title.to_lowercase();
        let title_match = self.keywords.iter().any(|keyword| title.contains(keyword));
        let tag_match = candidate
            .tags
            .iter()
            .any(|tag| self.tags.contains(&tag.to_lowercase()));

        title_match || tag_match
    }
}
