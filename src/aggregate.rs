use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::MediaItem;
use crate::plan::{CollectionPlan, Ranking};
use crate::relevance::Scorer;
use crate::tmdb::TmdbApi;

/// Runs every step of `plan` one page at a time and returns the merged list,
/// unique by id and ranked according to the plan.
///
/// A failing page contributes nothing; the aggregation itself never fails.
pub async fn aggregate(tmdb: &dyn TmdbApi, plan: &CollectionPlan) -> Vec<MediaItem> {
    let mut merged = Vec::new();
    let scorer = match &plan.ranking {
        Ranking::Relevance { query } => Some(Scorer::new(query)),
        Ranking::Popularity => None,
    };

    for step in &plan.steps {
        let kind = step.source.kind();
        for page in step.pages.clone() {
            let items = match tmdb.fetch_page(&step.source, page).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Page {} of {} failed, skipping: {:#}", page, step.source, e);
                    continue;
                }
            };
            debug!("{} page {} -> {} items", step.source, page, items.len());
            merged.extend(items.into_iter().map(|mut item| {
                if let Some(kind) = kind {
                    item.media_type = Some(kind.into());
                }
                if let Some(scorer) = &scorer {
                    item.relevance_score = Some(scorer.score(item.label()));
                }
                item
            }));
        }
    }

    let mut unique = dedupe_by_id(merged);
    match plan.ranking {
        Ranking::Popularity => sort_by_popularity(&mut unique),
        Ranking::Relevance { .. } => sort_by_relevance(&mut unique),
    }
    unique
}

/// Later duplicates replace the earlier value but keep its position.
pub fn dedupe_by_id(items: Vec<MediaItem>) -> Vec<MediaItem> {
    let mut slots: HashMap<i64, usize> = HashMap::with_capacity(items.len());
    let mut out: Vec<MediaItem> = Vec::with_capacity(items.len());
    for item in items {
        match slots.get(&item.id) {
            Some(&idx) => out[idx] = item,
            None => {
                slots.insert(item.id, out.len());
                out.push(item);
            }
        }
    }
    out
}

pub fn sort_by_popularity(items: &mut [MediaItem]) {
    items.sort_by(|a, b| b.popularity_or_zero().total_cmp(&a.popularity_or_zero()));
}

pub fn sort_by_relevance(items: &mut [MediaItem]) {
    items.sort_by(|a, b| {
        b.relevance_score
            .unwrap_or(0)
            .cmp(&a.relevance_score.unwrap_or(0))
            .then_with(|| b.popularity_or_zero().total_cmp(&a.popularity_or_zero()))
    });
}
