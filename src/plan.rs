//! Fixed page plans for every aggregated route.
//!
//! Each route is a list of `(source, pages)` steps fed to
//! [`crate::aggregate::aggregate`]. Page counts are tuning constants.

use std::ops::RangeInclusive;

use crate::models::MediaKind;
use crate::tmdb::Source;

pub const ANIMATION_GENRE_ID: i64 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    pub source: Source,
    pub pages: RangeInclusive<u32>,
}

impl PlanStep {
    fn new(source: Source, pages: RangeInclusive<u32>) -> Self {
        Self { source, pages }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    Popularity,
    Relevance { query: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPlan {
    pub label: String,
    pub steps: Vec<PlanStep>,
    pub ranking: Ranking,
}

impl CollectionPlan {
    fn by_popularity(label: impl Into<String>, steps: Vec<PlanStep>) -> Self {
        Self {
            label: label.into(),
            steps,
            ranking: Ranking::Popularity,
        }
    }

    /// Trending for any upstream type. Movie and TV also pull in their
    /// popular (and, for movies, top-rated) first pages.
    pub fn trending(segment: &str) -> Self {
        let mut steps = vec![PlanStep::new(Source::trending(segment), 1..=2)];
        match segment.parse::<MediaKind>() {
            Ok(MediaKind::Movie) => {
                steps.push(PlanStep::new(Source::Popular(MediaKind::Movie), 1..=1));
                steps.push(PlanStep::new(Source::TopRated(MediaKind::Movie), 1..=1));
            }
            Ok(MediaKind::Tv) => {
                steps.push(PlanStep::new(Source::Popular(MediaKind::Tv), 1..=1));
            }
            Err(_) => {}
        }
        Self::by_popularity(format!("trending {segment}"), steps)
    }

    pub fn movie_genre(genre_id: i64) -> Self {
        Self::by_popularity(
            format!("movies for genre {genre_id}"),
            vec![PlanStep::new(
                Source::Discover {
                    kind: MediaKind::Movie,
                    genre_id,
                },
                1..=3,
            )],
        )
    }

    pub fn movie_collection() -> Self {
        Self::by_popularity(
            "movie collection",
            vec![
                PlanStep::new(Source::Popular(MediaKind::Movie), 1..=5),
                PlanStep::new(Source::TopRated(MediaKind::Movie), 1..=3),
                PlanStep::new(Source::NowPlaying, 1..=2),
                PlanStep::new(Source::Upcoming, 1..=2),
            ],
        )
    }

    pub fn tv_collection() -> Self {
        Self::by_popularity(
            "TV collection",
            vec![
                PlanStep::new(Source::Popular(MediaKind::Tv), 1..=4),
                PlanStep::new(Source::TopRated(MediaKind::Tv), 1..=3),
                PlanStep::new(Source::AiringToday, 1..=2),
            ],
        )
    }

    pub fn anime_collection() -> Self {
        Self::by_popularity(
            "anime collection",
            vec![
                PlanStep::new(
                    Source::Discover {
                        kind: MediaKind::Tv,
                        genre_id: ANIMATION_GENRE_ID,
                    },
                    1..=5,
                ),
                PlanStep::new(
                    Source::Discover {
                        kind: MediaKind::Movie,
                        genre_id: ANIMATION_GENRE_ID,
                    },
                    1..=2,
                ),
            ],
        )
    }

    pub fn search(query: &str) -> Self {
        let search = |kind| Source::Search {
            kind,
            query: query.to_string(),
        };
        Self {
            label: format!("search '{query}'"),
            steps: vec![
                PlanStep::new(search(MediaKind::Movie), 1..=2),
                PlanStep::new(search(MediaKind::Tv), 1..=1),
            ],
            ranking: Ranking::Relevance {
                query: query.to_string(),
            },
        }
    }

    pub fn request_count(&self) -> usize {
        self.steps.iter().map(|s| s.pages.clone().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_budgets_per_route() {
        assert_eq!(CollectionPlan::trending("movie").request_count(), 4);
        assert_eq!(CollectionPlan::trending("tv").request_count(), 3);
        assert_eq!(CollectionPlan::trending("all").request_count(), 2);
        assert_eq!(CollectionPlan::movie_genre(28).request_count(), 3);
        assert_eq!(CollectionPlan::movie_collection().request_count(), 12);
        assert_eq!(CollectionPlan::tv_collection().request_count(), 9);
        assert_eq!(CollectionPlan::anime_collection().request_count(), 7);
        assert_eq!(CollectionPlan::search("dune").request_count(), 3);
    }

    #[test]
    fn anime_plan_spans_both_kinds() {
        let plan = CollectionPlan::anime_collection();
        let kinds: Vec<_> = plan.steps.iter().map(|s| s.source.kind()).collect();
        assert_eq!(kinds, vec![Some(MediaKind::Tv), Some(MediaKind::Movie)]);
        assert!(plan.steps.iter().all(|s| matches!(
            s.source,
            Source::Discover {
                genre_id: ANIMATION_GENRE_ID,
                ..
            }
        )));
    }

    #[test]
    fn only_search_ranks_by_relevance() {
        assert_eq!(
            CollectionPlan::search("alien").ranking,
            Ranking::Relevance {
                query: "alien".to_string()
            }
        );
        assert_eq!(CollectionPlan::tv_collection().ranking, Ranking::Popularity);
    }
}
