/// Content-based similarity scoring
///
/// Ranks candidate titles against a reference title with a weighted sum of five
/// factors (genre overlap, rating proximity, release-year proximity, popularity
/// and synopsis word overlap) and explains each pick in plain words.
///
/// Scoring is pure and synchronous. Incomplete records never fail: missing
/// values fall back to neutral defaults.
use crate::models::{ContentFilter, FactorScores, Genre, MediaItem, RecommendationResult};
use std::collections::{HashMap, HashSet};

const MAX_RATING_DIFFERENCE: f64 = 10.0;
const HIGHER_RATING_BONUS: f64 = 1.1;
const MAX_YEAR_DIFFERENCE: f64 = 20.0;
const NEUTRAL_YEAR_SCORE: f64 = 0.5;
const POPULARITY_CEILING: f64 = 1000.0;
const MIN_KEYWORD_CHARS: usize = 4;

const GENRE_REASON_THRESHOLD: f64 = 0.5;
const RATING_REASON_THRESHOLD: f64 = 0.7;
const HIGHLY_RATED: f64 = 7.0;
const YEAR_REASON_THRESHOLD: f64 = 0.8;
const POPULARITY_REASON_THRESHOLD: f64 = 0.7;
const KEYWORD_REASON_THRESHOLD: f64 = 0.3;

pub const FALLBACK_REASON: &str = "AI recommendation based on your selection";

/// Relative importance of each factor. The defaults sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub genre: f64,
    pub rating: f64,
    pub year: f64,
    pub popularity: f64,
    pub keywords: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            genre: 0.40,
            rating: 0.25,
            year: 0.10,
            popularity: 0.15,
            keywords: 0.10,
        }
    }
}

/// Genre id to display name lookup
#[derive(Debug, Clone, Default)]
pub struct GenreTable {
    names: HashMap<u32, String>,
}

impl GenreTable {
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Self {
        Self {
            names: genres.into_iter().map(|g| (g.id, g.name)).collect(),
        }
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    weights: Weights,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: Weights) -> Self {
        Self { weights }
    }

    /// Score `candidates` against `reference` and return the best `limit` of them.
    pub fn score(
        &self,
        reference: &MediaItem,
        candidates: &[MediaItem],
        genres: &GenreTable,
        limit: usize,
    ) -> Vec<RecommendationResult> {
        self.rank(reference, candidates, genres, ContentFilter::All, limit)
    }

    /// Score, keep the kinds `filter` allows, then cut to `limit`.
    ///
    /// Candidates are deduplicated by id first. Results are ordered by score,
    /// highest first; equal scores keep their input order.
    pub fn rank(
        &self,
        reference: &MediaItem,
        candidates: &[MediaItem],
        genres: &GenreTable,
        filter: ContentFilter,
        limit: usize,
    ) -> Vec<RecommendationResult> {
        if limit == 0 || candidates.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<RecommendationResult> = merge_candidates([candidates])
            .into_iter()
            .map(|candidate| self.evaluate(reference, candidate, genres))
            .filter(|result| filter.matches(result.item.kind))
            .collect();

        // sort_by is stable, so ties stay in input order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);

        tracing::debug!(
            reference_id = reference.id,
            candidates = candidates.len(),
            returned = results.len(),
            "Scored candidates"
        );

        results
    }

    /// Score a single candidate
    pub fn evaluate(
        &self,
        reference: &MediaItem,
        candidate: MediaItem,
        genres: &GenreTable,
    ) -> RecommendationResult {
        let factors = self.factor_scores(reference, &candidate);
        let reasons = justify(reference, &candidate, &factors, genres);

        RecommendationResult {
            score: round_to_cents(self.weighted_total(&factors)),
            item: candidate,
            reasons,
            factors,
        }
    }

    pub fn factor_scores(&self, reference: &MediaItem, candidate: &MediaItem) -> FactorScores {
        FactorScores {
            genre: genre_score(reference, candidate),
            rating: rating_score(reference, candidate),
            year: year_score(reference, candidate),
            popularity: popularity_score(candidate),
            keywords: keyword_score(reference, candidate),
        }
    }

    /// Unrounded weighted sum of the factors
    pub fn weighted_total(&self, factors: &FactorScores) -> f64 {
        factors.genre * self.weights.genre
            + factors.rating * self.weights.rating
            + factors.year * self.weights.year
            + factors.popularity * self.weights.popularity
            + factors.keywords * self.weights.keywords
    }
}

/// Concatenate candidate lists, keeping only the first occurrence of each id.
pub fn merge_candidates<'a, I, L>(lists: I) -> Vec<MediaItem>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = &'a MediaItem>,
{
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|item| seen.insert(item.id))
        .cloned()
        .collect()
}

fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Jaccard index of the two genre sets
pub fn genre_score(reference: &MediaItem, candidate: &MediaItem) -> f64 {
    if reference.genre_ids.is_empty() || candidate.genre_ids.is_empty() {
        return 0.0;
    }

    let a: HashSet<u32> = reference.genre_ids.iter().copied().collect();
    let b: HashSet<u32> = candidate.genre_ids.iter().copied().collect();
    jaccard(&a, &b)
}

/// Closeness of ratings; a candidate rated above the reference gets a 10% bonus.
/// Always within [0, 1], even for ratings outside the 0-10 scale.
pub fn rating_score(reference: &MediaItem, candidate: &MediaItem) -> f64 {
    let difference = (reference.rating - candidate.rating).abs();
    let mut score = 1.0 - difference / MAX_RATING_DIFFERENCE;

    if candidate.rating > reference.rating {
        score *= HIGHER_RATING_BONUS;
    }

    score.clamp(0.0, 1.0)
}

/// Linear falloff over 20 years; 0.5 when either year is unknown
pub fn year_score(reference: &MediaItem, candidate: &MediaItem) -> f64 {
    match (reference.year(), candidate.year()) {
        (Some(a), Some(b)) => {
            let difference = (i64::from(a) - i64::from(b)).abs() as f64;
            (1.0 - difference / MAX_YEAR_DIFFERENCE).max(0.0)
        }
        _ => NEUTRAL_YEAR_SCORE,
    }
}

/// Candidate popularity against a fixed ceiling of 1000
pub fn popularity_score(candidate: &MediaItem) -> f64 {
    (candidate.popularity / POPULARITY_CEILING).clamp(0.0, 1.0)
}

fn keywords(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// Jaccard index over the synopsis words longer than three characters
pub fn keyword_score(reference: &MediaItem, candidate: &MediaItem) -> f64 {
    if reference.overview.is_empty() || candidate.overview.is_empty() {
        return 0.0;
    }

    jaccard(&keywords(&reference.overview), &keywords(&candidate.overview))
}

fn shared_genre_names(
    reference: &MediaItem,
    candidate: &MediaItem,
    genres: &GenreTable,
) -> Vec<String> {
    let candidate_genres: HashSet<u32> = candidate.genre_ids.iter().copied().collect();
    let mut seen = HashSet::new();

    reference
        .genre_ids
        .iter()
        .filter(|id| seen.insert(**id) && candidate_genres.contains(*id))
        .filter_map(|id| genres.name(*id))
        .map(str::to_string)
        .collect()
}

/// Human-readable reasons for a pick. Never empty.
pub fn justify(
    reference: &MediaItem,
    candidate: &MediaItem,
    factors: &FactorScores,
    genres: &GenreTable,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if factors.genre > GENRE_REASON_THRESHOLD {
        let shared = shared_genre_names(reference, candidate, genres);
        if !shared.is_empty() {
            reasons.push(format!("Similar genres: {}", shared.join(", ")));
        }
    }

    if factors.rating > RATING_REASON_THRESHOLD && candidate.rating >= HIGHLY_RATED {
        reasons.push(format!("Highly rated ({}/10)", one_decimal(candidate.rating)));
    }

    if factors.year > YEAR_REASON_THRESHOLD {
        reasons.push("From similar time period".to_string());
    }

    if factors.popularity > POPULARITY_REASON_THRESHOLD {
        reasons.push("Popular choice among viewers".to_string());
    }

    if factors.keywords > KEYWORD_REASON_THRESHOLD {
        reasons.push("Similar themes and content".to_string());
    }

    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }

    reasons
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One decimal place, halves rounded up (8.25 -> "8.3")
fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;

    fn item(id: u64) -> MediaItem {
        MediaItem {
            id,
            kind: MediaKind::Movie,
            title: format!("Title {}", id),
            overview: String::new(),
            genre_ids: vec![],
            rating: 0.0,
            vote_count: 0,
            popularity: 0.0,
            release_date: None,
            poster_path: None,
            backdrop_path: None,
            original_language: "en".to_string(),
        }
    }

    fn full_item(
        id: u64,
        genres: &[u32],
        rating: f64,
        year: i32,
        popularity: f64,
        overview: &str,
    ) -> MediaItem {
        MediaItem {
            genre_ids: genres.to_vec(),
            rating,
            release_date: Some(format!("{}-06-01", year)),
            popularity,
            overview: overview.to_string(),
            ..item(id)
        }
    }

    fn genre_table() -> GenreTable {
        GenreTable::new(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 12,
                name: "Adventure".to_string(),
            },
            Genre {
                id: 18,
                name: "Drama".to_string(),
            },
        ])
    }

    fn hero() -> MediaItem {
        full_item(1, &[28, 12], 8.0, 2020, 500.0, "A hero saves the world")
    }

    #[test]
    fn test_identical_items_max_out_similarity_factors() {
        let reference = hero();
        let factors = Scorer::new().factor_scores(&reference, &reference);

        assert_eq!(factors.genre, 1.0);
        assert_eq!(factors.keywords, 1.0);
        assert_eq!(factors.year, 1.0);
        assert_eq!(factors.rating, 1.0);
    }

    #[test]
    fn test_disjoint_genres_score_zero() {
        let a = MediaItem {
            genre_ids: vec![28, 12],
            ..item(1)
        };
        let b = MediaItem {
            genre_ids: vec![18, 35],
            ..item(2)
        };
        assert_eq!(genre_score(&a, &b), 0.0);
    }

    #[test]
    fn test_genre_jaccard() {
        let a = MediaItem {
            genre_ids: vec![28, 12, 878],
            ..item(1)
        };
        let b = MediaItem {
            genre_ids: vec![28, 12, 18, 18],
            ..item(2)
        };
        // {28, 12} / {28, 12, 878, 18}
        assert_eq!(genre_score(&a, &b), 0.5);
    }

    #[test]
    fn test_empty_genres_score_zero() {
        let a = MediaItem {
            genre_ids: vec![28],
            ..item(1)
        };
        assert_eq!(genre_score(&a, &item(2)), 0.0);
        assert_eq!(genre_score(&item(2), &item(3)), 0.0);
    }

    #[test]
    fn test_rating_proximity() {
        let a = MediaItem {
            rating: 8.0,
            ..item(1)
        };
        let b = MediaItem {
            rating: 3.0,
            ..item(2)
        };
        assert!((rating_score(&a, &b) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_higher_rated_candidate_gets_bonus() {
        let reference = MediaItem {
            rating: 6.0,
            ..item(1)
        };
        let higher = MediaItem {
            rating: 8.0,
            ..item(2)
        };
        let lower = MediaItem {
            rating: 4.0,
            ..item(3)
        };

        // 0.8 * 1.1 versus a plain 0.8
        assert!((rating_score(&reference, &higher) - 0.88).abs() < 1e-9);
        assert!((rating_score(&reference, &lower) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_rating_bonus_is_capped() {
        let reference = MediaItem {
            rating: 8.0,
            ..item(1)
        };
        let candidate = MediaItem {
            rating: 8.5,
            ..item(2)
        };
        // 0.95 * 1.1 would exceed 1
        assert_eq!(rating_score(&reference, &candidate), 1.0);
    }

    #[test]
    fn test_rating_score_never_negative() {
        let reference = MediaItem {
            rating: 25.0,
            ..item(1)
        };
        assert_eq!(rating_score(&reference, &item(2)), 0.0);

        let result = Scorer::new().evaluate(&reference, item(2), &genre_table());
        assert!(result.score >= 0.0);
        assert_eq!(result.factors.rating, 0.0);
    }

    #[test]
    fn test_year_score_extreme_years() {
        let reference = MediaItem {
            release_date: Some("-2147483648".to_string()),
            ..item(1)
        };
        let candidate = MediaItem {
            release_date: Some("2020-01-01".to_string()),
            ..item(2)
        };

        assert_eq!(year_score(&reference, &candidate), 0.0);
        assert_eq!(year_score(&candidate, &reference), 0.0);
    }

    #[test]
    fn test_highly_rated_rounds_halves_up() {
        assert_eq!(one_decimal(8.25), "8.3");
        assert_eq!(one_decimal(7.25), "7.3");
        assert_eq!(one_decimal(8.0), "8.0");

        let reference = MediaItem {
            rating: 8.0,
            ..item(1)
        };
        let candidate = MediaItem {
            rating: 8.25,
            ..item(2)
        };
        let factors = Scorer::new().factor_scores(&reference, &candidate);
        let reasons = justify(&reference, &candidate, &factors, &genre_table());
        assert_eq!(reasons[0], "Highly rated (8.3/10)");
    }

    #[test]
    fn test_year_score_falloff() {
        let a = full_item(1, &[], 0.0, 2000, 0.0, "");
        let b = full_item(2, &[], 0.0, 2010, 0.0, "");
        let c = full_item(3, &[], 0.0, 1970, 0.0, "");

        assert!((year_score(&a, &b) - 0.5).abs() < 1e-9);
        assert_eq!(year_score(&a, &c), 0.0);
    }

    #[test]
    fn test_year_score_neutral_when_unknown() {
        let dated = full_item(1, &[], 0.0, 2000, 0.0, "");
        assert_eq!(year_score(&dated, &item(2)), 0.5);
        assert_eq!(year_score(&item(2), &item(3)), 0.5);
    }

    #[test]
    fn test_popularity_monotonic_and_saturating() {
        let mut previous = 0.0;
        for popularity in [0.0, 1.0, 10.0, 250.0, 999.0, 1000.0] {
            let score = popularity_score(&MediaItem {
                popularity,
                ..item(1)
            });
            assert!(score >= previous);
            previous = score;
        }
        assert_eq!(previous, 1.0);

        for popularity in [1000.5, 5000.0, 1e9] {
            let score = popularity_score(&MediaItem {
                popularity,
                ..item(1)
            });
            assert_eq!(score, 1.0);
        }
    }

    #[test]
    fn test_keyword_score() {
        let a = MediaItem {
            overview: "A hero saves the world".to_string(),
            ..item(1)
        };
        let b = MediaItem {
            overview: "A HERO saves the galaxy".to_string(),
            ..item(2)
        };
        // {hero, saves} / {hero, saves, world, galaxy}
        assert_eq!(keyword_score(&a, &b), 0.5);
    }

    #[test]
    fn test_keyword_score_empty_overview() {
        let a = MediaItem {
            overview: "A hero saves the world".to_string(),
            ..item(1)
        };
        assert_eq!(keyword_score(&a, &item(2)), 0.0);
        assert_eq!(keyword_score(&item(2), &a), 0.0);
    }

    #[test]
    fn test_keyword_score_only_short_words() {
        let a = MediaItem {
            overview: "a cat and a dog".to_string(),
            ..item(1)
        };
        let b = MediaItem {
            overview: "the cat ran".to_string(),
            ..item(2)
        };
        assert_eq!(keyword_score(&a, &b), 0.0);
    }

    #[test]
    fn test_close_match_outranks_distant_one() {
        let reference = hero();
        let close = full_item(2, &[28, 12], 8.0, 2021, 500.0, "A hero saves the galaxy");
        let distant = full_item(3, &[18], 3.0, 1990, 10.0, "A quiet drama");

        let results = Scorer::new().score(
            &reference,
            &[distant.clone(), close.clone()],
            &genre_table(),
            10,
        );

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].item.id, close.id);
        assert_eq!(results[1].item.id, distant.id);
        // 0.40 + 0.25 + 0.095 + 0.075 + 0.05
        assert_eq!(results[0].score, 0.87);
        assert!(results[1].score <= 0.15);
    }

    #[test]
    fn test_close_match_reasons() {
        let reference = hero();
        let close = full_item(2, &[28, 12], 8.0, 2021, 500.0, "A hero saves the galaxy");

        let result = Scorer::new().evaluate(&reference, close, &genre_table());

        assert_eq!(
            result.reasons,
            vec![
                "Similar genres: Action, Adventure".to_string(),
                "Highly rated (8.0/10)".to_string(),
                "From similar time period".to_string(),
                "Similar themes and content".to_string(),
            ]
        );
    }

    #[test]
    fn test_popular_choice_reason() {
        let reference = hero();
        let blockbuster = full_item(2, &[18], 5.0, 1980, 900.0, "");

        let result = Scorer::new().evaluate(&reference, blockbuster, &genre_table());
        assert_eq!(result.reasons, vec!["Popular choice among viewers".to_string()]);
    }

    #[test]
    fn test_unresolved_genre_names_are_skipped() {
        let reference = full_item(1, &[28, 99], 0.0, 2000, 0.0, "");
        let candidate = full_item(2, &[28, 99], 0.0, 1950, 0.0, "");

        let result = Scorer::new().evaluate(&reference, candidate, &genre_table());
        assert_eq!(result.reasons[0], "Similar genres: Action");
    }

    #[test]
    fn test_sparse_records_fall_back() {
        let reference = item(1);
        let candidate = item(2);

        let results = Scorer::new().score(&reference, &[candidate], &GenreTable::default(), 5);

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.factors.genre, 0.0);
        assert_eq!(result.factors.keywords, 0.0);
        assert_eq!(result.factors.year, 0.5);
        assert_eq!(result.factors.popularity, 0.0);
        // equal (absent) ratings count as a perfect rating match
        assert_eq!(result.factors.rating, 1.0);
        assert_eq!(result.score, 0.3);
        assert_eq!(result.reasons, vec![FALLBACK_REASON.to_string()]);
    }

    #[test]
    fn test_sparse_records_with_popularity() {
        let reference = item(1);
        let candidate = MediaItem {
            popularity: 400.0,
            ..item(2)
        };

        let results = Scorer::new().score(&reference, &[candidate], &GenreTable::default(), 5);
        // 0.25 + 0.05 + 0.15 * 0.4
        assert_eq!(results[0].score, 0.36);
    }

    #[test]
    fn test_limit_zero_is_empty() {
        let reference = hero();
        let results = Scorer::new().score(&reference, &[hero()], &genre_table(), 0);
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_candidates() {
        let results = Scorer::new().score(&hero(), &[], &genre_table(), 10);
        assert!(results.is_empty());
    }

    #[test]
    fn test_limit_and_ordering() {
        let reference = hero();
        let candidates: Vec<MediaItem> = (0..20)
            .map(|i| full_item(100 + i, &[28], 5.0, 2000 + i as i32, (i * 40) as f64, ""))
            .collect();

        let results = Scorer::new().score(&reference, &candidates, &genre_table(), 7);

        assert_eq!(results.len(), 7);
        assert!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let reference = hero();
        let candidates = vec![item(10), item(11), item(12)];

        let results = Scorer::new().score(&reference, &candidates, &genre_table(), 10);
        let ids: Vec<u64> = results.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn test_duplicates_are_scored_once() {
        let reference = hero();
        let candidates = vec![item(10), item(11), item(10)];

        let results = Scorer::new().score(&reference, &candidates, &genre_table(), 10);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_merge_candidates_first_occurrence_wins() {
        let similar = vec![
            MediaItem {
                title: "first".to_string(),
                ..item(1)
            },
            item(2),
        ];
        let recommended = vec![
            MediaItem {
                title: "second".to_string(),
                ..item(1)
            },
            item(3),
        ];

        let merged = merge_candidates([&similar, &recommended]);
        let ids: Vec<u64> = merged.iter().map(|i| i.id).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(merged[0].title, "first");
    }

    #[test]
    fn test_filter_applies_before_limit() {
        let reference = hero();
        let mut show = full_item(2, &[18], 2.0, 1960, 0.0, "");
        show.kind = MediaKind::Tv;
        let movies = vec![
            full_item(3, &[28, 12], 8.0, 2020, 500.0, ""),
            full_item(4, &[28, 12], 8.0, 2020, 400.0, ""),
        ];
        let mut candidates = movies.clone();
        candidates.push(show);

        let results = Scorer::new().rank(
            &reference,
            &candidates,
            &genre_table(),
            ContentFilter::Tv,
            1,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item.id, 2);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let reference = full_item(1, &[28], 2.0, 2000, 0.0, "space pirates");
        let candidate = full_item(2, &[28], 10.0, 2000, 5000.0, "space pirates");

        let result = Scorer::new().evaluate(&reference, candidate, &genre_table());
        assert!(result.score >= 0.0 && result.score <= 1.0);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = Weights::default();
        let total = w.genre + w.rating + w.year + w.popularity + w.keywords;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_weights() {
        let scorer = Scorer::with_weights(Weights {
            genre: 1.0,
            rating: 0.0,
            year: 0.0,
            popularity: 0.0,
            keywords: 0.0,
        });
        let reference = hero();
        let result = scorer.evaluate(&reference, hero(), &genre_table());
        assert_eq!(result.score, 1.0);
    }
}
