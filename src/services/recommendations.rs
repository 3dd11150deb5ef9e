use crate::{
    error::AppResult,
    models::{ContentFilter, MediaItem, Page, RecommendationResult},
    services::{
        catalog,
        providers::MetadataProvider,
        scorer::{merge_candidates, GenreTable, Scorer},
    },
};
use std::sync::Arc;

/// Generates "more like this" recommendations for a title
///
/// Candidates come from two upstream lists for the reference title: the
/// provider's "similar" list and its "recommendations" list (first page of
/// each). Both are requested concurrently with the genre table, merged and
/// deduplicated, then ranked by the Scorer.
///
/// Upstream failures never reach the caller: a failed list counts as empty, so
/// a fully failed fetch yields no recommendations.
#[derive(Clone)]
pub struct RecommendationService {
    provider: Arc<dyn MetadataProvider>,
    scorer: Scorer,
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn MetadataProvider>, scorer: Scorer) -> Self {
        Self { provider, scorer }
    }

    pub async fn recommend(
        &self,
        reference: &MediaItem,
        filter: ContentFilter,
        limit: usize,
    ) -> Vec<RecommendationResult> {
        if limit == 0 {
            return Vec::new();
        }

        let (similar, recommended, genres) = tokio::join!(
            self.provider.similar(reference.kind, reference.id, 1),
            self.provider.recommended(reference.kind, reference.id, 1),
            catalog::genres(self.provider.as_ref()),
        );

        let similar = self.or_empty("similar", reference, similar);
        let recommended = self.or_empty("recommended", reference, recommended);

        let candidates = merge_candidates([&similar, &recommended]);
        let genres = GenreTable::new(genres);

        let results = self
            .scorer
            .rank(reference, &candidates, &genres, filter, limit);

        tracing::info!(
            media_id = reference.id,
            kind = %reference.kind,
            similar = similar.len(),
            recommended = recommended.len(),
            candidates = candidates.len(),
            returned = results.len(),
            "Recommendations generated"
        );

        results
    }

    fn or_empty(
        &self,
        source: &'static str,
        reference: &MediaItem,
        result: AppResult<Page<MediaItem>>,
    ) -> Vec<MediaItem> {
        match result {
            Ok(page) => page.results,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    source = source,
                    media_id = reference.id,
                    provider = self.provider.name(),
                    "Candidate fetch failed"
                );
                Vec::new()
            }
        }
    }
}
