//! # Discovery
//!
//! Fetches raw provider candidates around an origin and ranks them locally.
//!
//! The server returns every candidate in range, unordered. Filtering,
//! ordering and pagination are applied client-side by [`rank_nearby`], so
//! paging through results does not hit the network again unless the
//! caller asks for a fresh search.

use crate::application::result::RemoteResult;
use crate::application::services::nearby_ranking::{RankedResult, SearchFilter, rank_nearby};
use crate::domain::entities::ProviderCandidate;
use crate::domain::value_objects::Coordinate;
use crate::infrastructure::http::ApiClient;
use std::num::NonZeroUsize;

/// Endpoint returning raw candidates around a point.
const NEARBY_PATH: &str = "providers/nearby";

/// Nearby provider search.
#[derive(Debug, Clone)]
pub struct DiscoveryService {
    client: ApiClient,
    default_page_size: NonZeroUsize,
}

impl DiscoveryService {
    /// Creates a service that pages results `default_page_size` at a time
    /// unless a filter says otherwise.
    #[must_use]
    pub fn new(client: ApiClient, default_page_size: NonZeroUsize) -> Self {
        Self {
            client,
            default_page_size,
        }
    }

    /// Returns an unrestricted filter using the configured page size.
    #[must_use]
    pub fn default_filter(&self) -> SearchFilter {
        SearchFilter::default().with_limit(self.default_page_size)
    }

    /// Fetches candidates around `origin` and returns the requested page.
    ///
    /// The procedure filter is also sent to the server so it can narrow the
    /// payload; the local ranker applies it again regardless.
    pub async fn search_nearby(
        &self,
        origin: Coordinate,
        filter: &SearchFilter,
    ) -> RemoteResult<RankedResult> {
        let mut params = vec![
            ("lat", origin.latitude().to_string()),
            ("lon", origin.longitude().to_string()),
        ];
        if let Some(procedure) = &filter.procedure_id {
            params.push(("procedureId", procedure.to_string()));
        }

        let candidates: RemoteResult<Vec<ProviderCandidate>> =
            self.client.get_with_params(NEARBY_PATH, &params).await;
        candidates.map(|candidates| rank_nearby(origin, &candidates, filter))
    }
}
