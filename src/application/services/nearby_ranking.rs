//! # Nearby Ranking
//!
//! Filters, orders and paginates provider candidates around an origin.
//!
//! [`rank_nearby`] is pure: identical inputs always produce identical
//! pages. Entries are ordered by distance and then by provider id, which
//! gives a total order and therefore stable pagination.
//!
//! # Examples
//!
//! ```
//! use petspot_core::application::services::nearby_ranking::{SearchFilter, rank_nearby};
//! use petspot_core::domain::entities::ProviderCandidate;
//! use petspot_core::domain::value_objects::Coordinate;
//!
//! let origin = Coordinate::new(0.0, 0.0).unwrap();
//! let near_at = Coordinate::new(0.001, 0.0).unwrap();
//! let far_at = Coordinate::new(0.01, 0.0).unwrap();
//! let near = ProviderCandidate::new("v1", "Near", near_at, true, vec![]);
//! let far = ProviderCandidate::new("v2", "Far", far_at, true, vec![]);
//!
//! let ranked = rank_nearby(origin, &[far, near], &SearchFilter::default());
//! assert_eq!(ranked.entries()[0].provider().id().as_str(), "v1");
//! ```

use crate::domain::entities::ProviderCandidate;
use crate::domain::value_objects::{Coordinate, ProcedureId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Filtering and pagination options for a nearby search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilter {
    /// Restrict to providers offering this procedure.
    pub procedure_id: Option<ProcedureId>,
    /// Only keep providers that are open now.
    pub open_now_only: bool,
    /// Only keep providers with at least one offer in stock.
    pub require_stock: bool,
    /// Page size.
    pub limit: NonZeroUsize,
    /// Number of entries to skip.
    pub offset: usize,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            procedure_id: None,
            open_now_only: false,
            require_stock: false,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl SearchFilter {
    /// Creates a filter with no restrictions and the default page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to providers offering `procedure`.
    #[must_use]
    pub fn with_procedure(mut self, procedure: impl Into<ProcedureId>) -> Self {
        self.procedure_id = Some(procedure.into());
        self
    }

    /// Only keeps providers that are open now.
    #[must_use]
    pub fn open_now_only(mut self) -> Self {
        self.open_now_only = true;
        self
    }

    /// Only keeps providers with an offer in stock.
    #[must_use]
    pub fn require_stock(mut self) -> Self {
        self.require_stock = true;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: NonZeroUsize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the number of entries to skip.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Applies the candidate-level filters.
    ///
    /// Returns the candidate as it should be displayed (offers reduced to
    /// the requested procedure), or `None` if it is filtered out. Every
    /// filter looks at the full offer set; the reduction only shapes the
    /// returned entry.
    fn admit(&self, candidate: &ProviderCandidate) -> Option<ProviderCandidate> {
        if self.open_now_only && !candidate.is_open_now() {
            return None;
        }
        if self.require_stock && !candidate.has_stock() {
            return None;
        }

        match &self.procedure_id {
            Some(procedure) if !candidate.offers_procedure(procedure) => None,
            Some(procedure) => Some(candidate.restricted_to(procedure)),
            None => Some(candidate.clone()),
        }
    }
}

/// A provider with its distance from the search origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProvider {
    provider: ProviderCandidate,
    distance_meters: u64,
}

impl RankedProvider {
    /// Creates a ranked entry.
    #[must_use]
    pub fn new(provider: ProviderCandidate, distance_meters: u64) -> Self {
        Self {
            provider,
            distance_meters,
        }
    }

    /// Returns the provider, with offers reduced to the requested procedure.
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &ProviderCandidate {
        &self.provider
    }

    /// Returns the distance from the origin in meters.
    #[inline]
    #[must_use]
    pub fn distance_meters(&self) -> u64 {
        self.distance_meters
    }
}

impl fmt::Display for RankedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m {}", self.distance_meters, self.provider)
    }
}

/// One page of ranked providers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    entries: Vec<RankedProvider>,
    total_matches: usize,
    offset: usize,
}

impl RankedResult {
    /// Returns the entries of this page, nearest first.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[RankedProvider] {
        &self.entries
    }

    /// Consumes the result and returns its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<RankedProvider> {
        self.entries
    }

    /// Returns the number of entries on this page.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this page is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns how many candidates passed the filters, across all pages.
    #[inline]
    #[must_use]
    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    /// Returns true if entries exist beyond this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.entries.len()) < self.total_matches
    }
}

/// Ranks `candidates` around `origin`.
///
/// Drops candidates failing any active filter, sorts the rest by
/// `(distance, id)` ascending and returns the page selected by
/// `filter.offset` and `filter.limit`. An offset past the end yields an
/// empty page.
#[must_use]
pub fn rank_nearby(
    origin: Coordinate,
    candidates: &[ProviderCandidate],
    filter: &SearchFilter,
) -> RankedResult {
    let mut matches: Vec<RankedProvider> = candidates
        .iter()
        .filter_map(|candidate| filter.admit(candidate))
        .map(|provider| {
            let distance = origin.distance_to(&provider.location());
            RankedProvider::new(provider, distance)
        })
        .collect();

    matches.sort_by(|a, b| {
        a.distance_meters
            .cmp(&b.distance_meters)
            .then_with(|| a.provider.id().cmp(b.provider.id()))
    });

    let total_matches = matches.len();
    let entries: Vec<RankedProvider> = matches
        .into_iter()
        .skip(filter.offset)
        .take(filter.limit.get())
        .collect();

    tracing::debug!(
        candidates = candidates.len(),
        matches = total_matches,
        offset = filter.offset,
        returned = entries.len(),
        "ranked nearby providers"
    );

    RankedResult {
        entries,
        total_matches,
        offset: filter.offset,
    }
}
