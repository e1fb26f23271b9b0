use chrono::Utc;
use common::models::{DirectoryEntry, DirectoryStats, LookupResponse, Timezone};
use common::timezone::offset_for_id;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::cache::SearchCache;
use crate::directory::CityDirectory;
use crate::lookup::GeocodingClient;
use crate::sequence::RequestSequencer;

pub const DEFAULT_LIMIT: usize = 10;

struct CityIndex {
    directory: CityDirectory,
    cache: SearchCache,
}

/// City directory with cached, population-ranked search.
///
/// Directory and cache live behind one lock so a search always fills the
/// cache from the same snapshot it read, and an insert cannot slip in
/// between the two.
pub struct CityService {
    index: RwLock<CityIndex>,
    lookup: Option<GeocodingClient>,
    sequencer: RequestSequencer,
}

fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn normalize_region(region: Option<&str>) -> Option<String> {
    region
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

/// Whether a cached (query, region) could include `record`
fn could_match(query: &str, region: Option<&str>, record: &Timezone) -> bool {
    let text_match = [&record.display_name, &record.city_name, &record.country_name]
        .iter()
        .any(|field| field.to_lowercase().contains(query));

    let region_match = match region {
        Some(region) => {
            let region = region.to_lowercase();
            record.country_name.to_lowercase() == region
                || record.id.to_lowercase().starts_with(&region)
        }
        None => true,
    };

    text_match && region_match
}

fn with_current_offsets(records: impl IntoIterator<Item = Timezone>) -> Vec<Timezone> {
    let now = Utc::now();
    records
        .into_iter()
        .map(|mut record| {
            record.utc_offset_minutes = offset_for_id(&record.id, now);
            record
        })
        .collect()
}

impl CityService {
    pub fn new(cache_size: usize) -> Self {
        Self {
            index: RwLock::new(CityIndex {
                directory: CityDirectory::new(),
                cache: SearchCache::with_max_size(cache_size),
            }),
            lookup: None,
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn with_lookup(mut self, lookup: GeocodingClient) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Load bundled cities; clears the cache once for the whole batch
    pub async fn load_static<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = Timezone>,
    {
        let mut index = self.index.write().await;
        for record in records {
            index.directory.insert_static(record);
        }
        index.cache.clear();
        let loaded = index.directory.static_len();
        info!(loaded, "Static cities loaded");
        loaded
    }

    pub async fn add_static_city(&self, record: Timezone) {
        let mut index = self.index.write().await;
        debug!(city = %record.city_name, country = %record.country_name, "Adding static city");
        index.directory.insert_static(record);
        index.cache.clear();
    }

    pub async fn add_dynamic_city(&self, record: Timezone) {
        let mut index = self.index.write().await;
        Self::insert_dynamic(&mut index, record);
    }

    /// A dynamic entry replaces any earlier one with the same zone id, so
    /// cached queries matching either the new or the replaced record go.
    fn insert_dynamic(index: &mut CityIndex, record: Timezone) {
        let replaced = index
            .directory
            .dynamic_entry(&record.id)
            .map(|entry| entry.record.clone());
        let invalidated = index.cache.invalidate_where(|query, region| {
            could_match(query, region, &record)
                || replaced
                    .as_ref()
                    .is_some_and(|old| could_match(query, region, old))
        });
        debug!(
            city = %record.city_name,
            zone = %record.id,
            replaced = ?replaced.as_ref().map(|old| &old.city_name),
            invalidated,
            "Adding dynamic city"
        );
        index.directory.insert_dynamic(record, Utc::now());
    }

    /// Population-ranked substring search over static and dynamic cities.
    ///
    /// Never fails: an empty query yields no results.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search_cities(
        &self,
        query: &str,
        region: Option<&str>,
        limit: usize,
    ) -> Vec<Timezone> {
        let query = normalize_query(query);
        if query.is_empty() {
            return Vec::new();
        }
        let region = normalize_region(region);
        let key = SearchCache::key(&query, region.as_deref());

        let mut index = self.index.write().await;

        if let Some(cached) = index.cache.get(&key) {
            debug!(key = %key, "Search cache hit");
            return with_current_offsets(cached.iter().take(limit).cloned());
        }

        let results = index.directory.matching(&query, region.as_deref());
        debug!(key = %key, matches = results.len(), "Search cache miss");

        let page: Vec<Timezone> = results.iter().take(limit).cloned().collect();
        index.cache.insert(query, region, results);

        with_current_offsets(page)
    }

    pub async fn get_static_cities(&self) -> BTreeMap<String, Timezone> {
        self.index.read().await.directory.static_snapshot()
    }

    pub async fn get_dynamic_cities(&self) -> Vec<DirectoryEntry> {
        self.index.read().await.directory.dynamic_entries()
    }

    pub async fn get_total_cities(&self) -> usize {
        self.index.read().await.directory.total()
    }

    pub async fn stats(&self) -> DirectoryStats {
        let index = self.index.read().await;
        DirectoryStats {
            total_cities: index.directory.total(),
            static_cities: index.directory.static_len(),
            dynamic_cities: index.directory.dynamic_len(),
            cached_queries: index.cache.len(),
        }
    }

    pub async fn is_cached(&self, query: &str, region: Option<&str>) -> bool {
        let key = SearchCache::key(&normalize_query(query), normalize_region(region).as_deref());
        self.index.read().await.cache.contains_key(&key)
    }

    /// Query the external provider and learn the cities it returns.
    ///
    /// A failed call yields an empty result and an error message. When a newer
    /// lookup from the same client started meanwhile, the response is marked
    /// superseded and carries no results.
    #[instrument(skip(self), fields(client = %client, query = %query))]
    pub async fn live_lookup(&self, client: &str, query: &str) -> LookupResponse {
        let query = query.trim().to_string();
        let sequence = self.sequencer.begin(client).await;

        let outcome = match (&self.lookup, query.is_empty()) {
            (_, true) => Ok(Vec::new()),
            (None, false) => Err("Live lookup is not configured".to_string()),
            (Some(lookup), false) => lookup.search(&query).await.map_err(|e| {
                warn!(query = %query, error = %e, "Live lookup failed");
                e.to_string()
            }),
        };

        if let Ok(cities) = &outcome
            && !cities.is_empty()
        {
            let mut index = self.index.write().await;
            for city in cities {
                Self::insert_dynamic(&mut index, city.clone());
            }
        }

        let current = self.sequencer.finish(client, sequence).await;
        if !current {
            info!(sequence, "Discarding superseded lookup response");
            return LookupResponse {
                query,
                sequence,
                superseded: true,
                results: Vec::new(),
                error: None,
            };
        }

        match outcome {
            Ok(cities) => LookupResponse {
                query,
                sequence,
                superseded: false,
                results: with_current_offsets(cities),
                error: None,
            },
            Err(error) => LookupResponse {
                query,
                sequence,
                superseded: false,
                results: Vec::new(),
                error: Some(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> Timezone {
        Timezone::new("Asia/Kolkata", "Delhi", "India").with_population(19_000_000)
    }

    fn new_delhi() -> Timezone {
        Timezone::new("Asia/Kolkata", "New Delhi", "India").with_population(249_998)
    }

    async fn service_with(records: Vec<Timezone>) -> CityService {
        let service = CityService::new(10);
        service.load_static(records).await;
        service
    }

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let service = service_with(vec![delhi()]).await;
        assert!(service.search_cities("", None, DEFAULT_LIMIT).await.is_empty());
        assert!(service.search_cities("   ", None, DEFAULT_LIMIT).await.is_empty());
        assert_eq!(service.stats().await.cached_queries, 0);
    }

    #[tokio::test]
    async fn higher_population_ranks_first() {
        let service = service_with(vec![new_delhi(), delhi()]).await;

        let results = service.search_cities("delhi", None, DEFAULT_LIMIT).await;
        assert_eq!(results[0].city_name, "Delhi");
        assert_eq!(results[1].city_name, "New Delhi");
    }

    #[tokio::test]
    async fn query_is_trimmed_and_case_folded() {
        let service = service_with(vec![delhi()]).await;

        let results = service.search_cities("  DeLHi ", None, DEFAULT_LIMIT).await;
        assert_eq!(results.len(), 1);
        assert!(service.is_cached("delhi", None).await);
    }

    #[tokio::test]
    async fn results_carry_current_offsets() {
        let service = service_with(vec![delhi()]).await;
        let results = service.search_cities("delhi", None, DEFAULT_LIMIT).await;
        assert_eq!(results[0].utc_offset_minutes, 330);
    }

    #[tokio::test]
    async fn limit_slices_but_cache_keeps_everything() {
        let cities: Vec<Timezone> = (0..15)
            .map(|i| Timezone::new("Europe/Berlin", format!("Town {}", i), "Germany").with_population(i))
            .collect();
        let service = service_with(cities).await;

        let first = service.search_cities("town", None, 5).await;
        assert_eq!(first.len(), 5);
        assert_eq!(first[0].population, 14);

        let more = service.search_cities("town", None, 12).await;
        assert_eq!(more.len(), 12);
        assert_eq!(service.stats().await.cached_queries, 1);
    }

    #[tokio::test]
    async fn region_restricts_to_country() {
        let service = service_with(vec![
            delhi(),
            Timezone::new("America/New_York", "Delhi", "United States").with_population(3_000),
        ])
        .await;

        let results = service.search_cities("delhi", Some("united states"), DEFAULT_LIMIT).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "America/New_York");
    }

    #[tokio::test]
    async fn cache_is_bounded() {
        let service = CityService::new(3);
        service.load_static(vec![delhi()]).await;

        for q in ["a", "b", "c", "d"] {
            service.search_cities(q, None, DEFAULT_LIMIT).await;
        }

        assert_eq!(service.stats().await.cached_queries, 3);
        assert!(!service.is_cached("a", None).await);
        assert!(service.is_cached("d", None).await);
    }

    #[tokio::test]
    async fn reads_refresh_recency() {
        let service = CityService::new(2);
        service.search_cities("a", None, DEFAULT_LIMIT).await;
        service.search_cities("b", None, DEFAULT_LIMIT).await;
        service.search_cities("a", None, DEFAULT_LIMIT).await;
        service.search_cities("c", None, DEFAULT_LIMIT).await;

        assert!(service.is_cached("a", None).await);
        assert!(!service.is_cached("b", None).await);
    }

    #[tokio::test]
    async fn dynamic_city_is_visible_after_cached_miss() {
        let service = service_with(vec![delhi()]).await;
        let oslo = Timezone::new("Europe/Oslo", "Oslo", "Norway").with_population(700_000);

        assert!(service.search_cities("oslo", None, DEFAULT_LIMIT).await.is_empty());
        service.add_dynamic_city(oslo.clone()).await;

        let results = service.search_cities(&oslo.city_name.to_lowercase(), None, DEFAULT_LIMIT).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].same_city(&oslo));
    }

    #[tokio::test]
    async fn dynamic_city_leaves_unrelated_entries_cached() {
        let service = service_with(vec![delhi()]).await;
        service.search_cities("delhi", None, DEFAULT_LIMIT).await;
        service.search_cities("os", None, DEFAULT_LIMIT).await;
        service.search_cities("os", Some("Sweden"), DEFAULT_LIMIT).await;
        service.search_cities("os", Some("Europe/"), DEFAULT_LIMIT).await;

        service
            .add_dynamic_city(Timezone::new("Europe/Oslo", "Oslo", "Norway"))
            .await;

        assert!(service.is_cached("delhi", None).await);
        assert!(!service.is_cached("os", None).await);
        assert!(service.is_cached("os", Some("Sweden")).await);
        assert!(!service.is_cached("os", Some("Europe/")).await);
    }

    #[tokio::test]
    async fn replacing_dynamic_city_drops_its_cached_queries() {
        let service = CityService::new(10);
        service
            .add_dynamic_city(Timezone::new("Europe/Oslo", "Oslo", "Norway"))
            .await;
        assert_eq!(service.search_cities("oslo", None, DEFAULT_LIMIT).await.len(), 1);

        service
            .add_dynamic_city(Timezone::new("Europe/Oslo", "Bergen", "Norway"))
            .await;

        assert!(!service.is_cached("oslo", None).await);
        assert!(service.search_cities("oslo", None, DEFAULT_LIMIT).await.is_empty());
        let bergen = service.search_cities("bergen", None, DEFAULT_LIMIT).await;
        assert_eq!(bergen.len(), 1);
        assert_eq!(service.get_total_cities().await, 1);
    }

    #[tokio::test]
    async fn static_city_clears_whole_cache() {
        let service = service_with(vec![delhi()]).await;
        service.search_cities("delhi", None, DEFAULT_LIMIT).await;
        service.search_cities("zzz", None, DEFAULT_LIMIT).await;

        service
            .add_static_city(Timezone::new("Europe/Oslo", "Oslo", "Norway"))
            .await;

        assert_eq!(service.stats().await.cached_queries, 0);
    }

    #[tokio::test]
    async fn totals_and_static_snapshot() {
        let service = service_with(vec![delhi(), new_delhi()]).await;
        service
            .add_dynamic_city(Timezone::new("Europe/Oslo", "Oslo", "Norway"))
            .await;

        assert_eq!(service.get_total_cities().await, 3);
        let statics = service.get_static_cities().await;
        assert_eq!(statics.len(), 2);
        assert!(statics.contains_key("Delhi|India"));
    }

    #[tokio::test]
    async fn lookup_without_provider_reports_error() {
        let service = CityService::new(10);
        let response = service.live_lookup("client", "oslo").await;

        assert!(response.results.is_empty());
        assert!(!response.superseded);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn empty_lookup_query_is_a_no_op() {
        let service = CityService::new(10);
        let response = service.live_lookup("client", "  ").await;

        assert!(response.results.is_empty());
        assert!(response.error.is_none());
    }

    #[test]
    fn could_match_checks_name_country_and_region() {
        let oslo = Timezone::new("Europe/Oslo", "Oslo", "Norway");
        assert!(could_match("osl", None, &oslo));
        assert!(could_match("norw", None, &oslo));
        assert!(!could_match("berg", None, &oslo));
        assert!(could_match("osl", Some("norway"), &oslo));
        assert!(could_match("osl", Some("europe"), &oslo));
        assert!(!could_match("osl", Some("asia"), &oslo));
    }
}
