use chrono::{DateTime, Utc};
use common::models::{CitySource, DirectoryEntry, Timezone};
use std::collections::BTreeMap;

/// Static and dynamic city tables.
///
/// Both tables are ordered maps, so the candidate pool handed to search has a
/// stable encounter order: static entries by `city|country`, then dynamic
/// entries by zone id. Population ties therefore rank alphabetically by key,
/// not by insertion order.
#[derive(Debug, Default)]
pub struct CityDirectory {
    static_cities: BTreeMap<String, DirectoryEntry>,
    dynamic_cities: BTreeMap<String, DirectoryEntry>,
}

impl CityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn static_key(record: &Timezone) -> String {
        format!("{}|{}", record.city_name, record.country_name)
    }

    pub fn insert_static(&mut self, record: Timezone) {
        self.static_cities.insert(
            Self::static_key(&record),
            DirectoryEntry {
                record,
                source: CitySource::Static,
                last_updated: None,
            },
        );
    }

    pub fn insert_dynamic(&mut self, record: Timezone, now: DateTime<Utc>) {
        self.dynamic_cities.insert(
            record.id.clone(),
            DirectoryEntry {
                record,
                source: CitySource::Dynamic,
                last_updated: Some(now),
            },
        );
    }

    pub fn static_len(&self) -> usize {
        self.static_cities.len()
    }

    pub fn dynamic_len(&self) -> usize {
        self.dynamic_cities.len()
    }

    pub fn total(&self) -> usize {
        self.static_len() + self.dynamic_len()
    }

    pub fn static_snapshot(&self) -> BTreeMap<String, Timezone> {
        self.static_cities
            .iter()
            .map(|(key, entry)| (key.clone(), entry.record.clone()))
            .collect()
    }

    pub fn dynamic_entry(&self, id: &str) -> Option<&DirectoryEntry> {
        self.dynamic_cities.get(id)
    }

    /// Learned cities with their last update time, ordered by zone id
    pub fn dynamic_entries(&self) -> Vec<DirectoryEntry> {
        self.dynamic_cities.values().cloned().collect()
    }

    fn candidates(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.static_cities
            .values()
            .chain(self.dynamic_cities.values())
    }

    /// Records whose display name contains `query` (already lowercased) and,
    /// when a region is given, whose country equals it case-insensitively.
    /// Sorted by population descending; ties keep encounter order.
    pub fn matching(&self, query: &str, region: Option<&str>) -> Vec<Timezone> {
        let region = region.map(str::to_lowercase);

        let mut results: Vec<Timezone> = self
            .candidates()
            .filter(|entry| entry.record.display_name.to_lowercase().contains(query))
            .filter(|entry| match &region {
                Some(region) => entry.record.country_name.to_lowercase() == *region,
                None => true,
            })
            .map(|entry| entry.record.clone())
            .collect();

        results.sort_by(|a, b| b.population.cmp(&a.population));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> Timezone {
        Timezone::new("Asia/Kolkata", "Delhi", "India").with_population(19_000_000)
    }

    fn new_delhi() -> Timezone {
        Timezone::new("Asia/Kolkata", "New Delhi", "India").with_population(250_000)
    }

    #[test]
    fn static_entries_are_keyed_by_city_and_country() {
        let mut directory = CityDirectory::new();
        directory.insert_static(delhi());
        directory.insert_static(delhi().with_population(20_000_000));
        directory.insert_static(Timezone::new("America/New_York", "Delhi", "United States"));

        assert_eq!(directory.static_len(), 2);
        let snapshot = directory.static_snapshot();
        assert_eq!(snapshot["Delhi|India"].population, 20_000_000);
    }

    #[test]
    fn dynamic_entries_are_keyed_by_zone_and_timestamped() {
        let mut directory = CityDirectory::new();
        let now = Utc::now();
        directory.insert_dynamic(delhi(), now);
        directory.insert_dynamic(new_delhi(), now);

        assert_eq!(directory.dynamic_len(), 1);
        let entry = directory.dynamic_entry("Asia/Kolkata").unwrap();
        assert_eq!(entry.record.city_name, "New Delhi");
        assert_eq!(entry.source, CitySource::Dynamic);
        assert_eq!(entry.last_updated, Some(now));
        assert_eq!(directory.dynamic_entries(), vec![entry.clone()]);
    }

    #[test]
    fn matching_ranks_by_population() {
        let mut directory = CityDirectory::new();
        directory.insert_static(new_delhi());
        directory.insert_static(delhi());

        let results = directory.matching("delhi", None);
        let names: Vec<_> = results.iter().map(|r| r.city_name.as_str()).collect();
        assert_eq!(names, ["Delhi", "New Delhi"]);
    }

    #[test]
    fn ties_rank_by_key_not_insertion_order() {
        let mut directory = CityDirectory::new();
        directory.insert_static(Timezone::new("Europe/Paris", "Bpark", "France"));
        directory.insert_static(Timezone::new("Europe/Paris", "Apark", "France"));
        directory.insert_dynamic(Timezone::new("Europe/Berlin", "Cpark", "Germany"), Utc::now());

        let results = directory.matching("park", None);
        let names: Vec<_> = results.iter().map(|r| r.city_name.as_str()).collect();
        assert_eq!(names, ["Apark", "Bpark", "Cpark"]);
    }

    #[test]
    fn region_filters_on_country_case_insensitively() {
        let mut directory = CityDirectory::new();
        directory.insert_static(Timezone::new("America/Santiago", "Santiago", "Chile"));
        directory.insert_static(Timezone::new(
            "America/Santo_Domingo",
            "Santo Domingo",
            "Dominican Republic",
        ));

        let results = directory.matching("sant", Some("CHILE"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].city_name, "Santiago");
    }

    #[test]
    fn total_counts_both_tables() {
        let mut directory = CityDirectory::new();
        directory.insert_static(delhi());
        directory.insert_dynamic(Timezone::new("Europe/Oslo", "Oslo", "Norway"), Utc::now());
        assert_eq!(directory.total(), 2);
    }
}
