//! In-memory perfume catalog keyed by canonical id.
//!
//! The catalog is the single source of truth every query and ranking runs
//! against. Iteration order is always ascending id, so equal inputs produce
//! equal outputs everywhere downstream.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::core::{Gender, Perfume, ScentType};

/// What an upsert did to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The id was not present before
    Inserted,
    /// The id existed with different content, which was replaced
    Updated,
    /// The id existed with identical content, nothing changed
    Unchanged,
}

/// Conjunctive catalog filter; empty clauses match everything
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive substring over name or brand
    pub query: Option<String>,
    pub genders: Vec<Gender>,
    pub scent_types: Vec<ScentType>,
    pub price: Option<RangeInclusive<f64>>,
}

impl CatalogFilter {
    pub fn matches(&self, perfume: &Perfume) -> bool {
        if let Some(query) = &self.query {
            let query = query.trim().to_lowercase();
            if !query.is_empty()
                && !perfume.name.to_lowercase().contains(&query)
                && !perfume.brand.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        if !self.genders.is_empty() && !self.genders.contains(&perfume.gender) {
            return false;
        }
        if !self.scent_types.is_empty() && !self.scent_types.contains(&perfume.scent_type) {
            return false;
        }
        if let Some(price) = &self.price {
            if !price.contains(&perfume.price) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, Perfume>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build from a perfume list; on duplicate ids the later entry wins
    pub fn from_perfumes(perfumes: Vec<Perfume>) -> Self {
        let mut catalog = Self::new();
        for perfume in perfumes {
            catalog.entries.insert(perfume.id.clone(), perfume);
        }
        catalog
    }

    /// Insert or replace by id, reporting what actually happened.
    /// [`UpsertOutcome::Unchanged`] lets ingestion skip needless persistence.
    pub fn upsert(&mut self, perfume: Perfume) -> UpsertOutcome {
        match self.entries.get(&perfume.id) {
            None => {
                self.entries.insert(perfume.id.clone(), perfume);
                UpsertOutcome::Inserted
            }
            Some(existing) if *existing == perfume => UpsertOutcome::Unchanged,
            Some(_) => {
                self.entries.insert(perfume.id.clone(), perfume);
                UpsertOutcome::Updated
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Perfume> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All perfumes in ascending id order
    pub fn all(&self) -> Vec<Perfume> {
        self.entries.values().cloned().collect()
    }

    /// Perfumes matching the filter, in ascending id order
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<Perfume> {
        self.entries
            .values()
            .filter(|perfume| filter.matches(perfume))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perfume(id: &str, name: &str, brand: &str) -> Perfume {
        Perfume::new(id, name, brand)
    }

    #[test]
    fn test_upsert_outcomes() {
        let mut catalog = Catalog::new();
        let original = perfume("p1", "Bloom", "Gucci");

        assert_eq!(catalog.upsert(original.clone()), UpsertOutcome::Inserted);
        assert_eq!(catalog.upsert(original.clone()), UpsertOutcome::Unchanged);

        let mut changed = original;
        changed.price = 120.0;
        assert_eq!(catalog.upsert(changed.clone()), UpsertOutcome::Updated);
        assert_eq!(catalog.get("p1").map(|p| p.price), Some(120.0));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_from_perfumes_later_duplicate_wins() {
        let mut first = perfume("p1", "Old", "Brand");
        first.price = 10.0;
        let mut second = perfume("p1", "New", "Brand");
        second.price = 20.0;

        let catalog = Catalog::from_perfumes(vec![first, second]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("p1").map(|p| p.name.as_str()), Some("New"));
    }

    #[test]
    fn test_all_is_id_ordered() {
        let catalog = Catalog::from_perfumes(vec![
            perfume("p3", "C", "Z"),
            perfume("p1", "A", "X"),
            perfume("p2", "B", "Y"),
        ]);
        let ids: Vec<String> = catalog.all().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_filter_query_matches_name_or_brand() {
        let catalog = Catalog::from_perfumes(vec![
            perfume("p1", "Bloom", "Gucci"),
            perfume("p2", "Sauvage", "Dior"),
            perfume("p3", "Guilty", "Gucci"),
        ]);

        let filter = CatalogFilter {
            query: Some("gucci".to_string()),
            ..CatalogFilter::default()
        };
        let matched = catalog.filter(&filter);
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|p| p.brand == "Gucci"));

        let filter = CatalogFilter {
            query: Some("SAUV".to_string()),
            ..CatalogFilter::default()
        };
        assert_eq!(catalog.filter(&filter).len(), 1);
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let catalog = Catalog::from_perfumes(vec![perfume("p1", "Bloom", "Gucci")]);
        let filter = CatalogFilter {
            query: Some("   ".to_string()),
            ..CatalogFilter::default()
        };
        assert_eq!(catalog.filter(&filter).len(), 1);
    }

    #[test]
    fn test_filter_clauses_are_conjunctive() {
        let mut floral = perfume("p1", "Bloom", "Gucci");
        floral.gender = Gender::Female;
        floral.scent_type = ScentType::Floral;
        floral.price = 90.0;

        let mut woody = perfume("p2", "Wood Song", "Gucci");
        woody.gender = Gender::Female;
        woody.scent_type = ScentType::Woody;
        woody.price = 90.0;

        let catalog = Catalog::from_perfumes(vec![floral, woody]);
        let filter = CatalogFilter {
            query: Some("gucci".to_string()),
            genders: vec![Gender::Female],
            scent_types: vec![ScentType::Floral],
            price: Some(50.0..=100.0),
        };
        let matched = catalog.filter(&filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "p1");
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let mut cheap = perfume("p1", "A", "B");
        cheap.price = 50.0;
        let mut dear = perfume("p2", "C", "D");
        dear.price = 100.0;
        let mut outside = perfume("p3", "E", "F");
        outside.price = 100.01;

        let catalog = Catalog::from_perfumes(vec![cheap, dear, outside]);
        let filter = CatalogFilter {
            price: Some(50.0..=100.0),
            ..CatalogFilter::default()
        };
        let ids: Vec<String> = catalog.filter(&filter).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let catalog = Catalog::from_perfumes(vec![
            perfume("p1", "A", "B"),
            perfume("p2", "C", "D"),
        ]);
        assert_eq!(catalog.filter(&CatalogFilter::default()).len(), 2);
    }
}
