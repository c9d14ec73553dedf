//! Post-decode cleanup of service-assigned fields.

use std::collections::HashSet;

use super::{Alert, Event, ItemDetails, LocalInfo, Restaurant};

trait Item {
    const ID_PREFIX: &'static str;
    fn id(&self) -> &str;
    fn id_and_details(&mut self) -> (&mut String, &mut ItemDetails);
}

impl Item for Event {
    const ID_PREFIX: &'static str = "event";
    fn id(&self) -> &str {
        &self.id
    }
    fn id_and_details(&mut self) -> (&mut String, &mut ItemDetails) {
        (&mut self.id, &mut self.details)
    }
}

impl Item for Restaurant {
    const ID_PREFIX: &'static str = "restaurant";
    fn id(&self) -> &str {
        &self.id
    }
    fn id_and_details(&mut self) -> (&mut String, &mut ItemDetails) {
        (&mut self.id, &mut self.details)
    }
}

impl Item for Alert {
    const ID_PREFIX: &'static str = "alert";
    fn id(&self) -> &str {
        &self.id
    }
    fn id_and_details(&mut self) -> (&mut String, &mut ItemDetails) {
        (&mut self.id, &mut self.details)
    }
}

impl LocalInfo {
    /// Makes service output safe to index and render:
    ///
    /// - empty or repeated ids (across all categories) get a fresh `<kind>_<nnn>` id; the first
    ///   occurrence of a repeated id keeps it, and fresh ids skip every id the service assigned;
    /// - coordinates outside WGS84 range or non-finite are dropped, never rejected;
    /// - blank `website` and citations without a url become absent.
    pub fn normalize(&mut self) {
        let reserved: HashSet<String> = service_ids(&self.events)
            .chain(service_ids(&self.restaurants))
            .chain(service_ids(&self.alerts))
            .collect();
        let mut seen = HashSet::new();
        normalize_items(&mut self.events, &reserved, &mut seen);
        normalize_items(&mut self.restaurants, &reserved, &mut seen);
        normalize_items(&mut self.alerts, &reserved, &mut seen);
    }
}

fn service_ids<T: Item>(items: &[T]) -> impl Iterator<Item = String> + '_ {
    items
        .iter()
        .map(|item| item.id().trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn normalize_items<T: Item>(items: &mut [T], reserved: &HashSet<String>, seen: &mut HashSet<String>) {
    let mut next = 1usize;
    for item in items.iter_mut() {
        let (id, details) = item.id_and_details();
        let trimmed = id.trim();
        if trimmed.is_empty() || seen.contains(trimmed) {
            *id = fresh_id(T::ID_PREFIX, &mut next, |c| reserved.contains(c) || seen.contains(c));
        } else if trimmed.len() != id.len() {
            *id = trimmed.to_string();
        }
        seen.insert(id.clone());
        clean_details(details);
    }
}

fn fresh_id(prefix: &str, next: &mut usize, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = format!("{prefix}_{:03}", *next);
        *next += 1;
        if !taken(&candidate) {
            return candidate;
        }
    }
}

fn clean_details(details: &mut ItemDetails) {
    if !details.latitude.is_some_and(|v| v.is_finite() && (-90.0..=90.0).contains(&v)) {
        details.latitude = None;
    }
    if !details.longitude.is_some_and(|v| v.is_finite() && (-180.0..=180.0).contains(&v)) {
        details.longitude = None;
    }
    if details.website.as_deref().is_some_and(|w| w.trim().is_empty()) {
        details.website = None;
    }
    if details.citation.as_ref().is_some_and(|c| c.url.trim().is_empty()) {
        details.citation = None;
    }
}
