//! Named filters and the per-view schema that evaluates them.
//!
//! A filter value that is blank or `"all"` (any case) is a pass-through and
//! is not stored, so setting it twice and clearing it are the same thing.

use std::collections::BTreeMap;

/// How a filter key is evaluated.
pub enum FilterKind<T> {
    /// Case-insensitive substring match over any of the extracted fields.
    Search(fn(&T) -> Vec<&str>),
    /// Case-insensitive equality with one extracted field.
    Exact(fn(&T) -> &str),
    /// Sent to the backend; changing it triggers a reload.
    Server,
}

pub struct FilterField<T> {
    pub key: &'static str,
    pub kind: FilterKind<T>,
}

impl<T> FilterField<T> {
    #[must_use]
    pub fn is_server(&self) -> bool {
        matches!(self.kind, FilterKind::Server)
    }
}

/// The set of filter keys a view understands.
pub struct FilterSchema<T> {
    fields: Vec<FilterField<T>>,
}

impl<T> Default for FilterSchema<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> FilterSchema<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, key: &'static str, extract: fn(&T) -> Vec<&str>) -> Self {
        self.fields.push(FilterField { key, kind: FilterKind::Search(extract) });
        self
    }

    #[must_use]
    pub fn exact(mut self, key: &'static str, extract: fn(&T) -> &str) -> Self {
        self.fields.push(FilterField { key, kind: FilterKind::Exact(extract) });
        self
    }

    #[must_use]
    pub fn server(mut self, key: &'static str) -> Self {
        self.fields.push(FilterField { key, kind: FilterKind::Server });
        self
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FilterField<T>> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }

    /// AND over every active client-side filter. Server keys and keys the
    /// schema does not know always pass.
    #[must_use]
    pub fn matches(&self, filters: &Filters, item: &T) -> bool {
        filters.iter().all(|(key, value)| {
            let Some(field) = self.field(key) else {
                return true;
            };
            match field.kind {
                FilterKind::Server => true,
                FilterKind::Search(extract) => {
                    let needle = value.to_lowercase();
                    extract(item)
                        .iter()
                        .any(|hay| hay.to_lowercase().contains(&needle))
                }
                FilterKind::Exact(extract) => extract(item).eq_ignore_ascii_case(value),
            }
        })
    }
}

/// Active filter values, keyed by filter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pass_through(value: &str) -> bool {
        let value = value.trim();
        value.is_empty() || value.eq_ignore_ascii_case("all")
    }

    /// Set one value. Returns `true` when the stored state changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        if Self::is_pass_through(value) {
            return self.0.remove(key).is_some();
        }
        if self.0.get(key).is_some_and(|current| current == value) {
            return false;
        }
        self.0.insert(key.to_owned(), value.to_owned());
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Only the values whose keys the schema evaluates server-side.
    #[must_use]
    pub fn server_values<T>(&self, schema: &FilterSchema<T>) -> BTreeMap<String, String> {
        self.0
            .iter()
            .filter(|(k, _)| schema.field(k).is_some_and(FilterField::is_server))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
