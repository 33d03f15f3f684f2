use std::collections::BTreeMap;

pub const ORDER: &str = "order";
pub const PAGE_NUMBER: &str = "pageNumber";
pub const PAGE_SIZE: &str = "pageSize";

pub const DEFAULT_ORDER: &str = "ID";
pub const DEFAULT_PAGE_NUMBER: &str = "0";
pub const DEFAULT_PAGE_SIZE: &str = "3";

/// Raw filter parameters of one request, exactly as the client sent them.
///
/// Owned per request and never mutated; defaults live in [`EffectiveParams`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    entries: BTreeMap<String, String>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derives the parameter view the builder works from.
    pub fn effective(&self) -> EffectiveParams<'_> {
        EffectiveParams {
            raw: self,
            order: self.get(ORDER).unwrap_or(DEFAULT_ORDER),
            page_number: self.get(PAGE_NUMBER).unwrap_or(DEFAULT_PAGE_NUMBER),
            page_size: self.get(PAGE_SIZE).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for FilterParams {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

/// Request parameters with defaults filled in for ordering and paging.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveParams<'a> {
    raw: &'a FilterParams,
    pub order: &'a str,
    pub page_number: &'a str,
    pub page_size: &'a str,
}

impl<'a> EffectiveParams<'a> {
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.raw.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_keys_are_absent() {
        let params = FilterParams::new();
        let effective = params.effective();
        assert_eq!(effective.order, "ID");
        assert_eq!(effective.page_number, "0");
        assert_eq!(effective.page_size, "3");
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let params = FilterParams::new()
            .with("order", "LEVEL")
            .with("pageNumber", "2")
            .with("pageSize", "10");
        let effective = params.effective();
        assert_eq!(effective.order, "LEVEL");
        assert_eq!(effective.page_number, "2");
        assert_eq!(effective.page_size, "10");
    }

    #[test]
    fn deriving_defaults_leaves_the_input_untouched() {
        let params: FilterParams = [("name", "ka")].into_iter().collect();
        let _ = params.effective();
        assert_eq!(params.len(), 1);
        assert!(!params.contains("order"));
        assert!(!params.contains("pageSize"));
    }
}
