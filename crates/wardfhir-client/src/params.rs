/// Ordered query-parameter builder for list/search requests.
///
/// Keeps the server's parameter conventions intact: insertion order is
/// preserved, list-valued parameters (`_include` lists) are serialized as
/// repeated keys, and non-standard `-`-prefixed filters (`-summary`,
/// `-samplingPeriod`, `-method`) ride alongside standard ones untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `key=value` pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Append a list-valued parameter as repeated keys.
    pub fn with_all<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let key = key.into();
        for value in values {
            self.push(key.clone(), value);
        }
        self
    }

    /// `_format=json`
    pub fn format_json(self) -> Self {
        self.with("_format", "json")
    }

    /// `_include=<value>` for every element of the include list.
    pub fn include<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.with_all("_include", values)
    }

    /// `_summary=true`
    pub fn summary(self) -> Self {
        self.with("_summary", true)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs in insertion order, ready for a query-string serializer.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_vec(params: &SearchParams) -> Vec<(&str, &str)> {
        params
            .pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_insertion_order_preserved() {
        let params = SearchParams::new()
            .with("subject", "pat-1")
            .with("date", ">=2015-01-01")
            .format_json();
        assert_eq!(
            as_vec(&params),
            vec![
                ("subject", "pat-1"),
                ("date", ">=2015-01-01"),
                ("_format", "json"),
            ]
        );
    }

    #[test]
    fn test_include_list_repeats_key() {
        let params = SearchParams::new()
            .with("episodeofcare", "eoc-1")
            .include(["Encounter.patient", "Encounter.episodeOfCare"]);
        assert_eq!(
            as_vec(&params),
            vec![
                ("episodeofcare", "eoc-1"),
                ("_include", "Encounter.patient"),
                ("_include", "Encounter.episodeOfCare"),
            ]
        );
    }

    #[test]
    fn test_prefixed_filters_untouched() {
        let params = SearchParams::new()
            .with("device.identifier", "dev-1")
            .with("-summary", true)
            .with("-samplingPeriod", 5);
        assert_eq!(
            as_vec(&params),
            vec![
                ("device.identifier", "dev-1"),
                ("-summary", "true"),
                ("-samplingPeriod", "5"),
            ]
        );
    }

    #[test]
    fn test_empty() {
        assert!(SearchParams::new().is_empty());
        assert!(!SearchParams::new().summary().is_empty());
    }
}
