//! Inbound request model: path, query parameters and headers.

use http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;

/// Ordered multi-map of decoded query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    entries: IndexMap<String, Vec<String>>,
}

impl QueryDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `a=1&b=x+y&a=2`. Keys and values are percent-decoded, `+` is a
    /// space, and a bare key has an empty value.
    pub fn parse(query_string: &str) -> Self {
        let mut dict = Self::new();
        for pair in query_string.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            dict.append(decode(key), decode(value));
        }
        dict
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// The last value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|values| values.last()).map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes every value for `key`, returning them.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[derive(Debug, Clone, Default)]
pub struct Request {
    path: String,
    query: QueryDict,
    query_string: String,
    headers: HeaderMap,
    stripped_pjax: Option<String>,
}

impl Request {
    pub fn new(path: impl Into<String>, query_string: impl Into<String>, headers: HeaderMap) -> Self {
        let query_string = query_string.into();
        Self {
            path: path.into(),
            query: QueryDict::parse(&query_string),
            query_string,
            headers,
            stripped_pjax: None,
        }
    }

    /// A request for `uri`, which may carry a query string after `?`.
    pub fn get(uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        Self::new(path, query, HeaderMap::new())
    }

    pub fn with_header(mut self, name: HeaderName, value: &str) -> Result<Self, InvalidHeaderValue> {
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    /// Flags the request as a PJAX request for `container`.
    pub fn pjax(self, container: &str) -> Result<Self, InvalidHeaderValue> {
        self.with_header(crate::X_PJAX, "true")?.with_header(crate::X_PJAX_CONTAINER, container)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryDict {
        &self.query
    }

    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// A header value, if present and visible ASCII.
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Path plus query string, as the client asked for it.
    pub fn full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }

    /// The cache-busting parameter, whether still present or already stripped.
    pub fn pjax_param(&self) -> Option<&str> {
        self.query.get(crate::PJAX_PARAM).or(self.stripped_pjax.as_deref())
    }

    pub(crate) fn query_mut(&mut self) -> &mut QueryDict {
        &mut self.query
    }

    pub(crate) fn set_query_string(&mut self, query_string: String) {
        self.query_string = query_string;
    }

    pub(crate) fn remember_pjax_param(&mut self, value: String) {
        self.stripped_pjax = Some(value);
    }
}
