/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use ahash::AHashMap;

/// Response headers keyed by lower-cased name, one value for each name.
///
/// Duplicated headers are last-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    inner: AHashMap<String, String>,
}

impl ResponseHeaders {
    pub fn insert(&mut self, name: &str, value: &str) {
        self.inner
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name.bytes().any(|c| c.is_ascii_uppercase()) {
            self.inner
                .get(&name.to_ascii_lowercase())
                .map(|v| v.as_str())
        } else {
            self.inner.get(name).map(|v| v.as_str())
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over all (lower-cased name, value) pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&[(String, String)]> for ResponseHeaders {
    fn from(headers: &[(String, String)]) -> Self {
        let mut map = ResponseHeaders::default();
        for (name, value) in headers {
            map.insert(name, value);
        }
        map
    }
}
