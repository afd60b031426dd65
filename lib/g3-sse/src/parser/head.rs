/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use crate::ResponseHeaders;

#[derive(Debug, Clone)]
pub struct HttpResponseHead {
    /// minor version of HTTP/1.x
    pub version: u8,
    pub code: u16,
    pub reason: String,
    /// header lines in received order, with the original name case
    pub headers: Vec<(String, String)>,
}

impl HttpResponseHead {
    pub(super) fn new(version: u8, code: u16, reason: &str) -> Self {
        HttpResponseHead {
            version,
            code,
            reason: reason.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn is_informational(&self) -> bool {
        self.code >= 100 && self.code < 200 && self.code != 101
    }

    /// Responses that never carry a body, regardless of the framing headers.
    pub fn has_no_body(&self) -> bool {
        self.code == 204 || self.code == 304
    }

    pub fn lower_cased_headers(&self) -> ResponseHeaders {
        ResponseHeaders::from(self.headers.as_slice())
    }
}
