/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use base64::prelude::*;
use percent_encoding::percent_decode_str;
use url::Url;

use super::UrlParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    Basic(HttpBasicAuth),
}

impl TryFrom<&Url> for HttpAuth {
    type Error = UrlParseError;

    /// A missing username or password is taken as empty. No auth is used only
    /// when both of them are empty.
    fn try_from(url: &Url) -> Result<Self, Self::Error> {
        let username = percent_decode_str(url.username())
            .decode_utf8()
            .map_err(|_| UrlParseError::InvalidUsername)?;
        let password = match url.password() {
            Some(p) => percent_decode_str(p)
                .decode_utf8()
                .map_err(|_| UrlParseError::InvalidPassword)?,
            None => "".into(),
        };

        if username.is_empty() && password.is_empty() {
            Ok(HttpAuth::None)
        } else {
            Ok(HttpAuth::Basic(HttpBasicAuth::new(&username, &password)))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBasicAuth {
    username: String,
    password: String,
    encoded_value: String,
}

impl HttpBasicAuth {
    pub fn new(username: &str, password: &str) -> Self {
        let mut buf = Vec::with_capacity(username.len() + 1 + password.len());
        buf.extend_from_slice(username.as_bytes());
        buf.push(b':');
        buf.extend_from_slice(password.as_bytes());

        let encoded_value = BASE64_STANDARD.encode(buf);

        HttpBasicAuth {
            username: username.to_string(),
            password: password.to_string(),
            encoded_value,
        }
    }

    #[inline]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[inline]
    pub fn encoded_value(&self) -> &str {
        &self.encoded_value
    }
}
