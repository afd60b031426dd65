/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use url::{Host, Url};

use super::UrlParseError;

/// Host and port of a peer, as used in `CONNECT` request lines and `Host` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamAddr {
    host: String,
    port: u16,
}

impl UpstreamAddr {
    pub fn new(host: &str, port: u16) -> Self {
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        UpstreamAddr {
            host: host.to_string(),
            port,
        }
    }

    /// The host without any IPv6 brackets, suitable for resolving.
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl TryFrom<&Url> for UpstreamAddr {
    type Error = UrlParseError;

    fn try_from(url: &Url) -> Result<Self, Self::Error> {
        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            None => return Err(UrlParseError::NoHostFound),
        };
        let port = url
            .port_or_known_default()
            .ok_or(UrlParseError::NoPortFound)?;
        Ok(UpstreamAddr { host, port })
    }
}
