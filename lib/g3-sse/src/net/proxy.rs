/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use url::Url;

use super::{HttpAuth, UpstreamAddr, UrlParseError};

/// An HTTP proxy used as a CONNECT tunnel.
#[derive(Debug, Clone)]
pub struct HttpProxy {
    peer: UpstreamAddr,
    tls: bool,
    pub auth: HttpAuth,
}

impl HttpProxy {
    pub fn new(peer: UpstreamAddr, auth: HttpAuth) -> Self {
        HttpProxy {
            peer,
            tls: false,
            auth,
        }
    }

    #[inline]
    pub fn peer(&self) -> &UpstreamAddr {
        &self.peer
    }

    /// Whether the connection to the proxy itself should be wrapped in TLS.
    #[inline]
    pub fn use_tls(&self) -> bool {
        self.tls
    }
}

impl TryFrom<&Url> for HttpProxy {
    type Error = UrlParseError;

    fn try_from(url: &Url) -> Result<Self, Self::Error> {
        let tls = match url.scheme().to_ascii_lowercase().as_str() {
            "http" => false,
            "https" => true,
            s => return Err(UrlParseError::InvalidScheme(s.to_string())),
        };
        let peer = UpstreamAddr::try_from(url)?;
        let auth = HttpAuth::try_from(url)?;
        Ok(HttpProxy { peer, tls, auth })
    }
}

impl FromStr for HttpProxy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s)?;
        let proxy = HttpProxy::try_from(&url)?;
        Ok(proxy)
    }
}
