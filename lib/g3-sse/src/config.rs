/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use http::{HeaderName, HeaderValue};
use url::Url;

use crate::net::{HttpProxy, UpstreamAddr};
use crate::parser::DEFAULT_MAX_HEADER_SIZE;
use crate::reader::DEFAULT_CHUNK_SIZE;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct StreamingHttpConfig {
    target: Url,
    target_addr: UpstreamAddr,
    proxy: Option<HttpProxy>,
    headers: Vec<(String, String)>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub chunk_size: usize,
    pub max_header_size: usize,
}

impl StreamingHttpConfig {
    pub fn new(target: Url) -> anyhow::Result<Self> {
        match target.scheme() {
            "http" | "https" => {}
            s => return Err(anyhow!("unsupported target url scheme {s}")),
        }
        let target_addr =
            UpstreamAddr::try_from(&target).map_err(|e| anyhow!("invalid target url: {e}"))?;

        Ok(StreamingHttpConfig {
            target,
            target_addr,
            proxy: None,
            headers: Vec::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
        })
    }

    #[inline]
    pub fn target(&self) -> &Url {
        &self.target
    }

    #[inline]
    pub fn target_addr(&self) -> &UpstreamAddr {
        &self.target_addr
    }

    #[inline]
    pub fn target_use_tls(&self) -> bool {
        self.target.scheme() == "https"
    }

    #[inline]
    pub fn proxy(&self) -> Option<&HttpProxy> {
        self.proxy.as_ref()
    }

    pub fn set_proxy(&mut self, proxy: HttpProxy) {
        self.proxy = Some(proxy);
    }

    pub fn set_proxy_url(&mut self, url: &str) -> anyhow::Result<()> {
        let proxy = HttpProxy::from_str(url).context(format!("invalid proxy url {url}"))?;
        self.set_proxy(proxy);
        Ok(())
    }

    #[inline]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Add a request header, which will be sent in the order they are added.
    pub fn append_header(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        HeaderName::from_str(name).map_err(|e| anyhow!("invalid header name {name}: {e}"))?;
        HeaderValue::from_str(value).map_err(|e| anyhow!("invalid header value {value}: {e}"))?;
        self.headers.push((name.to_string(), value.to_string()));
        Ok(())
    }

    pub fn set_chunk_size(&mut self, size: usize) -> anyhow::Result<()> {
        if size == 0 {
            return Err(anyhow!("chunk size should not be 0"));
        }
        self.chunk_size = size;
        Ok(())
    }
}
