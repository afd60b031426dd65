/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::header::proxy_authorization_basic;
use crate::net::{HttpAuth, UpstreamAddr};

pub struct HttpConnectRequest<'a> {
    host: &'a UpstreamAddr,
    dyn_headers: Vec<String>,
}

impl<'a> HttpConnectRequest<'a> {
    pub fn new(host: &'a UpstreamAddr, auth: &HttpAuth) -> Self {
        let mut req = HttpConnectRequest {
            host,
            dyn_headers: Vec::new(),
        };
        match auth {
            HttpAuth::None => {}
            HttpAuth::Basic(a) => req.append_dyn_header(proxy_authorization_basic(a)),
        }
        req
    }

    /// the header line should end with \r\n
    pub fn append_dyn_header(&mut self, line: String) {
        assert!(line.ends_with("\r\n"));
        self.dyn_headers.push(line);
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let host = self.host.to_string();
        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(b"CONNECT ");
        buf.extend_from_slice(host.as_bytes());
        buf.extend_from_slice(b" HTTP/1.1\r\nHost: ");
        buf.extend_from_slice(host.as_bytes());
        buf.extend_from_slice(b"\r\n");
        for line in &self.dyn_headers {
            buf.extend_from_slice(line.as_bytes());
        }
        buf.extend_from_slice(b"\r\n");
        buf
    }

    pub async fn send<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.to_vec()).await?;
        writer.flush().await
    }
}
