/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use bytes::Bytes;
use futures_util::Stream;
use log::debug;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::connect::http_connect_to;
use crate::io::{BoxStreamingIo, StreamingIo, tcp_connect_to, tls_connect_to};
use crate::{
    HttpGetRequest, HttpResponseReadState, HttpResponseReader, ResponseHeaders,
    StreamingHttpConfig, StreamingHttpError,
};

/// A single `GET` request whose response body is consumed incrementally.
pub struct StreamingHttpConnection<S = BoxStreamingIo> {
    reader: HttpResponseReader<S>,
}

impl StreamingHttpConnection {
    /// Connect to the target, directly or through the configured proxy, send the
    /// request and wait for the response header.
    ///
    /// The connect timeout covers the TCP connection, the proxy tunnel and all TLS
    /// handshakes. Waiting for the response header is bounded by the read timeout.
    pub async fn connect(config: &StreamingHttpConfig) -> Result<Self, StreamingHttpError> {
        let io = match tokio::time::timeout(config.connect_timeout, open_stream(config)).await {
            Ok(Ok(io)) => io,
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(StreamingHttpError::ConnectTimeout(config.connect_timeout)),
        };
        StreamingHttpConnection::with_io(io, config).await
    }
}

async fn open_stream(config: &StreamingHttpConfig) -> Result<BoxStreamingIo, StreamingHttpError> {
    let Some(proxy) = config.proxy() else {
        let stream = tcp_connect_to(config.target_addr()).await?;
        return wrap_target_tls(stream, config).await;
    };

    let stream = tcp_connect_to(proxy.peer()).await?;
    if proxy.use_tls() {
        let stream = tls_connect_to(stream, proxy.peer().host()).await?;
        let stream = http_connect_to(stream, &proxy.auth, config.target_addr()).await?;
        wrap_target_tls(stream, config).await
    } else {
        let stream = http_connect_to(stream, &proxy.auth, config.target_addr()).await?;
        wrap_target_tls(stream, config).await
    }
}

async fn wrap_target_tls<S>(
    stream: S,
    config: &StreamingHttpConfig,
) -> Result<BoxStreamingIo, StreamingHttpError>
where
    S: StreamingIo + 'static,
{
    if config.target_use_tls() {
        let tls_stream = tls_connect_to(stream, config.target_addr().host()).await?;
        Ok(Box::new(tls_stream))
    } else {
        Ok(Box::new(stream))
    }
}

impl<S> StreamingHttpConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Send the request on an already established stream and wait for the response header.
    pub async fn with_io(mut io: S, config: &StreamingHttpConfig) -> Result<Self, StreamingHttpError> {
        let req = HttpGetRequest::new(config.target(), config.headers()).to_vec();
        io.write_all(&req)
            .await
            .map_err(StreamingHttpError::WriteFailed)?;
        io.flush().await.map_err(StreamingHttpError::WriteFailed)?;
        debug!("request sent to {}", config.target_addr());

        let reader = HttpResponseReader::with_limits(
            io,
            config.read_timeout,
            config.chunk_size,
            config.max_header_size,
        )
        .await?;
        debug!(
            "got response header from {}: status {}",
            config.target_addr(),
            reader.status()
        );
        Ok(StreamingHttpConnection { reader })
    }

    #[inline]
    pub fn status(&self) -> u16 {
        self.reader.status()
    }

    #[inline]
    pub fn headers(&self) -> &ResponseHeaders {
        self.reader.headers()
    }

    #[inline]
    pub fn state(&self) -> HttpResponseReadState {
        self.reader.state()
    }

    pub async fn next_line(&mut self) -> Result<Option<String>, StreamingHttpError> {
        self.reader.next_line().await
    }

    pub fn read_lines(&mut self) -> impl Stream<Item = Result<String, StreamingHttpError>> + '_ {
        self.reader.read_lines()
    }

    pub async fn read_all(&mut self) -> Result<Bytes, StreamingHttpError> {
        self.reader.read_all().await
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.reader.is_closed()
    }

    /// Release the underlying stream. It's safe to call this more than once.
    pub fn close(&mut self) {
        self.reader.close();
    }
}
