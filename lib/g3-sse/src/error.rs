/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::HttpResponseParseError;
use crate::connect::ProxyConnectError;
use crate::net::UpstreamAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingHttpErrorKind {
    Connection,
    Protocol,
    Timeout,
    Io,
}

#[derive(Debug, Error)]
pub enum StreamingHttpError {
    #[error("connect to {0} failed: {1:?}")]
    ConnectFailed(UpstreamAddr, io::Error),
    #[error("timeout to connect after {0:?}")]
    ConnectTimeout(Duration),
    #[error("invalid tls server name {0}")]
    InvalidTlsName(String),
    #[error("tls handshake with {0} failed: {1:?}")]
    TlsHandshakeFailed(String, io::Error),
    #[error("proxy tunnel failed: {0}")]
    ProxyConnectFailed(#[from] ProxyConnectError),
    #[error("unexpected end of stream")]
    UnexpectedEof,
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] HttpResponseParseError),
    #[error("no data received in {0:?}")]
    ReadTimeout(Duration),
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    #[error("connection closed")]
    Closed,
}

impl StreamingHttpError {
    pub fn kind(&self) -> StreamingHttpErrorKind {
        match self {
            StreamingHttpError::ConnectFailed(..)
            | StreamingHttpError::ConnectTimeout(_)
            | StreamingHttpError::InvalidTlsName(_)
            | StreamingHttpError::TlsHandshakeFailed(..)
            | StreamingHttpError::ProxyConnectFailed(_) => StreamingHttpErrorKind::Connection,
            StreamingHttpError::UnexpectedEof | StreamingHttpError::InvalidResponse(_) => {
                StreamingHttpErrorKind::Protocol
            }
            StreamingHttpError::ReadTimeout(_) => StreamingHttpErrorKind::Timeout,
            StreamingHttpError::ReadFailed(_)
            | StreamingHttpError::WriteFailed(_)
            | StreamingHttpError::Closed => StreamingHttpErrorKind::Io,
        }
    }
}
