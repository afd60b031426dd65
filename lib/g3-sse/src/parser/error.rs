/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use crate::HttpLineParseError;

#[derive(Debug, Error)]
pub enum HttpResponseParseError {
    #[error("too large header, should be less than {0}")]
    TooLargeHeader(usize),
    #[error("invalid status line: {0}")]
    InvalidStatusLine(HttpLineParseError),
    #[error("invalid header line: {0}")]
    InvalidHeaderLine(HttpLineParseError),
    #[error("invalid chunked transfer-encoding")]
    InvalidChunkedTransferEncoding,
    #[error("invalid chunk size line: {0}")]
    InvalidChunkSizeLine(HttpLineParseError),
    #[error("too long chunk size line (> {0})")]
    ChunkSizeLineTooLong(usize),
    #[error("no CRLF found after chunk data")]
    InvalidChunkDataEnd,
    #[error("invalid content length")]
    InvalidContentLength,
}
