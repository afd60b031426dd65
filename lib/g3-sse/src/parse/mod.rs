/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::HttpLineParseError;

mod header_line;
pub use header_line::HttpHeaderLine;

mod status_line;
pub use status_line::HttpStatusLine;

mod chunked_line;
pub use chunked_line::HttpChunkedLine;

/// Check if the line is an empty one, with or without the `\r`.
pub(crate) fn is_blank_line(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}
