/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::HttpResponseParseError;

mod head;
pub use head::HttpResponseHead;

mod response;
pub use response::HttpResponseParser;
pub(crate) use response::DEFAULT_MAX_HEADER_SIZE;

/// Receiver of the events generated by [`HttpResponseParser`].
///
/// All callbacks are called from within [`HttpResponseParser::feed`] or
/// [`HttpResponseParser::finish_on_eof`].
pub trait HttpResponseHandler {
    /// Called once the header block of the final (non 1xx) response has been parsed.
    fn on_header(&mut self, head: &HttpResponseHead);
    /// Called with each span of decoded body data.
    fn on_body(&mut self, data: &[u8]);
    /// Called once after the end of the response body.
    fn on_finish(&mut self);
}
