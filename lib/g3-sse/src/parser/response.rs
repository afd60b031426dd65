/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use super::{HttpResponseHandler, HttpResponseHead, HttpResponseParseError};
use crate::parse::{HttpChunkedLine, HttpHeaderLine, HttpStatusLine, is_blank_line};

pub const DEFAULT_MAX_HEADER_SIZE: usize = 16384;
const MAX_CHUNK_SIZE_LINE_SIZE: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    StatusLine,
    HeaderLine,
    FixedBody(u64),
    ChunkSizeLine,
    ChunkData(u64),
    ChunkDataEnd,
    Trailer,
    UntilClose,
    Finished,
}

#[derive(Default)]
struct BodyFraming {
    content_length: u64,
    chunked_transfer: bool,
    has_transfer_encoding: bool,
    has_content_length: bool,
}

/// Incremental HTTP/1.x response parser.
///
/// Data can be fed in arbitrary pieces, the handler will see the same header and the
/// same body bytes in the same order, only the body spans may be split differently.
pub struct HttpResponseParser<H> {
    handler: H,
    state: ParseState,
    max_header_size: usize,
    header_size: usize,
    line_buf: Vec<u8>,
    head: Option<HttpResponseHead>,
    framing: BodyFraming,
}

impl<H: HttpResponseHandler> HttpResponseParser<H> {
    pub fn new(handler: H) -> Self {
        HttpResponseParser::with_max_header_size(handler, DEFAULT_MAX_HEADER_SIZE)
    }

    pub fn with_max_header_size(handler: H, max_header_size: usize) -> Self {
        HttpResponseParser {
            handler,
            state: ParseState::StatusLine,
            max_header_size,
            header_size: 0,
            line_buf: Vec::with_capacity(256),
            head: None,
            framing: BodyFraming::default(),
        }
    }

    #[inline]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The head of the final response, available after `on_header` has been called.
    pub fn head(&self) -> Option<&HttpResponseHead> {
        match self.state {
            ParseState::StatusLine | ParseState::HeaderLine => None,
            _ => self.head.as_ref(),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == ParseState::Finished
    }

    pub fn feed(&mut self, mut data: &[u8]) -> Result<(), HttpResponseParseError> {
        while !data.is_empty() {
            match self.state {
                ParseState::FixedBody(left) => {
                    let n = body_span_len(left, data.len());
                    self.handler.on_body(&data[..n]);
                    data = &data[n..];
                    let left = left - n as u64;
                    if left == 0 {
                        self.finish();
                    } else {
                        self.state = ParseState::FixedBody(left);
                    }
                }
                ParseState::ChunkData(left) => {
                    let n = body_span_len(left, data.len());
                    self.handler.on_body(&data[..n]);
                    data = &data[n..];
                    let left = left - n as u64;
                    if left == 0 {
                        self.state = ParseState::ChunkDataEnd;
                    } else {
                        self.state = ParseState::ChunkData(left);
                    }
                }
                ParseState::UntilClose => {
                    self.handler.on_body(data);
                    return Ok(());
                }
                ParseState::Finished => {
                    // nothing is expected after the end of the message
                    return Ok(());
                }
                _ => {
                    let Some(consumed) = self.fill_line(data)? else {
                        return Ok(());
                    };
                    data = &data[consumed..];

                    let line = std::mem::take(&mut self.line_buf);
                    let r = self.handle_line(&line);
                    self.line_buf = line;
                    self.line_buf.clear();
                    r?;
                }
            }
        }
        Ok(())
    }

    /// Tell the parser that the peer has closed the connection.
    ///
    /// Returns whether the message is complete.
    pub fn finish_on_eof(&mut self) -> bool {
        match self.state {
            ParseState::UntilClose => {
                self.finish();
                true
            }
            ParseState::Finished => true,
            _ => false,
        }
    }

    /// Append data to the line buffer, returning the consumed size if a full line is ready.
    fn fill_line(&mut self, data: &[u8]) -> Result<Option<usize>, HttpResponseParseError> {
        let (part, found) = match memchr::memchr(b'\n', data) {
            Some(p) => (&data[..=p], true),
            None => (data, false),
        };

        match self.state {
            ParseState::StatusLine | ParseState::HeaderLine | ParseState::Trailer => {
                self.header_size += part.len();
                if self.header_size > self.max_header_size {
                    return Err(HttpResponseParseError::TooLargeHeader(self.max_header_size));
                }
            }
            _ => {
                if self.line_buf.len() + part.len() > MAX_CHUNK_SIZE_LINE_SIZE {
                    return Err(HttpResponseParseError::ChunkSizeLineTooLong(
                        MAX_CHUNK_SIZE_LINE_SIZE,
                    ));
                }
            }
        }

        self.line_buf.extend_from_slice(part);
        if found { Ok(Some(part.len())) } else { Ok(None) }
    }

    fn handle_line(&mut self, line: &[u8]) -> Result<(), HttpResponseParseError> {
        match self.state {
            ParseState::StatusLine => {
                if is_blank_line(line) {
                    // tolerate empty lines before the status line
                    return Ok(());
                }
                let status =
                    HttpStatusLine::parse(line).map_err(HttpResponseParseError::InvalidStatusLine)?;
                self.head = Some(HttpResponseHead::new(
                    status.version,
                    status.code,
                    status.reason,
                ));
                self.framing = BodyFraming::default();
                self.state = ParseState::HeaderLine;
            }
            ParseState::HeaderLine => {
                if is_blank_line(line) {
                    self.end_of_header();
                } else {
                    let header = HttpHeaderLine::parse(line)
                        .map_err(HttpResponseParseError::InvalidHeaderLine)?;
                    self.handle_header(header)?;
                }
            }
            ParseState::ChunkSizeLine => {
                let chunk = HttpChunkedLine::parse(line)
                    .map_err(HttpResponseParseError::InvalidChunkSizeLine)?;
                if chunk.chunk_size == 0 {
                    self.state = ParseState::Trailer;
                } else {
                    self.state = ParseState::ChunkData(chunk.chunk_size);
                }
            }
            ParseState::ChunkDataEnd => {
                if is_blank_line(line) {
                    self.state = ParseState::ChunkSizeLine;
                } else {
                    return Err(HttpResponseParseError::InvalidChunkDataEnd);
                }
            }
            ParseState::Trailer => {
                // trailer fields are not exposed
                if is_blank_line(line) {
                    self.finish();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_header(&mut self, header: HttpHeaderLine) -> Result<(), HttpResponseParseError> {
        match header.name.to_ascii_lowercase().as_str() {
            "transfer-encoding" => {
                self.framing.has_transfer_encoding = true;
                if self.framing.has_content_length {
                    self.framing.content_length = 0;
                }

                let v = header.value.to_lowercase();
                if v.ends_with("chunked") {
                    self.framing.chunked_transfer = true;
                } else if v.contains("chunked") {
                    return Err(HttpResponseParseError::InvalidChunkedTransferEncoding);
                }
            }
            "content-length" => {
                if !self.framing.has_transfer_encoding {
                    let content_length = u64::from_str(header.value)
                        .map_err(|_| HttpResponseParseError::InvalidContentLength)?;

                    if self.framing.has_content_length
                        && self.framing.content_length != content_length
                    {
                        return Err(HttpResponseParseError::InvalidContentLength);
                    }
                    self.framing.has_content_length = true;
                    self.framing.content_length = content_length;
                }
            }
            _ => {}
        }

        if let Some(head) = &mut self.head {
            head.headers
                .push((header.name.to_string(), header.value.to_string()));
        }
        Ok(())
    }

    fn end_of_header(&mut self) {
        let Some(head) = &self.head else {
            return;
        };

        if head.is_informational() {
            // wait for the final response
            self.header_size = 0;
            self.state = ParseState::StatusLine;
            return;
        }

        self.handler.on_header(head);

        if head.has_no_body() {
            self.finish();
        } else if self.framing.chunked_transfer {
            self.state = ParseState::ChunkSizeLine;
        } else if self.framing.has_content_length {
            if self.framing.content_length == 0 {
                self.finish();
            } else {
                self.state = ParseState::FixedBody(self.framing.content_length);
            }
        } else {
            self.state = ParseState::UntilClose;
        }
    }

    fn finish(&mut self) {
        self.state = ParseState::Finished;
        self.handler.on_finish();
    }
}

fn body_span_len(left: u64, available: usize) -> usize {
    usize::try_from(left).unwrap_or(usize::MAX).min(available)
}
