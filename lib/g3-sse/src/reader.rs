/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use log::{debug, warn};
use tokio::io::AsyncRead;

use crate::io::{ReadPartial, read_partial};
use crate::parser::DEFAULT_MAX_HEADER_SIZE;
use crate::{
    HttpResponseHandler, HttpResponseHead, HttpResponseParser, ResponseHeaders,
    StreamingHttpError,
};

pub const DEFAULT_CHUNK_SIZE: usize = 10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpResponseReadState {
    AwaitingHeaders,
    Streaming,
    Finished,
}

/// State shared between the reader and the parser callbacks.
#[derive(Default)]
struct SharedState {
    /// body bytes received but not yet returned
    buffer: BytesMut,
    finished: bool,
    head: Option<(u16, ResponseHeaders)>,
}

impl SharedState {
    /// Split off the first line, including its `\n`, `\r` or `\r\n` terminator.
    fn take_line(&mut self) -> Option<BytesMut> {
        let p = memchr::memchr2(b'\r', b'\n', &self.buffer)?;
        let end = if self.buffer[p] == b'\r' && self.buffer.get(p + 1) == Some(&b'\n') {
            p + 2
        } else {
            p + 1
        };
        Some(self.buffer.split_to(end))
    }
}

struct ReaderEventSink {
    shared: Arc<Mutex<SharedState>>,
}

impl HttpResponseHandler for ReaderEventSink {
    fn on_header(&mut self, head: &HttpResponseHead) {
        let mut shared = self.shared.lock().unwrap();
        if shared.head.is_none() {
            shared.head = Some((head.code, head.lower_cased_headers()));
        }
    }

    fn on_body(&mut self, data: &[u8]) {
        let mut shared = self.shared.lock().unwrap();
        shared.buffer.extend_from_slice(data);
    }

    fn on_finish(&mut self) {
        let mut shared = self.shared.lock().unwrap();
        shared.finished = true;
    }
}

/// Reader of a single HTTP response, as a sequence of lines or as a whole body.
///
/// The status code and headers are always available, as the reader can only be
/// created after they have been received.
pub struct HttpResponseReader<S> {
    io: Option<S>,
    read_timeout: Duration,
    read_buf: Box<[u8]>,
    parser: HttpResponseParser<ReaderEventSink>,
    shared: Arc<Mutex<SharedState>>,
    status: u16,
    headers: ResponseHeaders,
}

impl<S> HttpResponseReader<S>
where
    S: AsyncRead + Unpin,
{
    pub async fn new(io: S, read_timeout: Duration) -> Result<Self, StreamingHttpError> {
        HttpResponseReader::with_limits(io, read_timeout, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_HEADER_SIZE)
            .await
    }

    /// Wait until the response header has been received.
    ///
    /// `chunk_size` is the max size of each socket read.
    pub async fn with_limits(
        io: S,
        read_timeout: Duration,
        chunk_size: usize,
        max_header_size: usize,
    ) -> Result<Self, StreamingHttpError> {
        let shared = Arc::new(Mutex::new(SharedState::default()));
        let sink = ReaderEventSink {
            shared: Arc::clone(&shared),
        };

        let mut reader = HttpResponseReader {
            io: Some(io),
            read_timeout,
            read_buf: vec![0u8; chunk_size.max(1)].into_boxed_slice(),
            parser: HttpResponseParser::with_max_header_size(sink, max_header_size),
            shared,
            status: 0,
            headers: ResponseHeaders::default(),
        };

        let (status, headers) = loop {
            if let Some(head) = reader.received_head() {
                break head;
            }
            if !reader.read_chunk_into_buffer().await? {
                return Err(StreamingHttpError::UnexpectedEof);
            }
        };
        reader.status = status;
        reader.headers = headers;
        Ok(reader)
    }

    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[inline]
    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    pub fn state(&self) -> HttpResponseReadState {
        let shared = self.shared.lock().unwrap();
        if shared.finished {
            HttpResponseReadState::Finished
        } else if shared.head.is_some() {
            HttpResponseReadState::Streaming
        } else {
            HttpResponseReadState::AwaitingHeaders
        }
    }

    /// Size of the body data received but not yet returned.
    pub fn buffered_len(&self) -> usize {
        self.shared.lock().unwrap().buffer.len()
    }

    pub fn is_closed(&self) -> bool {
        self.io.is_none()
    }

    /// Drop the underlying stream. Any further socket read will fail.
    pub fn close(&mut self) {
        if self.io.take().is_some() {
            debug!("response stream closed");
        }
    }

    fn received_head(&self) -> Option<(u16, ResponseHeaders)> {
        self.shared.lock().unwrap().head.clone()
    }

    fn is_finished(&self) -> bool {
        self.shared.lock().unwrap().finished
    }

    /// Read once from the socket and feed the data to the parser.
    ///
    /// Returns false if no more data will be available. The stream is released on
    /// error, while data already buffered is kept.
    async fn read_chunk_into_buffer(&mut self) -> Result<bool, StreamingHttpError> {
        if self.is_finished() {
            return Ok(false);
        }
        let Some(io) = self.io.as_mut() else {
            return Err(StreamingHttpError::Closed);
        };

        let r = match read_partial(io, &mut self.read_buf, self.read_timeout).await {
            Ok(ReadPartial::Eof) => {
                if !self.parser.finish_on_eof() && self.parser.head().is_some() {
                    warn!("connection closed before the end of response body");
                } else {
                    debug!("connection closed by peer");
                }
                Ok(false)
            }
            Ok(ReadPartial::Data(nr)) => self
                .parser
                .feed(&self.read_buf[..nr])
                .map(|_| true)
                .map_err(StreamingHttpError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = &r {
            debug!("response stream closed after error: {e}");
            self.io = None;
        }
        r
    }

    fn take_buffered_line(&self) -> Option<String> {
        let mut shared = self.shared.lock().unwrap();
        let line = shared.take_line()?;
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn take_buffered_remaining(&self) -> Option<String> {
        let mut shared = self.shared.lock().unwrap();
        if shared.buffer.is_empty() {
            None
        } else {
            let left = shared.buffer.split();
            Some(String::from_utf8_lossy(&left).into_owned())
        }
    }

    /// Get the next line of the body, including the line terminator.
    ///
    /// The unterminated data at the end of the body, if any, will be returned as the
    /// last line. `None` is returned when all of the body has been consumed.
    pub async fn next_line(&mut self) -> Result<Option<String>, StreamingHttpError> {
        loop {
            if let Some(line) = self.take_buffered_line() {
                return Ok(Some(line));
            }
            if !self.read_chunk_into_buffer().await? {
                return Ok(self.take_buffered_remaining());
            }
        }
    }

    /// Lines of the body, see [`HttpResponseReader::next_line`].
    ///
    /// The stream ends after the first error.
    pub fn read_lines(&mut self) -> impl Stream<Item = Result<String, StreamingHttpError>> + '_ {
        futures_util::stream::try_unfold(self, |reader| async move {
            let line = reader.next_line().await?;
            Ok::<_, StreamingHttpError>(line.map(|line| (line, reader)))
        })
    }

    /// Wait for the end of the response and return all body data not yet consumed.
    pub async fn read_all(&mut self) -> Result<Bytes, StreamingHttpError> {
        while self.read_chunk_into_buffer().await? {}
        let mut shared = self.shared.lock().unwrap();
        Ok(shared.buffer.split().freeze())
    }
}
