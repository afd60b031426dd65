/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::{StreamingHttpError, StreamingHttpErrorKind};

mod config;
pub use config::StreamingHttpConfig;

pub mod net;

mod parse;
pub use parse::{HttpChunkedLine, HttpHeaderLine, HttpLineParseError, HttpStatusLine};

mod parser;
pub use parser::{
    HttpResponseHandler, HttpResponseHead, HttpResponseParseError, HttpResponseParser,
};

pub mod header;
pub use header::ResponseHeaders;

mod request;
pub use request::HttpGetRequest;

pub mod connect;

pub mod io;

mod reader;
pub use reader::{DEFAULT_CHUNK_SIZE, HttpResponseReadState, HttpResponseReader};

mod connection;
pub use connection::StreamingHttpConnection;
