/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};

use url::Url;

/// The head of a `GET` request, sent as is without any implicit header.
pub struct HttpGetRequest<'a> {
    target: &'a Url,
    headers: &'a [(String, String)],
}

impl<'a> HttpGetRequest<'a> {
    pub fn new(target: &'a Url, headers: &'a [(String, String)]) -> Self {
        HttpGetRequest { target, headers }
    }

    fn write_request_line<W: Write>(&self, buf: &mut W) -> io::Result<()> {
        buf.write_all(b"GET ")?;
        buf.write_all(self.target.path().as_bytes())?;
        if let Some(s) = self.target.query() {
            write!(buf, "?{s}")?;
        }
        buf.write_all(b" HTTP/1.1\r\n")
    }

    pub fn write_to<W: Write>(&self, buf: &mut W) -> io::Result<()> {
        self.write_request_line(buf)?;
        for (name, value) in self.headers {
            write!(buf, "{name}: {value}\r\n")?;
        }
        buf.write_all(b"\r\n")
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1024);
        // writing to a Vec never fails
        let _ = self.write_to(&mut buf);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header() {
        let url = Url::parse("http://127.0.0.1:8080").unwrap();
        let req = HttpGetRequest::new(&url, &[]);
        assert_eq!(req.to_vec(), b"GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn with_query_and_headers() {
        let url = Url::parse("https://stream.example.com/events?ch=1&since=2").unwrap();
        let headers = vec![
            ("Host".to_string(), "stream.example.com".to_string()),
            ("Accept".to_string(), "text/event-stream".to_string()),
            ("Last-Event-ID".to_string(), "42".to_string()),
        ];
        let req = HttpGetRequest::new(&url, &headers);
        assert_eq!(
            req.to_vec(),
            b"GET /events?ch=1&since=2 HTTP/1.1\r\n\
              Host: stream.example.com\r\n\
              Accept: text/event-stream\r\n\
              Last-Event-ID: 42\r\n\r\n"
        );
    }
}
