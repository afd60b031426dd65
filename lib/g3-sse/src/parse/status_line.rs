/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use atoi::FromRadix10Checked;

use super::HttpLineParseError;

pub struct HttpStatusLine<'a> {
    /// minor version of HTTP/1.x
    pub version: u8,
    pub code: u16,
    pub reason: &'a str,
}

impl<'a> HttpStatusLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<HttpStatusLine<'a>, HttpLineParseError> {
        const MINIMAL_LENGTH: usize = 13; // HTTP/1.x XYZ\n

        if buf.len() < MINIMAL_LENGTH {
            return Err(HttpLineParseError::NotLongEnough);
        }

        let Some(p) = memchr::memchr(b' ', buf) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        let version: u8 = match &buf[0..p] {
            b"HTTP/1.0" => 0,
            b"HTTP/1.1" => 1,
            _ => return Err(HttpLineParseError::InvalidVersion),
        };

        let left = &buf[p + 1..];
        let (code, len) = u16::from_radix_10_checked(left);
        let Some(code) = code else {
            return Err(HttpLineParseError::InvalidStatusCode);
        };
        if len != 3 || code < 100 {
            return Err(HttpLineParseError::InvalidStatusCode);
        }

        let reason = match left.get(len) {
            Some(b' ') => std::str::from_utf8(&left[len + 1..])?.trim(),
            Some(b'\r' | b'\n') => "",
            _ => return Err(HttpLineParseError::InvalidStatusCode),
        };

        Ok(HttpStatusLine {
            version,
            code,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        let s = HttpStatusLine::parse(b"HTTP/1.1 200 OK\r\n").unwrap();
        assert_eq!(s.version, 1);
        assert_eq!(s.code, 200);
        assert_eq!(s.reason, "OK");

        let s = HttpStatusLine::parse(b"HTTP/1.0 404 Not Found\n").unwrap();
        assert_eq!(s.version, 0);
        assert_eq!(s.code, 404);
        assert_eq!(s.reason, "Not Found");
    }

    #[test]
    fn no_reason() {
        let s = HttpStatusLine::parse(b"HTTP/1.1 204\r\n").unwrap();
        assert_eq!(s.code, 204);
        assert_eq!(s.reason, "");
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            HttpStatusLine::parse(b"HTTP/1.1\r\n"),
            Err(HttpLineParseError::NotLongEnough)
        ));
        assert!(matches!(
            HttpStatusLine::parse(b"HTTP/2.0 200 OK\r\n"),
            Err(HttpLineParseError::InvalidVersion)
        ));
        assert!(matches!(
            HttpStatusLine::parse(b"HTTP/1.1 20x OK\r\n"),
            Err(HttpLineParseError::InvalidStatusCode)
        ));
        assert!(matches!(
            HttpStatusLine::parse(b"HTTP/1.1 2000 OK\r\n"),
            Err(HttpLineParseError::InvalidStatusCode)
        ));
    }
}
