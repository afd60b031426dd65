/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use atoi::FromRadix16Checked;

use super::HttpLineParseError;

pub struct HttpChunkedLine<'a> {
    pub chunk_size: u64,
    pub extension: Option<&'a str>,
}

impl<'a> HttpChunkedLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<HttpChunkedLine<'a>, HttpLineParseError> {
        let (chunk_size, offset) = u64::from_radix_16_checked(buf);
        let Some(chunk_size) = chunk_size else {
            return Err(HttpLineParseError::InvalidChunkSize);
        };
        if offset == 0 {
            return Err(HttpLineParseError::InvalidChunkSize);
        }

        let left = &buf[offset..];
        let left = match left.iter().position(|c| *c != b' ' && *c != b'\t') {
            Some(p) => &left[p..],
            None => return Err(HttpLineParseError::NotLongEnough),
        };

        match left[0] {
            b'\r' | b'\n' => Ok(HttpChunkedLine {
                chunk_size,
                extension: None,
            }),
            b';' => {
                let extension = std::str::from_utf8(&left[1..])?.trim();
                Ok(HttpChunkedLine {
                    chunk_size,
                    extension: Some(extension),
                })
            }
            _ => Err(HttpLineParseError::InvalidChunkSize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple() {
        let chunk = HttpChunkedLine::parse(b"1\r\n").unwrap();
        assert_eq!(chunk.chunk_size, 1);
        assert!(chunk.extension.is_none());

        let chunk = HttpChunkedLine::parse(b"1F\n").unwrap();
        assert_eq!(chunk.chunk_size, 0x1f);

        let chunk = HttpChunkedLine::parse(b"0 \r\n").unwrap();
        assert_eq!(chunk.chunk_size, 0);
    }

    #[test]
    fn with_extension() {
        let chunk = HttpChunkedLine::parse(b"a; name=value\r\n").unwrap();
        assert_eq!(chunk.chunk_size, 10);
        assert_eq!(chunk.extension, Some("name=value"));
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            HttpChunkedLine::parse(b"xyz\r\n"),
            Err(HttpLineParseError::InvalidChunkSize)
        ));
        assert!(matches!(
            HttpChunkedLine::parse(b"10"),
            Err(HttpLineParseError::NotLongEnough)
        ));
        assert!(matches!(
            HttpChunkedLine::parse(b"ffffffffffffffffff\r\n"),
            Err(HttpLineParseError::InvalidChunkSize)
        ));
    }
}
