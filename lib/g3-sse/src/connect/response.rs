/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use super::ProxyConnectError;
use crate::HttpStatusLine;
use crate::parse::is_blank_line;

#[derive(Debug)]
pub struct HttpConnectResponse {
    pub code: u16,
    pub reason: String,
}

impl HttpConnectResponse {
    async fn read_line<R>(
        reader: &mut R,
        line_buf: &mut Vec<u8>,
        header_size: &mut usize,
        max_header_size: usize,
    ) -> Result<(), ProxyConnectError>
    where
        R: AsyncBufRead + Unpin,
    {
        let max_len = max_header_size - *header_size;
        line_buf.clear();
        let nr = reader
            .take(max_len as u64)
            .read_until(b'\n', line_buf)
            .await
            .map_err(ProxyConnectError::ReadFailed)?;
        if nr == 0 {
            return Err(ProxyConnectError::RemoteClosed);
        }
        if line_buf.last() != Some(&b'\n') {
            return if nr < max_len {
                Err(ProxyConnectError::RemoteClosed)
            } else {
                Err(ProxyConnectError::TooLargeHeader(max_header_size))
            };
        }
        *header_size += nr;
        Ok(())
    }

    async fn parse<R>(reader: &mut R, max_header_size: usize) -> Result<Self, ProxyConnectError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line_buf = Vec::<u8>::with_capacity(256);
        let mut header_size: usize = 0;

        Self::read_line(reader, &mut line_buf, &mut header_size, max_header_size).await?;
        let status =
            HttpStatusLine::parse(&line_buf).map_err(ProxyConnectError::InvalidStatusLine)?;
        let rsp = HttpConnectResponse {
            code: status.code,
            reason: status.reason.to_string(),
        };

        // the header lines are of no use for the tunnel
        loop {
            if header_size >= max_header_size {
                return Err(ProxyConnectError::TooLargeHeader(max_header_size));
            }
            Self::read_line(reader, &mut line_buf, &mut header_size, max_header_size).await?;
            if is_blank_line(&line_buf) {
                break;
            }
        }

        Ok(rsp)
    }

    fn detect_error(&self) -> Result<(), ProxyConnectError> {
        if self.code >= 200 && self.code < 300 {
            Ok(())
        } else if self.code == 504 || self.code == 522 || self.code == 524 {
            // Peer tells us it timeout
            Err(ProxyConnectError::PeerTimeout(self.code))
        } else {
            Err(ProxyConnectError::UnexpectedStatusCode(
                self.code,
                self.reason.to_string(),
            ))
        }
    }

    pub async fn recv<R>(reader: &mut R, max_header_size: usize) -> Result<Self, ProxyConnectError>
    where
        R: AsyncBufRead + Unpin,
    {
        let rsp = HttpConnectResponse::parse(reader, max_header_size).await?;
        rsp.detect_error()?;
        Ok(rsp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn established() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 200 Connection established\r\n")
            .read(b"Proxy-Agent: test\r\n\r\n")
            .build();
        let mut reader = BufReader::new(stream);
        let rsp = HttpConnectResponse::recv(&mut reader, 1024).await.unwrap();
        assert_eq!(rsp.code, 200);
        assert_eq!(rsp.reason, "Connection established");
    }

    #[tokio::test]
    async fn rejected() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 407 Proxy Authentication Required\r\n\r\n")
            .build();
        let mut reader = BufReader::new(stream);
        let r = HttpConnectResponse::recv(&mut reader, 1024).await;
        assert!(matches!(
            r,
            Err(ProxyConnectError::UnexpectedStatusCode(407, _))
        ));
    }

    #[tokio::test]
    async fn peer_timeout() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 504 Gateway Timeout\r\n\r\n")
            .build();
        let mut reader = BufReader::new(stream);
        let r = HttpConnectResponse::recv(&mut reader, 1024).await;
        assert!(matches!(r, Err(ProxyConnectError::PeerTimeout(504))));
    }

    #[tokio::test]
    async fn closed() {
        let stream = Builder::new().read(b"HTTP/1.1 200 OK\r\n").build();
        let mut reader = BufReader::new(stream);
        let r = HttpConnectResponse::recv(&mut reader, 1024).await;
        assert!(matches!(r, Err(ProxyConnectError::RemoteClosed)));
    }

    #[tokio::test]
    async fn too_large() {
        let stream = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nX-Padding: 0123456789abcdef0123456789\r\n\r\n")
            .build();
        let mut reader = BufReader::new(stream);
        let r = HttpConnectResponse::recv(&mut reader, 32).await;
        assert!(matches!(r, Err(ProxyConnectError::TooLargeHeader(32))));
    }
}
