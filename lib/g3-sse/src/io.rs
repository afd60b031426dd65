/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::StreamingHttpError;
use crate::net::UpstreamAddr;

/// The byte stream a response is read from.
pub trait StreamingIo: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> StreamingIo for T {}

pub type BoxStreamingIo = Box<dyn StreamingIo>;

pub enum ReadPartial {
    Data(usize),
    Eof,
}

/// Read at most `buf.len()` bytes, waiting no longer than `timeout` for the first byte.
pub async fn read_partial<R>(
    reader: &mut R,
    buf: &mut [u8],
    timeout: Duration,
) -> Result<ReadPartial, StreamingHttpError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    match tokio::time::timeout(timeout, reader.read(buf)).await {
        Ok(Ok(0)) => Ok(ReadPartial::Eof),
        Ok(Ok(nr)) => Ok(ReadPartial::Data(nr)),
        Ok(Err(e)) => Err(StreamingHttpError::ReadFailed(e)),
        Err(_) => Err(StreamingHttpError::ReadTimeout(timeout)),
    }
}

pub async fn tcp_connect_to(peer: &UpstreamAddr) -> Result<TcpStream, StreamingHttpError> {
    let stream = TcpStream::connect((peer.host(), peer.port()))
        .await
        .map_err(|e| StreamingHttpError::ConnectFailed(peer.clone(), e))?;
    if let Err(e) = stream.set_nodelay(true) {
        debug!("failed to set nodelay on socket to {peer}: {e}");
    }
    debug!("tcp connected to {peer}");
    Ok(stream)
}

fn new_tls_client_config() -> Result<ClientConfig, rustls::Error> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth();
    Ok(config)
}

pub async fn tls_connect_to<S>(
    stream: S,
    tls_name: &str,
) -> Result<TlsStream<S>, StreamingHttpError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let server_name = ServerName::try_from(tls_name.to_string())
        .map_err(|_| StreamingHttpError::InvalidTlsName(tls_name.to_string()))?;
    let config = new_tls_client_config().map_err(|e| {
        StreamingHttpError::TlsHandshakeFailed(tls_name.to_string(), io::Error::other(e))
    })?;
    let connector = TlsConnector::from(Arc::new(config));
    let tls_stream = connector
        .connect(server_name, stream)
        .await
        .map_err(|e| StreamingHttpError::TlsHandshakeFailed(tls_name.to_string(), e))?;
    debug!("tls handshake with {tls_name} done");
    Ok(tls_stream)
}
