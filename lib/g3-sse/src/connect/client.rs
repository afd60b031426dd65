/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

use super::{HttpConnectRequest, HttpConnectResponse, ProxyConnectError};
use crate::net::{HttpAuth, UpstreamAddr};

const CONNECT_RESPONSE_MAX_HEADER_SIZE: usize = 4096;

/// Open a CONNECT tunnel to `addr` on a stream already connected to the proxy.
pub async fn http_connect_to<S>(
    stream: S,
    auth: &HttpAuth,
    addr: &UpstreamAddr,
) -> Result<S, ProxyConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let req = HttpConnectRequest::new(addr, auth);

    let mut buf_stream = BufReader::new(stream);
    req.send(buf_stream.get_mut())
        .await
        .map_err(ProxyConnectError::WriteFailed)?;

    let rsp = HttpConnectResponse::recv(&mut buf_stream, CONNECT_RESPONSE_MAX_HEADER_SIZE).await?;
    debug!("tunnel to {addr} established: {} {}", rsp.code, rsp.reason);

    // the peer won't send anything before we send the first request
    Ok(buf_stream.into_inner())
}
