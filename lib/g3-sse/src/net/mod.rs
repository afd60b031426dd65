/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

mod upstream;
pub use upstream::UpstreamAddr;

mod auth;
pub use auth::{HttpAuth, HttpBasicAuth};

mod proxy;
pub use proxy::HttpProxy;

#[derive(Debug, Error)]
pub enum UrlParseError {
    #[error("invalid scheme {0}")]
    InvalidScheme(String),
    #[error("no host found")]
    NoHostFound,
    #[error("no port found")]
    NoPortFound,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid password")]
    InvalidPassword,
}
