/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use crate::net::HttpBasicAuth;

pub fn proxy_authorization_basic(auth: &HttpBasicAuth) -> String {
    format!("Proxy-Authorization: Basic {}\r\n", auth.encoded_value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_proxy_authorization_basic() {
        let auth = HttpBasicAuth::new("user", "pass");
        assert_eq!(
            proxy_authorization_basic(&auth),
            "Proxy-Authorization: Basic dXNlcjpwYXNz\r\n"
        );

        // ":" base64 encoded
        let auth = HttpBasicAuth::new("", "");
        assert_eq!(
            proxy_authorization_basic(&auth),
            "Proxy-Authorization: Basic Og==\r\n"
        );
    }
}
