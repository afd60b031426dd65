/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use log::{debug, info, warn};

use g3_sse::StreamingHttpConnection;

mod logging;
mod opts;
use opts::ProcArgs;

fn main() -> anyhow::Result<ExitCode> {
    let args = opts::build_cli_args().get_matches();
    let proc_args = opts::parse_cli_args(&args)?;

    let _log_guard = logging::setup_log(proc_args.verbose).context("failed to setup logger")?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    rt.block_on(run(proc_args))
}

async fn run(proc_args: ProcArgs) -> anyhow::Result<ExitCode> {
    let config = &proc_args.config;
    if let Some(proxy) = config.proxy() {
        info!("connecting to {} via proxy {}", config.target(), proxy.peer());
    } else {
        info!("connecting to {}", config.target());
    }

    let mut conn = StreamingHttpConnection::connect(config)
        .await
        .context(format!("failed to open {}", config.target()))?;
    let status = conn.status();
    if let Some(content_type) = conn.headers().get("content-type") {
        info!("response status {status}, content type {content_type}");
    } else {
        info!("response status {status}");
    }
    if !(200..300).contains(&status) {
        warn!("unexpected response status {status}");
    }

    let mut stdout = io::stdout().lock();
    if proc_args.read_all {
        let body = conn.read_all().await?;
        stdout.write_all(&body)?;
        stdout.flush()?;
    } else {
        let mut count = 0usize;
        while let Some(line) = conn.next_line().await? {
            stdout.write_all(line.as_bytes())?;
            stdout.flush()?;
            count += 1;
            if proc_args.max_lines.is_some_and(|max| count >= max) {
                debug!("stopped after {count} lines");
                break;
            }
        }
    }
    conn.close();

    if (200..300).contains(&status) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
