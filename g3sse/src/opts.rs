/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};
use url::Url;

use g3_sse::StreamingHttpConfig;

const ARG_URL: &str = "url";
const ARG_PROXY: &str = "proxy";
const ARG_HEADER: &str = "header";
const ARG_CONNECT_TIMEOUT: &str = "connect-timeout";
const ARG_READ_TIMEOUT: &str = "read-timeout";
const ARG_HEADER_SIZE: &str = "header-size";
const ARG_CHUNK_SIZE: &str = "chunk-size";
const ARG_ALL: &str = "all";
const ARG_MAX_LINES: &str = "max-lines";
const ARG_VERBOSE: &str = "verbose";

pub(crate) struct ProcArgs {
    pub(crate) config: StreamingHttpConfig,
    pub(crate) read_all: bool,
    pub(crate) max_lines: Option<usize>,
    pub(crate) verbose: u8,
}

pub(crate) fn build_cli_args() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read a streaming HTTP response line by line")
        .arg(
            Arg::new(ARG_URL)
                .help("Target url, http or https")
                .value_name("URL")
                .required(true)
                .num_args(1)
                .value_parser(value_parser!(Url))
                .value_hint(ValueHint::Url),
        )
        .arg(
            Arg::new(ARG_PROXY)
                .help("Use an HTTP CONNECT proxy")
                .value_name("PROXY URL")
                .short('x')
                .long(ARG_PROXY)
                .num_args(1)
                .value_hint(ValueHint::Url),
        )
        .arg(
            Arg::new(ARG_HEADER)
                .help("Set a request header, can be used multiple times")
                .value_name("NAME: VALUE")
                .short('H')
                .long(ARG_HEADER)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new(ARG_CONNECT_TIMEOUT)
                .help("Timeout for connection setup, including proxy and tls handshake")
                .value_name("TIMEOUT DURATION")
                .long(ARG_CONNECT_TIMEOUT)
                .num_args(1)
                .default_value("10s"),
        )
        .arg(
            Arg::new(ARG_READ_TIMEOUT)
                .help("Timeout for each read from the connection")
                .value_name("TIMEOUT DURATION")
                .long(ARG_READ_TIMEOUT)
                .num_args(1)
                .default_value("300s"),
        )
        .arg(
            Arg::new(ARG_HEADER_SIZE)
                .help("Max size of the response header")
                .value_name("SIZE")
                .long(ARG_HEADER_SIZE)
                .num_args(1)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_CHUNK_SIZE)
                .help("Max size of each read from the connection")
                .value_name("SIZE")
                .long(ARG_CHUNK_SIZE)
                .num_args(1)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_ALL)
                .help("Wait for the end of the response and print the whole body")
                .long(ARG_ALL)
                .action(ArgAction::SetTrue)
                .conflicts_with(ARG_MAX_LINES),
        )
        .arg(
            Arg::new(ARG_MAX_LINES)
                .help("Stop after printing this many lines")
                .value_name("COUNT")
                .long(ARG_MAX_LINES)
                .num_args(1)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_VERBOSE)
                .help("Show more logs on stderr, can be repeated")
                .short('v')
                .long(ARG_VERBOSE)
                .action(ArgAction::Count),
        )
}

fn parse_duration(args: &ArgMatches, id: &str) -> anyhow::Result<Option<Duration>> {
    let Some(s) = args.get_one::<String>(id) else {
        return Ok(None);
    };
    match humanize_rs::duration::parse(s) {
        Ok(d) => Ok(Some(d)),
        Err(humanize_rs::ParseError::MissingUnit) => {
            let secs = u64::from_str(s).map_err(|_| anyhow!("invalid {id} value {s}"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(e) => Err(anyhow!("invalid {id} value {s}: {e}")),
    }
}

fn has_host_header(config: &StreamingHttpConfig) -> bool {
    config
        .headers()
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("host"))
}

fn host_header_value(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host.to_string()),
    }
}

pub(crate) fn parse_cli_args(args: &ArgMatches) -> anyhow::Result<ProcArgs> {
    let url = args
        .get_one::<Url>(ARG_URL)
        .ok_or_else(|| anyhow!("no target url set"))?
        .clone();
    let mut config = StreamingHttpConfig::new(url).context("invalid target url")?;

    if let Some(proxy) = args.get_one::<String>(ARG_PROXY) {
        config.set_proxy_url(proxy)?;
    }

    if let Some(headers) = args.get_many::<String>(ARG_HEADER) {
        for s in headers {
            let Some((name, value)) = s.split_once(':') else {
                return Err(anyhow!("invalid HTTP header: {s}"));
            };
            config.append_header(name.trim(), value.trim())?;
        }
    }
    // the request is sent as is, so add the mandatory Host header here
    if !has_host_header(&config)
        && let Some(host) = host_header_value(config.target())
    {
        config.append_header("Host", &host)?;
    }

    if let Some(timeout) = parse_duration(args, ARG_CONNECT_TIMEOUT)? {
        config.connect_timeout = timeout;
    }
    if let Some(timeout) = parse_duration(args, ARG_READ_TIMEOUT)? {
        config.read_timeout = timeout;
    }
    if let Some(size) = args.get_one::<usize>(ARG_HEADER_SIZE) {
        config.max_header_size = *size;
    }
    if let Some(size) = args.get_one::<usize>(ARG_CHUNK_SIZE) {
        config.set_chunk_size(*size)?;
    }

    Ok(ProcArgs {
        config,
        read_all: args.get_flag(ARG_ALL),
        max_lines: args.get_one::<usize>(ARG_MAX_LINES).copied(),
        verbose: args.get_count(ARG_VERBOSE),
    })
}
