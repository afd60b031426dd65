/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::thread::JoinHandle;

use anstyle::{AnsiColor, Color, Style};
use chrono::Local;
use flume::{Receiver, Sender};
use slog::{Drain, KV, Level, OwnedKVList, Record};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub(super) struct StdLogValue {
    level: Level,
    message: String,
    kv_pairs: Vec<(String, String)>,
    location: Option<String>,
}

impl StdLogValue {
    fn message_str(&self) -> &str {
        if self.message.is_empty() {
            "()"
        } else {
            &self.message
        }
    }
}

struct KvCollector<'a> {
    pairs: &'a mut Vec<(String, String)>,
}

impl slog::Serializer for KvCollector<'_> {
    fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
        self.pairs.push((key.to_string(), val.to_string()));
        Ok(())
    }
}

pub(super) struct StderrLogger {
    sender: Sender<StdLogValue>,
    append_code_position: bool,
}

impl StderrLogger {
    fn format_slog(
        &self,
        record: &Record,
        logger_values: &OwnedKVList,
    ) -> Result<StdLogValue, slog::Error> {
        let mut kv_pairs = Vec::new();
        let mut collector = KvCollector {
            pairs: &mut kv_pairs,
        };
        record.kv().serialize(record, &mut collector)?;
        logger_values.serialize(record, &mut collector)?;

        let location = if self.append_code_position {
            Some(format!("{}:{}", record.file(), record.line()))
        } else {
            None
        };

        Ok(StdLogValue {
            level: record.level(),
            message: record.msg().to_string(),
            kv_pairs,
            location,
        })
    }
}

impl Drain for StderrLogger {
    type Ok = ();
    type Err = slog::Error;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Error> {
        let v = self.format_slog(record, logger_values)?;
        // drop the log if the io thread is lagging behind
        let _ = self.sender.try_send(v);
        Ok(())
    }
}

pub(super) fn new_async_logger(
    channel_capacity: usize,
    append_code_position: bool,
) -> io::Result<(StderrLogger, JoinHandle<()>)> {
    let (sender, receiver) = flume::bounded::<StdLogValue>(channel_capacity);

    let io_thread = AsyncIoThread { receiver };
    let handle = std::thread::Builder::new()
        .name("log-stderr".to_string())
        .spawn(move || io_thread.run_with_stderr())?;

    let logger = StderrLogger {
        sender,
        append_code_position,
    };
    Ok((logger, handle))
}

struct AsyncIoThread {
    receiver: Receiver<StdLogValue>,
}

impl AsyncIoThread {
    fn run_with_stderr(self) {
        let stderr = io::stderr();
        let console = stderr.is_terminal();
        let mut io = stderr.lock();
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        while let Ok(v) = self.receiver.recv() {
            buf.clear();
            let _ = write_value(&mut buf, v, console);
            let _ = io.write_all(&buf);

            while let Ok(v) = self.receiver.try_recv() {
                buf.clear();
                let _ = write_value(&mut buf, v, console);
                let _ = io.write_all(&buf);
            }

            let _ = io.flush();
        }
    }
}

fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Critical => AnsiColor::Magenta,
        Level::Error => AnsiColor::Red,
        Level::Warning => AnsiColor::Yellow,
        Level::Info => AnsiColor::Green,
        Level::Debug => AnsiColor::Cyan,
        Level::Trace => AnsiColor::Blue,
    };
    Style::new().fg_color(Some(Color::Ansi(color)))
}

fn write_value<W: Write>(io: &mut W, v: StdLogValue, console: bool) -> io::Result<()> {
    let bold = if console { Style::new().bold() } else { Style::new() };
    let italic = if console { Style::new().italic() } else { Style::new() };
    let level_style = if console {
        level_style(v.level)
    } else {
        Style::new()
    };

    write!(io, "{}", Local::now().format(TIME_FORMAT))?;
    write!(
        io,
        " {}{}{}",
        level_style.render(),
        v.level.as_short_str(),
        level_style.render_reset()
    )?;
    for (k, v) in &v.kv_pairs {
        write!(io, " {}{k}{}={v},", bold.render(), bold.render_reset())?;
    }
    write!(
        io,
        " {}{}{}",
        bold.render(),
        v.message_str(),
        bold.render_reset()
    )?;
    if let Some(location) = &v.location {
        write!(
            io,
            " <{}{location}{}>",
            italic.render(),
            italic.render_reset()
        )?;
    }
    writeln!(io)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line() {
        let v = StdLogValue {
            level: Level::Warning,
            message: "connection closed".to_string(),
            kv_pairs: vec![("peer".to_string(), "127.0.0.1:80".to_string())],
            location: Some("src/reader.rs:10".to_string()),
        };
        let mut buf = Vec::new();
        write_value(&mut buf, v, false).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.ends_with(" WARN peer=127.0.0.1:80, connection closed <src/reader.rs:10>\n"));
    }

    #[test]
    fn empty_message() {
        let v = StdLogValue {
            level: Level::Info,
            message: String::new(),
            kv_pairs: Vec::new(),
            location: None,
        };
        let mut buf = Vec::new();
        write_value(&mut buf, v, false).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.ends_with(" INFO ()\n"));
    }
}
