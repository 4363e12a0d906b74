// src/logger.rs
//! 対話入力と色付きメッセージ出力
//!
//! 入出力はすべて `Console` を通す。本番では stdin / stdout、
//! テストではメモリ上のバッファを渡す。

use owo_colors::{OwoColorize, Stream};
use std::io::{self, BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
    verbose: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, verbose: bool) -> Self {
        Console {
            input,
            output,
            verbose,
        }
    }

    /// 質問を表示して 1 行読む。前後の空白は取り除く。
    ///
    /// 入力が終わっていれば `None`
    pub fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn success(&mut self, message: &str) {
        writeln!(self.output, "{}", message.if_supports_color(Stream::Stdout, |t| t.bright_green())).ok();
    }

    pub fn error(&mut self, message: &str) {
        let line = format!("Error: {message}");
        writeln!(self.output, "{}", line.if_supports_color(Stream::Stdout, |t| t.bright_red())).ok();
    }

    pub fn warn(&mut self, message: &str) {
        writeln!(self.output, "{}", message.if_supports_color(Stream::Stdout, |t| t.yellow())).ok();
    }

    pub fn info(&mut self, message: &str) {
        writeln!(self.output, "{message}").ok();
    }

    /// `--verbose` のときだけ表示
    pub fn debug(&mut self, message: &str) {
        if self.verbose {
            writeln!(self.output, "{}", message.if_supports_color(Stream::Stdout, |t| t.dimmed())).ok();
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
