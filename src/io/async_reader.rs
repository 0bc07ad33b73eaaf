//! Asynchronous CSV reader with stream interface
//!
//! Provides a streaming interface over book records from a CSV source without
//! loading the whole document into memory. Physical lines are read one at a
//! time and fed through the same logical-line state machine as
//! `csv_format::deserialize_books`, so both readers accept exactly the same
//! documents.
//!
//! # Architecture
//!
//! ```text
//! CSV bytes → BufReader::read_line → LineSplitter → parse_line → Stream<Result<Book>>
//! ```

use crate::io::csv_format::{parse_line, LineSplitter};
use crate::types::Book;
use futures::io::{AsyncBufReadExt, AsyncRead, BufReader};
use futures::stream::{self, BoxStream, StreamExt};
use std::io;

/// Asynchronous CSV book reader
pub struct AsyncBookReader<R: AsyncRead + Unpin> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncBookReader<R> {
    /// Create a new AsyncBookReader from an async reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing CSV data
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Turn the reader into a lazy, non-restartable stream of books
    ///
    /// Malformed rows are skipped; I/O failures and invalid UTF-8 are yielded
    /// once as `Err` and end the stream.
    pub fn into_stream(self) -> BoxStream<'static, Result<Book, io::Error>> {
        let state = LineState {
            reader: self.reader,
            splitter: LineSplitter::default(),
            buffer: String::new(),
            index: 0,
            done: false,
        };

        stream::unfold(state, |mut state| async move {
            loop {
                match state.next_line().await {
                    Ok(Some(line)) => {
                        let index = state.index;
                        state.index += 1;
                        if let Some(book) = parse_line(index, &line) {
                            return Some((Ok(book), state));
                        }
                    }
                    Ok(None) => return None,
                    Err(e) => {
                        state.done = true;
                        return Some((Err(e), state));
                    }
                }
            }
        })
        .boxed()
    }
}

struct LineState<R> {
    reader: BufReader<R>,
    splitter: LineSplitter,
    buffer: String,
    /// Index of the next logical line
    index: usize,
    done: bool,
}

impl<R: AsyncRead + Unpin> LineState<R> {
    /// Next logical line, reading as many physical lines as a quoted field spans
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        while !self.done {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer).await? == 0 {
                self.done = true;
                return Ok(self.splitter.finish());
            }

            // `read_line` stops after the first `\n`, so at most one line completes
            let mut completed = None;
            for c in self.buffer.chars() {
                if let Some(line) = self.splitter.push(c) {
                    completed = Some(line);
                }
            }
            if completed.is_some() {
                return Ok(completed);
            }
        }

        Ok(None)
    }
}
