//! Output sink for template text and `${..}` emits.
//!
//! Enum dispatch over the three destinations an execution can write to.

use std::io;

use crate::errors::{output_error, EvalResult};

pub enum Output<'o> {
    /// Drop everything (plain `evaluate`).
    Discard,
    /// Stream to a host writer as evaluation proceeds.
    Writer(&'o mut dyn io::Write),
    /// Collect into memory.
    Buffer(String),
}

impl Output<'_> {
    pub fn buffer() -> Self {
        Output::Buffer(String::new())
    }

    pub fn write_str(&mut self, text: &str) -> EvalResult<()> {
        match self {
            Output::Discard => Ok(()),
            Output::Writer(out) => out.write_all(text.as_bytes()).map_err(|e| output_error(&e)),
            Output::Buffer(buf) => {
                buf.push_str(text);
                Ok(())
            }
        }
    }

    pub fn flush(&mut self) -> EvalResult<()> {
        match self {
            Output::Writer(out) => out.flush().map_err(|e| output_error(&e)),
            Output::Discard | Output::Buffer(_) => Ok(()),
        }
    }

    /// Collected text, for `Buffer` sinks.
    pub fn captured(&self) -> Option<&str> {
        match self {
            Output::Buffer(buf) => Some(buf),
            Output::Discard | Output::Writer(_) => None,
        }
    }
}

impl Default for Output<'_> {
    fn default() -> Self {
        Output::Discard
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    struct FailingWriter;

    impl io::Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_buffer_collects() {
        let mut out = Output::buffer();
        out.write_str("a").unwrap();
        out.write_str("b").unwrap();
        assert_eq!(out.captured(), Some("ab"));
    }

    #[test]
    fn test_writer_streams() {
        let mut sink = Vec::new();
        {
            let mut out = Output::Writer(&mut sink);
            out.write_str("hello").unwrap();
            out.flush().unwrap();
        }
        assert_eq!(sink, b"hello");
    }

    #[test]
    fn test_writer_failure_aborts() {
        let mut failing = FailingWriter;
        let mut out = Output::Writer(&mut failing);
        let err = out.write_str("x").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Abort);
    }

    #[test]
    fn test_discard() {
        let mut out = Output::default();
        out.write_str("ignored").unwrap();
        assert_eq!(out.captured(), None);
    }
}
