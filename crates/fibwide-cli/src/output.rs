//! CLI output formatting.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use fibwide_orchestration::SweepRow;

/// Shorten a long digit string to its first and last 50 digits unless
/// `verbose` is set.
#[must_use]
pub fn format_result(digits: &str, verbose: bool) -> String {
    if !verbose && digits.len() > 100 {
        format!(
            "{}...{} ({} digits)",
            &digits[..50],
            &digits[digits.len() - 50..],
            digits.len()
        )
    } else {
        digits.to_string()
    }
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Write decimal digits to a file, followed by a newline.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: &Path, digits: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{digits}")?;
    Ok(())
}

/// Streams sweep rows as `"n t1 t2 t3"` lines, flushing after each one so
/// an interrupted sweep still leaves every measured row behind.
///
/// The first write error is kept and later rows are dropped.
pub struct SweepWriter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> SweepWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Write one row and flush it.
    pub fn write_row(&mut self, row: &SweepRow) {
        if self.error.is_some() {
            return;
        }
        let written = writeln!(self.out, "{row}").and_then(|()| self.out.flush());
        if let Err(e) = written {
            self.error = Some(e);
        }
    }

    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Hand back the underlying writer.
    ///
    /// # Errors
    ///
    /// The first error hit by [`SweepWriter::write_row`].
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_units() {
        assert!(format_duration(Duration::from_nanos(500)).ends_with("µs"));
        assert_eq!(format_duration(Duration::from_millis(42)), "42.00ms");
        assert_eq!(format_duration(Duration::from_millis(3_140)), "3.140s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30.0s");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1_000_000), "1,000,000");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(0), "0");
    }

    #[test]
    fn format_result_short() {
        assert_eq!(format_result("12345", false), "12345");
    }

    #[test]
    fn format_result_truncates_unless_verbose() {
        let digits = "7".repeat(209);
        let short = format_result(&digits, false);
        assert!(short.ends_with("(209 digits)"));
        assert!(short.contains("..."));
        assert_eq!(format_result(&digits, true), digits);
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f100.txt");
        write_to_file(&path, "354224848179261915075").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "354224848179261915075\n");
    }

    fn row(n: u64) -> SweepRow {
        SweepRow {
            n,
            linear: Duration::from_nanos(10 + n),
            matrix: Duration::from_nanos(20 + n),
            fast_doubling: Duration::from_nanos(30 + n),
            agreed: true,
        }
    }

    #[test]
    fn sweep_rows_land_as_they_arrive() {
        let mut writer = SweepWriter::new(Vec::new());
        writer.write_row(&row(0));
        assert_eq!(writer.get_ref().as_slice(), b"0 10 20 30\n");
        writer.write_row(&row(1));
        let out = writer.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 10 20 30\n1 11 21 31\n");
    }

    /// Accepts `budget` bytes, then fails.
    #[derive(Debug)]
    struct Full {
        budget: usize,
        written: Vec<u8>,
    }

    impl Write for Full {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sweep_writer_keeps_first_error() {
        let mut writer = SweepWriter::new(Full {
            budget: 11,
            written: Vec::new(),
        });
        writer.write_row(&row(0));
        writer.write_row(&row(1));
        writer.write_row(&row(2));
        assert_eq!(writer.get_ref().written, b"0 10 20 30\n");
        let err = writer.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }
}
