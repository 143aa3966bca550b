mod render;

pub use render::{
    COLUMN_HEADER, UNIT_HEADER, format_timestamp, render_footer, render_header,
    render_result_line,
};

use super::ReportSink;
use crate::domain::{GaussianResult, LaserConfig, SatinError, SatinResult};
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Text report for one laser configuration. The header is written on open and
/// the footer by [`ReportWriter::finish`].
#[derive(Debug)]
pub struct ReportWriter<W: Write> {
    path: PathBuf,
    out: W,
    data_lines: usize,
}

impl ReportWriter<BufWriter<File>> {
    pub fn create(path: &Path, config: &LaserConfig) -> SatinResult<Self> {
        let file = File::create(path).map_err(|source| {
            SatinError::io_system(
                "IO.REPORT_CREATE",
                format!("failed to create report '{}': {}", path.display(), source),
            )
        })?;
        Self::new(path, BufWriter::new(file), config)
    }

    /// Writes the footer and closes the file, surfacing any deferred write error.
    pub fn close(self) -> SatinResult<()> {
        let path = self.path.clone();
        let buffered = self.finish()?;
        let file = buffered.into_inner().map_err(|source| {
            SatinError::io_system(
                "IO.REPORT_CLOSE",
                format!(
                    "failed to close report '{}': {}",
                    path.display(),
                    source.error()
                ),
            )
        })?;
        file.sync_all().map_err(|source| {
            SatinError::io_system(
                "IO.REPORT_CLOSE",
                format!("failed to close report '{}': {}", path.display(), source),
            )
        })
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(path: impl Into<PathBuf>, out: W, config: &LaserConfig) -> SatinResult<Self> {
        let mut writer = Self {
            path: path.into(),
            out,
            data_lines: 0,
        };
        let started = Local::now().naive_local();
        writer.write_text(&render_header(config, &started))?;
        Ok(writer)
    }

    pub fn data_lines(&self) -> usize {
        self.data_lines
    }

    pub fn finish(mut self) -> SatinResult<W> {
        let finished = Local::now().naive_local();
        self.write_text(&render_footer(&finished))?;
        self.out.flush().map_err(|source| {
            SatinError::io_system(
                "IO.REPORT_WRITE",
                format!(
                    "failed to flush report '{}': {}",
                    self.path.display(),
                    source
                ),
            )
        })?;
        Ok(self.out)
    }

    fn write_text(&mut self, text: &str) -> SatinResult<()> {
        self.out.write_all(text.as_bytes()).map_err(|source| {
            SatinError::io_system(
                "IO.REPORT_WRITE",
                format!(
                    "failed to write report '{}': {}",
                    self.path.display(),
                    source
                ),
            )
        })
    }
}

impl<W: Write> ReportSink for ReportWriter<W> {
    fn write_results(&mut self, results: &[GaussianResult]) -> SatinResult<()> {
        for result in results {
            self.write_text(&render_result_line(result))?;
            self.data_lines += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ReportWriter;
    use crate::domain::{GaussianResult, LaserConfig, SatinErrorCategory};
    use crate::modules::ReportSink;
    use std::fs;
    use std::io::{self, Write};
    use tempfile::TempDir;

    #[derive(Debug)]
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config() -> LaserConfig {
        LaserConfig::new("t.out", 20.0, 125, "5%").expect("valid config")
    }

    #[test]
    fn in_memory_report_has_header_lines_and_footer() {
        let mut writer =
            ReportWriter::new("t.out", Vec::new(), &config()).expect("header should write");
        writer
            .write_results(&[
                GaussianResult::new(10, 10_000, 11.5),
                GaussianResult::new(10, 11_000, 11.6),
            ])
            .expect("results should write");
        assert_eq!(writer.data_lines(), 2);

        let bytes = writer.finish().expect("footer should write");
        let text = String::from_utf8(bytes).expect("report should be utf-8");
        assert!(text.starts_with("Start date: "));
        assert!(text.contains("Pressure in Main Discharge = 125kPa\n"));
        assert!(text.contains("10\t\t 11.500\t\t10000\t\t"));
        assert!(text.contains("10\t\t 11.600\t\t11000\t\t"));
        assert!(text.contains("\nEnd date: "));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn created_report_is_closed_on_disk() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("t.out");

        let mut writer = ReportWriter::create(&path, &config()).expect("report should open");
        writer
            .write_results(&[GaussianResult::new(20, 25_000, 24.0)])
            .expect("results should write");
        writer.close().expect("report should close");

        let text = fs::read_to_string(&path).expect("report should exist");
        assert!(text.contains("20\t\t 24.000\t\t25000\t\t"));
    }

    #[test]
    fn create_failure_names_the_report_path() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("missing-dir").join("t.out");

        let error = ReportWriter::create(&path, &config()).expect_err("open should fail");
        assert_eq!(error.category(), SatinErrorCategory::IoSystemError);
        assert_eq!(error.placeholder(), "IO.REPORT_CREATE");
        assert!(error.message().contains("t.out"));
    }

    #[test]
    fn write_failure_is_reported_as_io_error() {
        let error = ReportWriter::new("t.out", BrokenPipe, &config())
            .expect_err("header write should fail");
        assert_eq!(error.placeholder(), "IO.REPORT_WRITE");
        assert_eq!(error.exit_code(), 3);
    }
}
