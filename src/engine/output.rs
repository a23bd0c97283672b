//! Output formatting: turns records into `path` / `path:line:text` lines and streams them to stdout.

use colored::{Color, Colorize};
use std::io::{self, Stdout, Write};
use std::path::Path;

use crate::{RecordSink, ResultRecord};

/// Printed once when a finished search produced no records.
pub const NO_MATCHES_MESSAGE: &str = "No matches found.";

/// Formatting switches owned by the output layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputStyle {
    /// ANSI colors: magenta path, green line number.
    pub colorize: bool,
    /// Print only the file name instead of the full path.
    pub hide_path: bool,
}

/// Output colors.
pub struct Colors;

impl Colors {
    pub const PATH: Color = Color::Magenta;
    pub const LINE_NUMBER: Color = Color::Green;

    pub fn colorize(color: Color, text: &str) -> String {
        text.color(color).to_string()
    }
}

/// Full path, or its final component when `hide_path` is set.
pub fn display_path(path: &Path, hide_path: bool) -> String {
    if hide_path
        && let Some(name) = path.file_name()
    {
        return name.to_string_lossy().into_owned();
    }
    path.display().to_string()
}

/// Render one record as a single output line (no trailing newline).
pub fn format_record(record: &ResultRecord, style: &OutputStyle) -> String {
    match record {
        ResultRecord::FilenameMatch { path } => {
            let path = display_path(path, style.hide_path);
            if style.colorize {
                Colors::colorize(Colors::PATH, &path)
            } else {
                path
            }
        }
        ResultRecord::ContentMatch {
            path,
            line_number,
            line_text,
        } => {
            let path = display_path(path, style.hide_path);
            if style.colorize {
                format!(
                    "{}:{}:{}",
                    Colors::colorize(Colors::PATH, &path),
                    Colors::colorize(Colors::LINE_NUMBER, &line_number.to_string()),
                    line_text
                )
            } else {
                format!("{path}:{line_number}:{line_text}")
            }
        }
        // Bare name, uncolored, so the list pipes cleanly into other tools.
        ResultRecord::MatchedFileOnly { path } => display_path(path, style.hide_path),
    }
}

/// Streams each record to stdout as soon as it is drained.
pub struct StdoutSink {
    style: OutputStyle,
    out: Stdout,
}

impl StdoutSink {
    pub fn new(style: OutputStyle) -> Self {
        if style.colorize {
            // Honour an explicit --color even when stdout is not a terminal.
            colored::control::set_override(true);
        }
        Self {
            style,
            out: io::stdout(),
        }
    }
}

impl RecordSink for StdoutSink {
    fn emit(&mut self, record: &ResultRecord) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{}", format_record(record, &self.style))?;
        out.flush()
    }

    fn no_matches(&mut self) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{NO_MATCHES_MESSAGE}")?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn content() -> ResultRecord {
        ResultRecord::ContentMatch {
            path: PathBuf::from("src/getValueFromSection.py"),
            line_number: 3,
            line_text: "def get_value_from_section():".to_string(),
        }
    }

    #[test]
    fn test_plain_content_line() {
        let style = OutputStyle::default();
        assert_eq!(
            format_record(&content(), &style),
            "src/getValueFromSection.py:3:def get_value_from_section():"
        );
    }

    #[test]
    fn test_hide_path_uses_file_name() {
        let style = OutputStyle {
            hide_path: true,
            ..Default::default()
        };
        assert_eq!(
            format_record(&content(), &style),
            "getValueFromSection.py:3:def get_value_from_section():"
        );
        let only = ResultRecord::MatchedFileOnly {
            path: PathBuf::from("a/b/c.txt"),
        };
        assert_eq!(format_record(&only, &style), "c.txt");
    }

    #[test]
    fn test_filename_match_is_path_only() {
        let r = ResultRecord::FilenameMatch {
            path: PathBuf::from("dir/periodic-table.csv"),
        };
        assert_eq!(
            format_record(&r, &OutputStyle::default()),
            "dir/periodic-table.csv"
        );
    }

    #[test]
    fn test_colorized_content_line() {
        colored::control::set_override(true);
        let style = OutputStyle {
            colorize: true,
            hide_path: false,
        };
        let line = format_record(&content(), &style);
        assert!(line.starts_with("\u{1b}[35msrc/getValueFromSection.py\u{1b}[0m:"));
        assert!(line.contains("\u{1b}[32m3\u{1b}[0m"));
        assert!(line.ends_with(":def get_value_from_section():"));
    }

    #[test]
    fn test_display_path_without_file_name() {
        assert_eq!(display_path(Path::new("/"), true), "/");
    }
}
