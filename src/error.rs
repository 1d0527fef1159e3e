//! Error types for quantity take-offs
//!
//! All errors carry an error code so callers can categorize failures without
//! parsing message text. Scene parse failures additionally carry an
//! [`ErrorContext`] with the file and position where parsing stopped.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and dataset errors
//! - **E2xxx**: Scene document (XML) errors
//! - **E3xxx**: Column and field selection errors
//! - **E4xxx**: Pattern errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading or writing a file
//! - `E1002`: Delimited table could not be read
//! - `E2001`: Scene document could not be parsed
//! - `E2002`: XML attribute error
//! - `E2003`: Invalid XML structure
//! - `E2005`: Scene document could not be written
//! - `E3001`: Column not present in the dataset
//! - `E3002`: Name is not a recognized quantity field
//! - `E4001`: Pattern is not a valid regular expression

use std::io;
use thiserror::Error;

/// Result type for take-off operations
pub type Result<T> = std::result::Result<T, Error>;

/// Additional context for errors
///
/// Provides optional supplementary information to help with debugging:
/// - File location information
/// - Line and column numbers (when available from XML parsing)
/// - Helpful hints for resolving common issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// The file where the error occurred
    pub file: Option<String>,

    /// Line number where the error occurred (1-based)
    pub line: Option<usize>,

    /// Column number where the error occurred (1-based)
    pub column: Option<usize>,

    /// A helpful hint for resolving the error
    pub hint: Option<String>,
}

impl ErrorContext {
    /// Create a new empty error context
    pub fn new() -> Self {
        Self {
            file: None,
            line: None,
            column: None,
            hint: None,
        }
    }

    /// Create an error context pointing at a byte offset of `source`
    ///
    /// Line and column are derived by counting newlines up to the offset.
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(pos) => before[pos + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self::new().line(line).column(column)
    }

    /// Set the file location
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the line number
    pub fn line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the column number
    pub fn column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Set the hint
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if let Some(ref file) = self.file {
            parts.push(format!("File: {}", file));
        }

        if let (Some(line), Some(column)) = (self.line, self.column) {
            parts.push(format!("Location: line {}, column {}", line, column));
        } else if let Some(line) = self.line {
            parts.push(format!("Line: {}", line));
        }

        if let Some(ref hint) = self.hint {
            parts.push(format!("Hint: {}", hint));
        }

        if !parts.is_empty() {
            write!(f, "\n{}", parts.join("\n"))
        } else {
            Ok(())
        }
    }
}

/// Coarse classification of an [`Error`]
///
/// Callers that must not surface internal error text (e.g. a web front end)
/// can switch on the kind and show their own message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The dataset could not be read
    Dataset,
    /// A requested grouping or aggregation column is not available
    MissingField,
    /// The user pattern is not a valid regular expression
    InvalidPattern,
    /// The scene document could not be opened or parsed
    SceneParse,
    /// The pruned scene document could not be written
    SceneWrite,
}

/// Errors that can occur while computing a take-off
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading or writing a file
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - File not found
    /// - Insufficient permissions
    /// - Disk full while writing the pruned scene
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// Delimited table error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - File is not valid UTF-8
    /// - Header row is missing
    #[error("[E1002] Dataset error: {0}")]
    Csv(#[from] csv::Error),

    /// Dataset file could not be opened
    ///
    /// **Error Code**: E1003
    ///
    /// **Common Causes**:
    /// - Wrong base directory or file name
    /// - Insufficient permissions
    #[error("[E1003] Cannot open dataset {path}: {source}")]
    DatasetOpen {
        /// Resolved dataset path
        path: String,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// Scene document parsing error
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Malformed XML syntax
    /// - Unclosed or mismatched tags
    /// - Truncated upload
    #[error("[E2001] Scene parse error: {message}{context}")]
    SceneParse {
        /// Description of the failure
        message: String,
        /// Where the failure occurred
        context: ErrorContext,
    },

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    ///
    /// **Common Causes**:
    /// - Attribute without a value
    /// - Duplicate attribute
    /// - Unknown entity in an attribute value
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Invalid XML structure
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - DOCTYPE declaration in the scene document
    /// - Element names that are not valid UTF-8
    #[error("[E2003] Invalid XML structure: {0}")]
    InvalidXml(String),

    /// XML writing error
    ///
    /// **Error Code**: E2005
    ///
    /// **Common Causes**:
    /// - Output directory not writable
    /// - I/O error during writing
    #[error("[E2005] XML writing error: {0}")]
    XmlWrite(String),

    /// Column not present in the dataset
    ///
    /// **Error Code**: E3001
    ///
    /// **Suggestions**:
    /// - Pick a column from `Dataset::column_names()`
    /// - Aggregate only over `Dataset::quantity_fields()`
    #[error("[E3001] Column not found in dataset: {0}")]
    MissingColumn(String),

    /// Name is not one of the recognized quantity fields
    ///
    /// **Error Code**: E3002
    #[error("[E3002] Not a recognized quantity field: '{0}' (expected Area, Volume, Width or Length)")]
    UnknownField(String),

    /// Pattern is not a valid regular expression
    ///
    /// **Error Code**: E4001
    #[error("[E4001] Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl Error {
    /// Create a SceneParse error with position context
    ///
    /// # Arguments
    /// * `message` - Description of the failure
    /// * `context` - File and position information
    pub fn scene_parse(message: impl Into<String>, context: ErrorContext) -> Self {
        Error::SceneParse {
            message: message.into(),
            context,
        }
    }

    /// Create an InvalidXml error with element context
    ///
    /// # Arguments
    /// * `element` - The XML element name where the error occurred
    /// * `message` - Description of the error
    ///
    /// # Example
    /// ```ignore
    /// Error::invalid_xml_element("node", "attribute name is not UTF-8")
    /// ```
    pub fn invalid_xml_element(element: &str, message: &str) -> Self {
        Error::InvalidXml(format!("Element '<{}>': {}", element, message))
    }

    /// Create an XmlWrite error
    ///
    /// # Arguments
    /// * `message` - Description of the writing error
    pub fn xml_write(message: String) -> Self {
        Error::XmlWrite(message)
    }

    /// Classify this error
    ///
    /// Bare I/O errors come from reading scene documents; a dataset that
    /// cannot be opened is reported as [`Error::DatasetOpen`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Csv(_) | Error::DatasetOpen { .. } => ErrorKind::Dataset,
            Error::MissingColumn(_) | Error::UnknownField(_) => ErrorKind::MissingField,
            Error::InvalidPattern(_) => ErrorKind::InvalidPattern,
            Error::Io(_) | Error::SceneParse { .. } | Error::XmlAttr(_) | Error::InvalidXml(_) => {
                ErrorKind::SceneParse
            }
            Error::XmlWrite(_) => ErrorKind::SceneWrite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_in_messages() {
        let io_err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "test"));
        assert!(io_err.to_string().contains("[E1001]"));

        let missing = Error::MissingColumn("Type".to_string());
        assert!(missing.to_string().contains("[E3001]"));
        assert!(missing.to_string().contains("Type"));

        let unknown = Error::UnknownField("Height".to_string());
        assert!(unknown.to_string().contains("[E3002]"));

        let write = Error::xml_write("disk full".to_string());
        assert!(write.to_string().contains("[E2005]"));
    }

    #[test]
    fn test_dataset_open_is_dataset_kind() {
        let err = Error::DatasetOpen {
            path: "house.csv".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("[E1003]"));
        assert!(err.to_string().contains("house.csv"));
        assert_eq!(err.kind(), ErrorKind::Dataset);

        let scene_io = Error::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert_eq!(scene_io.kind(), ErrorKind::SceneParse);
    }

    #[test]
    fn test_invalid_pattern_conversion() {
        let regex_err = regex::Regex::new("[unclosed").unwrap_err();
        let err = Error::from(regex_err);
        assert!(err.to_string().contains("[E4001]"));
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_invalid_xml_element_helper() {
        let err = Error::invalid_xml_element("node", "attribute name is not UTF-8");
        assert!(err.to_string().contains("Element '<node>'"));
        assert!(err.to_string().contains("[E2003]"));
        assert_eq!(err.kind(), ErrorKind::SceneParse);
    }

    #[test]
    fn test_scene_parse_includes_context() {
        let err = Error::scene_parse(
            "unexpected end of file",
            ErrorContext::new().file("house.dae").line(3).column(7),
        );
        let message = err.to_string();
        assert!(message.contains("[E2001]"));
        assert!(message.contains("File: house.dae"));
        assert!(message.contains("Location: line 3, column 7"));
    }

    #[test]
    fn test_error_context_at_offset() {
        let source = "<a>\n  <b>\n</a>";
        let ctx = ErrorContext::at_offset(source, 8);
        assert_eq!(ctx.line, Some(2));
        assert_eq!(ctx.column, Some(5));

        let ctx = ErrorContext::at_offset(source, 0);
        assert_eq!(ctx.line, Some(1));
        assert_eq!(ctx.column, Some(1));

        // Offsets past the end clamp to the end of the source
        let ctx = ErrorContext::at_offset(source, 1000);
        assert_eq!(ctx.line, Some(3));
    }

    #[test]
    fn test_error_context_display_partial() {
        let ctx = ErrorContext::new()
            .file("scene.dae")
            .hint("Re-export the model");

        let display = ctx.to_string();
        assert!(display.contains("File: scene.dae"));
        assert!(display.contains("Hint: Re-export the model"));
        assert!(!display.contains("Location:"));
    }

    #[test]
    fn test_error_context_display_empty() {
        assert_eq!(ErrorContext::new().to_string(), "");
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            Error::MissingColumn("x".into()).kind(),
            ErrorKind::MissingField
        );
        assert_eq!(Error::xml_write("x".into()).kind(), ErrorKind::SceneWrite);
        assert_eq!(
            Error::scene_parse("x", ErrorContext::new()).kind(),
            ErrorKind::SceneParse
        );
    }
}
