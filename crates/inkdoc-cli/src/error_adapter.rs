//! Rendering of [`InkdocError`]s as miette reports.
//!
//! A parse error becomes one [`Report`] per diagnostic. The report carries
//! the source file as a named source, so the rendered snippet is headed by
//! the file path, and the doc block label is extended with the block's line
//! range. Any other error becomes a single report without a snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, SourceCode};

use inkdoc::InkdocError;
use inkdoc_parser::{Diagnostic, ErrorCode, Span};

/// One renderable error.
#[derive(Debug)]
pub struct Report {
    message: String,
    code: Option<String>,
    help: Option<String>,
    source: Option<NamedSource<String>>,
    labels: Vec<LabeledSpan>,
}

impl Report {
    /// Builds the report of one parser diagnostic raised in `path`.
    fn from_diagnostic(diag: &Diagnostic, path: &str, src: &str) -> Self {
        let labels = diag
            .labels()
            .iter()
            .map(|label| {
                let span = (label.span().start(), label.span().len());
                if label.is_primary() {
                    let text = format!("{}, {}", label.message(), line_range(src, label.span()));
                    LabeledSpan::new_primary_with_span(Some(text), span)
                } else {
                    LabeledSpan::new_with_span(Some(label.message().to_string()), span)
                }
            })
            .collect();

        Self {
            message: format!("{path}: {}", diag.message()),
            code: diag.code().map(|code| code.to_string()),
            help: diag.help().map(str::to_string),
            source: Some(NamedSource::new(path, src.to_string())),
            labels,
        }
    }

    /// Builds the report of an error that has no source location.
    fn from_error(err: &InkdocError) -> Self {
        let (code, help) = match err {
            InkdocError::Settings(settings) => (
                ErrorCode::for_settings(settings).to_string(),
                Diagnostic::from(settings).help().map(str::to_string),
            ),
            InkdocError::Io(_) => ("inkdoc::io".to_string(), None),
            InkdocError::Config(_) => ("inkdoc::config".to_string(), None),
            InkdocError::Export(_) => ("inkdoc::export".to_string(), None),
            InkdocError::Parse { .. } => ("inkdoc::parse".to_string(), None),
        };

        Self {
            message: err.to_string(),
            code: Some(code),
            help,
            source: None,
            labels: Vec::new(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Report {}

impl MietteDiagnostic for Report {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source.as_ref().map(|source| source as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }
}

/// Describes the 1-based lines covered by `span`, e.g. `lines 3-7`.
fn line_range(src: &str, span: Span) -> String {
    let start = src.get(..span.start()).map_or(0, |head| head.matches('\n').count()) + 1;
    let inner = src
        .get(span.range())
        .map_or(0, |body| body.trim_end_matches('\n').matches('\n').count());

    if inner == 0 {
        format!("line {start}")
    } else {
        format!("lines {start}-{}", start + inner)
    }
}

/// Converts an [`InkdocError`] into the reports to show.
pub fn reports(err: &InkdocError) -> Vec<Report> {
    match err {
        InkdocError::Parse { err: parse, path, src } => {
            let path = path.display().to_string();
            parse
                .diagnostics()
                .iter()
                .map(|diag| Report::from_diagnostic(diag, &path, src))
                .collect()
        }
        _ => vec![Report::from_error(err)],
    }
}

/// Renders an [`InkdocError`] with miette's graphical report handler.
///
/// Returns one rendered string per report.
pub fn render(err: &InkdocError) -> Vec<String> {
    let handler = miette::GraphicalReportHandler::new();

    reports(err)
        .iter()
        .map(|report| {
            let mut out = String::new();
            match handler.render_report(&mut out, report) {
                Ok(()) => out,
                Err(_) => report.to_string(),
            }
        })
        .collect()
}
