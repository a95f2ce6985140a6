use std::fmt;

/// Diagnostic is one conformance finding.
///
/// Every finding is terminal: the document does not conform under the
/// configuration the run used. The message names the violated clause and
/// says whether the clause is mandatory ("shall"/"must") or advisory
/// ("should").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line the finding is attributed to, `None` for findings about
    /// the document as a whole.
    pub line: Option<usize>,
    /// Identifier of the catalog rule that produced the finding.
    pub rule: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn at<S: Into<String>>(line: usize, message: S) -> Self {
        Diagnostic {
            line: Some(line),
            rule: "",
            message: message.into(),
        }
    }

    pub fn document<S: Into<String>>(message: S) -> Self {
        Diagnostic {
            line: None,
            rule: "",
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
