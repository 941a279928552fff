//! Typed arguments for Download API calls.

/// Restricts which users' annotations are burned into a downloaded document.
///
/// Normalized to a comma-joined string before it reaches the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    /// No filter: every annotation is included.
    #[default]
    None,
    /// A single filter expression, sent as-is (e.g. `"all"`, `"3"` or `"1,2"`).
    Single(String),
    /// A list of user IDs.
    Many(Vec<String>),
}

impl Filter {
    /// Returns the query value for this filter, or `None` when it is empty.
    #[must_use]
    pub fn normalized(&self) -> Option<String> {
        let joined = match self {
            Self::None => return None,
            Self::Single(value) => value.clone(),
            Self::Many(values) => values.join(","),
        };
        if joined.is_empty() { None } else { Some(joined) }
    }
}

impl From<&str> for Filter {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for Filter {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for Filter {
    fn from(values: Vec<S>) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Options for downloading a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Download the converted PDF instead of the original file.
    pub pdf: bool,
    /// Burn annotations into the downloaded file.
    pub annotated: bool,
    /// Annotation filter; ignored unless `annotated` is set.
    pub filter: Filter,
}

impl DocumentOptions {
    /// Options for the original file, unannotated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the PDF rendition.
    #[must_use]
    pub fn as_pdf(mut self) -> Self {
        self.pdf = true;
        self
    }

    /// Requests annotations to be included.
    #[must_use]
    pub fn with_annotations(mut self) -> Self {
        self.annotated = true;
        self
    }

    /// Sets the annotation filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = filter.into();
        self
    }
}
