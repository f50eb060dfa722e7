use serde::Serialize;

/// One row of the course search results table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub number: String,
    pub title: String,
    pub kind: String,
    pub resp_instructor: String,
    pub exec_instructor: String,
    pub unit: String,

    // Filled in by the detail pool. The output layer decides whether to show them.
    #[serde(skip)]
    pub sws: Option<String>,
    #[serde(skip)]
    pub link: Option<String>,

    /// A detail fetch was attempted; says nothing about whether it worked.
    #[serde(skip)]
    pub details_added: bool,
    /// Absolute URL of the course detail page, if the row links to one.
    #[serde(skip)]
    pub detail_page_link: Option<String>,
}

impl SearchResult {
    pub fn needs_details(&self) -> bool {
        !self.details_added
            && self.detail_page_link.as_deref().is_some_and(|l| !l.trim().is_empty())
    }

    pub fn apply_details(&mut self, details: CourseDetails) {
        self.sws = details.sws;
        self.link = details.link;
    }
}

/// Fields only found on a course's detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseDetails {
    pub sws: Option<String>,
    pub link: Option<String>,
}
