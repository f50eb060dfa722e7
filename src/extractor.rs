use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;
use crate::config::{self, Config};
use crate::error::SearchError;
use crate::search_result::{CourseDetails, SearchResult};

// Cell positions, matching config::RESULT_COLUMNS.
const COL_NUMBER: usize = 1;
const COL_TITLE: usize = 2;
const COL_KIND: usize = 3;
const COL_RESP_INSTRUCTOR: usize = 4;
const COL_EXEC_INSTRUCTOR: usize = 5;
const COL_UNIT: usize = 6;

/// Pure parsing of result pages and detail pages. No network access.
pub struct ResultExtractor {
    table: Selector,
    anchor: Selector,
    next_page: Selector,
    label_line: Selector,
    label: Selector,
    answer: Selector,
    whitespace: Regex,
    base_url: Url,
    link_domain: String,
}

impl ResultExtractor {
    pub fn new(config: &Config) -> Self {
        ResultExtractor {
            table: Selector::parse(&format!("table[id=\"{}\"]", config::RESULTS_TABLE_ID)).unwrap(),
            anchor: Selector::parse("a[href]").unwrap(),
            next_page: Selector::parse(&format!("[id=\"{}\"]", config::NEXT_PAGE_BUTTON)).unwrap(),
            label_line: Selector::parse(".labelItemLine").unwrap(),
            label: Selector::parse("label").unwrap(),
            answer: Selector::parse(".answer").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
            base_url: config.base_url.clone(),
            link_domain: config.link_domain.to_lowercase(),
        }
    }

    /// Rows of the results table, in document order.
    ///
    /// Rows without a course number and title (spacers, "no entries" notes)
    /// are skipped rather than reported.
    pub fn extract_results(&self, doc: &Html) -> Result<Vec<SearchResult>, SearchError> {
        let table = doc
            .select(&self.table)
            .next()
            .ok_or_else(|| SearchError::protocol("extract results", "no results table found"))?;

        // Only rows of this table; tables nested in a cell are not results.
        let results = child_elements(table, "tbody")
            .flat_map(|body| child_elements(body, "tr"))
            .filter_map(|row| self.parse_row(row))
            .collect();
        Ok(results)
    }

    fn parse_row(&self, row: ElementRef) -> Option<SearchResult> {
        let cells: Vec<ElementRef> = child_elements(row, "td").collect();

        let cell = |idx: usize| cells.get(idx).map(|c| self.cell_text(*c)).unwrap_or_default();

        let result = SearchResult {
            number: cell(COL_NUMBER),
            title: cell(COL_TITLE),
            kind: cell(COL_KIND),
            resp_instructor: cell(COL_RESP_INSTRUCTOR),
            exec_instructor: cell(COL_EXEC_INSTRUCTOR),
            unit: cell(COL_UNIT),
            detail_page_link: self.detail_link(row),
            ..Default::default()
        };

        if result.number.is_empty() && result.title.is_empty() {
            return None;
        }
        Some(result)
    }

    fn detail_link(&self, row: ElementRef) -> Option<String> {
        row.select(&self.anchor)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty() && !href.starts_with('#') && !href.starts_with("javascript:"))
            .and_then(|href| self.base_url.join(href).ok())
            .map(String::from)
    }

    /// True iff the page carries an enabled "next page" control.
    pub fn has_more_pages(&self, doc: &Html) -> bool {
        doc.select(&self.next_page).any(|el| {
            let el = el.value();
            let disabled_class = el.attr("class").is_some_and(|c| {
                c.split_whitespace().any(|class| class.eq_ignore_ascii_case("disabled"))
            });
            el.attr("disabled").is_none() && !disabled_class
        })
    }

    pub fn extract_details(&self, doc: &Html) -> CourseDetails {
        CourseDetails {
            sws: self.sws(doc),
            link: self.canonical_link(doc),
        }
    }

    fn sws(&self, doc: &Html) -> Option<String> {
        doc.select(&self.label_line)
            .find(|line| {
                line.select(&self.label)
                    .next()
                    .is_some_and(|label| self.clean_text(label) == config::SWS_LABEL)
            })
            .and_then(|line| line.select(&self.answer).next())
            .map(|answer| self.clean_text(answer))
            .filter(|sws| !sws.is_empty())
    }

    /// The course permalink: the first anchor pointing absolutely into the
    /// institutional domain whose visible text is its own href.
    pub fn canonical_link(&self, doc: &Html) -> Option<String> {
        doc.select(&self.anchor).find_map(|a| {
            let href = a.value().attr("href")?.trim();
            let url = Url::parse(href).ok()?;
            if !matches!(url.scheme(), "http" | "https") || !self.in_link_domain(&url) {
                return None;
            }
            let text = a.text().collect::<String>();
            (text.trim() == href).then(|| href.to_string())
        })
    }

    fn in_link_domain(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => {
                let host = host.to_lowercase();
                host == self.link_domain || host.ends_with(&format!(".{}", self.link_domain))
            }
            None => false,
        }
    }

    fn clean_text(&self, el: ElementRef) -> String {
        let text = el.text().collect::<String>();
        self.collapse(&text)
    }

    /// Text of a cell without the text of any table nested in it.
    fn cell_text(&self, cell: ElementRef) -> String {
        let mut text = String::new();
        collect_text_outside_tables(cell, &mut text);
        self.collapse(&text)
    }

    fn collapse(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }
}

fn child_elements<'a>(parent: ElementRef<'a>, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

fn collect_text_outside_tables(el: ElementRef, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if child_el.value().name() != "table" {
                collect_text_outside_tables(child_el, out);
            }
        }
    }
}
