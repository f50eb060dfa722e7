use log::{debug, info, log_enabled, warn, Level};
use scraper::{Html, Selector};
use url::Url;
use crate::config::{self, Config};
use crate::detail_pool::{self, DetailPool};
use crate::error::SearchError;
use crate::extractor::ResultExtractor;
use crate::search_result::SearchResult;
use crate::semester::Query;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Resize the table to the configured page size and show its first page.
    First,
    /// Click the "next page" control.
    Next,
}

/// One run through the search flow.
///
/// Steps never return errors. The first failure is stored on the session and
/// every later step returns immediately, so a caller runs the whole sequence
/// and checks [`FlowSession::error`] (or calls [`FlowSession::finish`]) at
/// the end.
pub struct FlowSession<T: Transport> {
    transport: T,
    config: Config,
    step: u32,
    authenticity_token: String,
    error: Option<SearchError>,
}

impl<T: Transport> FlowSession<T> {
    pub fn new(transport: T, config: Config) -> Self {
        FlowSession {
            transport,
            config,
            step: 1,
            authenticity_token: String::new(),
            error: None,
        }
    }

    /// Number of the step the server expects next. Starts at 1 and moves
    /// once per accepted POST.
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn flow_execution_key(&self) -> String {
        format!("e1s{}", self.step)
    }

    pub fn flow_url(&self) -> Url {
        let mut url = self.config.search_url();
        url.query_pairs_mut()
            .append_pair("_flowId", config::FLOW_ID)
            .append_pair("_flowExecutionKey", &self.flow_execution_key());
        url
    }

    pub fn authenticity_token(&self) -> &str {
        &self.authenticity_token
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    pub fn is_poisoned(&self) -> bool {
        self.error.is_some()
    }

    /// Records `err` unless an earlier error is already stored.
    pub fn fail(&mut self, err: SearchError) {
        if self.error.is_none() {
            warn!("Search flow failed at step {}: {}", self.step, err);
            self.error = Some(err);
        } else {
            debug!("Ignoring follow-up error: {}", err);
        }
    }

    pub fn finish(self) -> Result<(), SearchError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// GET the search mask, capture the authenticity token and seed the
    /// cookies the page would set by script. Consumes no flow step.
    pub fn establish(&mut self) {
        if self.is_poisoned() {
            return;
        }
        if let Err(err) = self.try_establish() {
            self.fail(err);
        }
    }

    fn try_establish(&mut self) -> Result<(), SearchError> {
        const STEP: &str = "fetch search page";

        let body = self
            .transport
            .get(&self.flow_url())
            .map_err(|e| SearchError::transport(STEP, e))?;
        let doc = parse_document(STEP, &body)?;

        let selector = Selector::parse(&format!("input[name=\"{}\"]", config::AUTH_TOKEN)).unwrap();
        let field = doc
            .select(&selector)
            .next()
            .ok_or_else(|| SearchError::protocol(STEP, format!("no {} field found", config::AUTH_TOKEN)))?;
        let token = field
            .value()
            .attr("value")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SearchError::protocol(STEP, format!("{} has no value", config::AUTH_TOKEN)))?;

        self.authenticity_token = token.to_string();
        self.transport.set_cookies(&self.config.base_url, &config::SEEDED_COOKIES);
        info!("Search session established.");
        Ok(())
    }

    /// POST the search criteria. The response body is not inspected; the
    /// results are read by [`FlowSession::fetch_result_page`].
    pub fn submit_query(&mut self, query: &Query) {
        if self.is_poisoned() {
            return;
        }
        if let Err(err) = self.try_submit_query(query) {
            self.fail(err);
        }
    }

    fn try_submit_query(&mut self, query: &Query) -> Result<(), SearchError> {
        const STEP: &str = "submit search";

        self.require_token(STEP)?;
        info!("Searching for '{}' in {}", query.pattern, query.semester);

        let mut form = self.base_form();
        form.extend(pairs(&[
            ("activePageElementId", config::SEARCH_MASK_ID),
            ("refreshButtonClickedId", ""),
            ("navigationPosition", "studiesOffered,searchCourses"),
            ("autoScroll", "0,0"),
            (config::SEARCH_FIELD, query.pattern.as_str()),
            (config::TERM_SELECT_FIELD, query.semester.fmt_select().as_str()),
            (config::TERM_SELECT_INPUT_FIELD, query.semester.fmt_select_input().as_str()),
        ]));
        form.extend(self.table_layout_fields());
        form.extend(pairs(&[
            (config::SUBMIT_SEARCH, "1"),
            ("DISABLE_AUTOSCROLL", "true"),
            ("DISABLE_VALIDATION", "true"),
            ("genericSearchMask:_idcl", config::SEARCH_BUTTON),
        ]));

        self.post(STEP, &form)?;
        Ok(())
    }

    /// POST a page directive and return the parsed result page.
    pub fn fetch_result_page(&mut self, request: PageRequest) -> Option<Html> {
        if self.is_poisoned() {
            return None;
        }
        match self.try_fetch_result_page(request) {
            Ok(doc) => Some(doc),
            Err(err) => {
                self.fail(err);
                None
            }
        }
    }

    fn try_fetch_result_page(&mut self, request: PageRequest) -> Result<Html, SearchError> {
        const STEP: &str = "fetch result page";

        self.require_token(STEP)?;

        let mut form = self.base_form();
        match request {
            PageRequest::First => {
                form.extend(self.table_layout_fields());
                form.extend(pairs(&[(config::RESULTS_FORM_CLICK, config::RESULTS_SAVE_BUTTON)]));
            }
            PageRequest::Next => {
                form.extend(pairs(&[(config::RESULTS_FORM_CLICK, config::NEXT_PAGE_BUTTON)]));
            }
        }
        form.extend(pairs(&[(config::RESULTS_SUBMIT, "1"), ("DISABLE_VALIDATION", "true")]));

        let body = self.post(STEP, &form)?;
        parse_document(STEP, &body)
    }

    /// Enrich `records` from their detail pages. Does nothing on a failed
    /// session; per-record failures are logged and never stored here.
    pub fn add_details(&self, records: &mut [SearchResult], extractor: &ResultExtractor) {
        if self.is_poisoned() {
            return;
        }
        let pool = DetailPool::new(self.config.concurrency_limit);
        pool.add_details(records, |link| {
            detail_pool::fetch_details(&self.transport, extractor, link)
        });
    }

    fn post(&mut self, step: &'static str, form: &[(String, String)]) -> Result<String, SearchError> {
        self.log_state();
        let body = self
            .transport
            .post_form(&self.flow_url(), form)
            .map_err(|e| SearchError::transport(step, e))?;
        self.step += 1;
        Ok(body)
    }

    fn require_token(&self, step: &'static str) -> Result<(), SearchError> {
        if self.authenticity_token.is_empty() {
            return Err(SearchError::protocol(step, "no authenticity token; session not established"));
        }
        Ok(())
    }

    fn base_form(&self) -> Vec<(String, String)> {
        let key = self.flow_execution_key();
        pairs(&[
            (config::AUTH_TOKEN, self.authenticity_token.as_str()),
            (config::VIEW_STATE, key.as_str()),
        ])
    }

    fn table_layout_fields(&self) -> Vec<(String, String)> {
        let size = self.config.page_size.to_string();
        let mut fields = pairs(&[
            (config::NAVI_NUM_ROWS, size.as_str()),
            (config::NAVI2_NUM_ROWS, size.as_str()),
            (config::NAVI_ABOVE_TABLE, "true"),
            (config::NAVI_BELOW_TABLE, "false"),
            (config::TABLE_PAGE_SIZE, size.as_str()),
        ]);
        for column in config::RESULT_COLUMNS {
            fields.push((config::TABLE_COLUMNS.to_string(), column.to_string()));
        }
        fields
    }

    fn log_state(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        debug!(
            "step: {}, authenticity_token: {}, error: {:?}",
            self.step, self.authenticity_token, self.error
        );
        debug!(
            "cookies: {}",
            self.transport.cookie_header(&self.config.search_url()).unwrap_or_default()
        );
    }
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn parse_document(step: &'static str, body: &str) -> Result<Html, SearchError> {
    if body.trim().is_empty() {
        return Err(SearchError::protocol(step, "empty response document"));
    }
    Ok(Html::parse_document(body))
}
