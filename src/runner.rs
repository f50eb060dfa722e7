use log::info;
use crate::config::Config;
use crate::error::SearchError;
use crate::extractor::ResultExtractor;
use crate::paginator::collect_results;
use crate::search_result::SearchResult;
use crate::semester::Query;
use crate::session::FlowSession;
use crate::transport::Transport;

/// Rows collected by one search and the error that stopped it, if any.
///
/// `results` may be non-empty even when `error` is set: they are the rows
/// read before the failure.
#[derive(Debug)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub error: Option<SearchError>,
}

impl SearchOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.error.is_some() { 1 } else { 0 }
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self.error, Some(SearchError::Input(_)))
    }
}

/// The whole search: parse the term, run the flow, optionally fetch details.
/// A malformed term is reported before the transport is touched.
pub fn search<T: Transport>(
    transport: T,
    config: Config,
    pattern: &str,
    semester: &str,
    with_details: bool,
) -> SearchOutcome {
    let query = match Query::parse(pattern, semester) {
        Ok(q) => q,
        Err(e) => return SearchOutcome { results: Vec::new(), error: Some(e) },
    };

    let extractor = ResultExtractor::new(&config);
    let mut session = FlowSession::new(transport, config);
    session.establish();
    session.submit_query(&query);
    let mut results = collect_results(&mut session, &extractor);
    if with_details {
        session.add_details(&mut results, &extractor);
    }

    let error = session.finish().err();
    if error.is_none() {
        info!("Found {} results.", results.len());
    }
    SearchOutcome { results, error }
}
