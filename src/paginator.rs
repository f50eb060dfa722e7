use log::{info, warn};
use crate::extractor::ResultExtractor;
use crate::search_result::SearchResult;
use crate::session::{FlowSession, PageRequest};
use crate::transport::Transport;

/// Walks the result pages of a submitted search and returns their rows in
/// page order, then row order.
///
/// Partial results: if the session fails part way (including a page without
/// a results table), the rows collected up to that point are returned and
/// the error stays on the session. Callers must check the session before
/// treating the list as complete.
pub fn collect_results<T: Transport>(
    session: &mut FlowSession<T>,
    extractor: &ResultExtractor,
) -> Vec<SearchResult> {
    let mut results = Vec::new();
    let mut request = PageRequest::First;
    let mut page_no = 0;

    while let Some(page) = session.fetch_result_page(request) {
        page_no += 1;
        match extractor.extract_results(&page) {
            Ok(rows) => {
                info!("Page {}: {} results", page_no, rows.len());
                results.extend(rows);
            }
            Err(e) => {
                session.fail(e);
                break;
            }
        }

        if !extractor.has_more_pages(&page) {
            break;
        }
        request = PageRequest::Next;
    }

    if session.is_poisoned() {
        warn!("Stopped after {} page(s) with {} results.", page_no, results.len());
    }
    results
}
