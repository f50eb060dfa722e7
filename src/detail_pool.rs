use std::sync::{Mutex, PoisonError};
use std::thread;
use log::{debug, info, warn};
use scraper::Html;
use url::Url;
use crate::error::SearchError;
use crate::extractor::ResultExtractor;
use crate::search_result::{CourseDetails, SearchResult};
use crate::transport::Transport;

/// Fixed-size worker pool for detail page fetches.
///
/// At most `limit` fetches are in flight at any time, no matter how many
/// records are submitted. Each record is handed to exactly one worker.
pub struct DetailPool {
    limit: usize,
}

impl DetailPool {
    pub fn new(limit: usize) -> Self {
        DetailPool { limit: limit.max(1) }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `fetch` for every record that links to a detail page and stores
    /// what it returns on the record. Returns once all of them are done.
    ///
    /// A failed fetch is logged and leaves the record's detail fields empty;
    /// `details_added` is set either way.
    pub fn add_details<F>(&self, records: &mut [SearchResult], fetch: F)
    where
        F: Fn(&str) -> Result<CourseDetails, SearchError> + Sync,
    {
        let pending: Vec<&mut SearchResult> = records.iter_mut().filter(|r| r.needs_details()).collect();
        let total = pending.len();
        if total == 0 {
            return;
        }

        let workers = self.limit.min(total);
        info!("Fetching details for {} courses ({} workers)...", total, workers);

        let queue = Mutex::new(pending.into_iter());
        let fetch = &fetch;
        let queue = &queue;

        // The scope joins every worker before returning.
        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(move || loop {
                    let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                    let Some(record) = next else { break };
                    enrich(record, fetch);
                });
            }
        });

        info!("Course details done.");
    }
}

fn enrich<F>(record: &mut SearchResult, fetch: &F)
where
    F: Fn(&str) -> Result<CourseDetails, SearchError>,
{
    record.details_added = true;
    let Some(link) = record.detail_page_link.as_deref() else { return };

    match fetch(link) {
        Ok(details) => {
            debug!("Details for {}: {:?}", record.number, details);
            record.apply_details(details);
        }
        Err(e) => warn!("No details for {} ({}): {}", record.number, link, e),
    }
}

/// GET one detail page and pull the detail fields out of it.
pub fn fetch_details<T: Transport>(
    transport: &T,
    extractor: &ResultExtractor,
    link: &str,
) -> Result<CourseDetails, SearchError> {
    const STEP: &str = "fetch course details";

    let url = Url::parse(link).map_err(|e| SearchError::protocol(STEP, format!("bad link {}: {}", link, e)))?;
    let body = transport.get(&url).map_err(|e| SearchError::transport(STEP, e))?;
    if body.trim().is_empty() {
        return Err(SearchError::protocol(STEP, "empty response document"));
    }
    Ok(extractor.extract_details(&Html::parse_document(&body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn records(with_link: usize, without_link: usize) -> Vec<SearchResult> {
        let mut out = Vec::new();
        for i in 0..with_link {
            out.push(SearchResult {
                number: format!("L{}", i),
                detail_page_link: Some(format!("https://example.org/detail/{}", i)),
                ..Default::default()
            });
        }
        for i in 0..without_link {
            out.push(SearchResult { number: format!("N{}", i), ..Default::default() });
        }
        out
    }

    #[test]
    fn only_linked_records_are_attempted() {
        let mut recs = records(7, 5);
        let calls = AtomicUsize::new(0);

        DetailPool::new(3).add_details(&mut recs, |link| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(CourseDetails { sws: Some("2".into()), link: Some(link.to_string()) })
        });

        assert_eq!(calls.load(Ordering::SeqCst), 7);
        assert_eq!(recs.iter().filter(|r| r.details_added).count(), 7);
        for r in recs.iter().filter(|r| r.detail_page_link.is_some()) {
            assert_eq!(r.sws.as_deref(), Some("2"));
            assert_eq!(r.link, r.detail_page_link);
        }
        for r in recs.iter().filter(|r| r.detail_page_link.is_none()) {
            assert!(!r.details_added);
            assert_eq!(r.sws, None);
        }
    }

    #[test]
    fn never_exceeds_the_limit() {
        let mut recs = records(40, 0);
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        DetailPool::new(4).add_details(&mut recs, |_| {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(CourseDetails::default())
        });

        assert!(peak.load(Ordering::SeqCst) <= 4, "peak {}", peak.load(Ordering::SeqCst));
        assert!(peak.load(Ordering::SeqCst) >= 1);
        assert!(recs.iter().all(|r| r.details_added));
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        let mut recs = records(10, 0);

        DetailPool::new(2).add_details(&mut recs, |link| {
            if link.ends_with("/3") {
                return Err(SearchError::transport("fetch course details", "timed out"));
            }
            Ok(CourseDetails { sws: Some("4".into()), link: None })
        });

        assert!(recs.iter().all(|r| r.details_added));
        assert_eq!(recs[3].sws, None);
        assert_eq!(recs.iter().filter(|r| r.sws.as_deref() == Some("4")).count(), 9);
    }

    #[test]
    fn records_are_enriched_once() {
        let mut recs = records(3, 0);
        let calls = AtomicUsize::new(0);
        let fetch = |_: &str| -> Result<CourseDetails, SearchError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(CourseDetails::default())
        };

        let pool = DetailPool::new(8);
        pool.add_details(&mut recs, fetch);
        pool.add_details(&mut recs, fetch);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn zero_limit_still_makes_progress() {
        let pool = DetailPool::new(0);
        assert_eq!(pool.limit(), 1);

        let mut recs = records(2, 0);
        pool.add_details(&mut recs, |_| Ok(CourseDetails::default()));
        assert!(recs.iter().all(|r| r.details_added));
    }
}
