// tests/common/mod.rs
//
// Scripted in-memory transport and HTML fixtures shared by the flow tests.
//
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use course_search_lib::config;
use course_search_lib::transport::{Transport, TransportResult};
use url::Url;

pub const SEARCH_PAGE: &str = r#"<html><body><form id="genericSearchMask">
<input type="hidden" name="authenticity_token" value="tok-abc">
</form></body></html>"#;

/// POST answers are handed out in order. GETs of the flow URL return the
/// search page; any other GET is looked up in `details`.
#[derive(Default)]
pub struct ScriptedTransport {
    pub posts: Mutex<VecDeque<TransportResult<String>>>,
    pub details: HashMap<String, Result<String, String>>,
    pub detail_delay: Option<Duration>,
    pub post_count: AtomicUsize,
    pub detail_gets: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(posts: Vec<TransportResult<String>>) -> Self {
        ScriptedTransport {
            posts: Mutex::new(posts.into()),
            ..Default::default()
        }
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &Url) -> TransportResult<String> {
        if url.path() == config::SEARCH_PATH {
            return Ok(SEARCH_PAGE.to_string());
        }

        self.detail_gets.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.detail_delay {
            thread::sleep(delay);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.details.get(url.as_str()) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(msg)) => Err(msg.clone().into()),
            None => Err(format!("404 for {}", url).into()),
        }
    }

    fn post_form(&self, _url: &Url, _form: &[(String, String)]) -> TransportResult<String> {
        self.post_count.fetch_add(1, Ordering::SeqCst);
        self.posts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted answer".into()))
    }

    fn set_cookies(&self, _url: &Url, _cookies: &[(&str, &str)]) {}
}

pub fn detail_url(number: &str) -> String {
    format!("{}/qisserver/pages/detail.xhtml?number={}", config::BASE_URL, number)
}

pub fn row(number: &str, title: &str) -> String {
    format!(
        "<tr><td><a href=\"/qisserver/pages/detail.xhtml?number={n}\">Details</a></td>\
         <td>{n}</td><td>{t}</td><td>Vorlesung</td><td>Prof. X</td><td>Dr. Y</td>\
         <td>Institut für Informatik</td><td></td></tr>",
        n = number,
        t = title
    )
}

/// A result page with `count` rows numbered `page-0001`, `page-0002`, ...
pub fn result_page(page: usize, count: usize, has_more: bool) -> String {
    let rows: String = (1..=count)
        .map(|i| row(&format!("{}-{:04}", page, i), &format!("Algorithmen {}.{}", page, i)))
        .collect();
    let next = if has_more {
        format!("<button id=\"{}\">&gt;</button>", config::NEXT_PAGE_BUTTON)
    } else {
        format!("<button id=\"{}\" disabled=\"disabled\">&gt;</button>", config::NEXT_PAGE_BUTTON)
    };
    format!(
        "<html><body><form id=\"genSearchRes\">{}<table id=\"{}\"><thead><tr><th></th><th>Nummer</th></tr></thead>\
         <tbody>{}</tbody></table></form></body></html>",
        next,
        config::RESULTS_TABLE_ID,
        rows
    )
}

pub fn detail_page(sws: &str, permalink: &str) -> String {
    format!(
        r#"<html><body>
        <a href="/qisserver/pages/cm/exa/coursemanagement/basicCourseData.xhtml">Zurück</a>
        <div class="labelItemLine"><label>{label}</label><div class="answer">
            {sws}
        </div></div>
        <a href="{link}">Permalink</a>
        <a href="{link}">{link}</a>
        </body></html>"#,
        label = config::SWS_LABEL,
        sws = sws,
        link = permalink
    )
}
