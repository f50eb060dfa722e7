use std::sync::Arc;
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use log::debug;
use url::Url;
use crate::config::{self, Config};
use crate::error::BoxError;

pub type TransportResult<T> = Result<T, BoxError>;

/// The HTTP side of the flow. Implementations keep cookies between calls and
/// must be usable from several threads at once during detail enrichment.
pub trait Transport: Sync {
    fn get(&self, url: &Url) -> TransportResult<String>;

    /// POST an urlencoded form. Keys may repeat for multi-valued fields.
    fn post_form(&self, url: &Url, form: &[(String, String)]) -> TransportResult<String>;

    fn set_cookies(&self, url: &Url, cookies: &[(&str, &str)]);

    /// Cookie header that would be sent to `url`, for debug output.
    fn cookie_header(&self, _url: &Url) -> Option<String> {
        None
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &Url) -> TransportResult<String> {
        (**self).get(url)
    }

    fn post_form(&self, url: &Url, form: &[(String, String)]) -> TransportResult<String> {
        (**self).post_form(url, form)
    }

    fn set_cookies(&self, url: &Url, cookies: &[(&str, &str)]) {
        (**self).set_cookies(url, cookies)
    }

    fn cookie_header(&self, url: &Url) -> Option<String> {
        (**self).cookie_header(url)
    }
}

pub struct HttpTransport {
    client: Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> TransportResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(config::USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("de-DE,de;q=0.9,en;q=0.8"));

        let jar = Arc::new(Jar::default());
        let mut builder = Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpTransport { client: builder.build()?, jar })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> TransportResult<String> {
        debug!("GET {}", url);
        let resp = self.client.get(url.clone()).send()?.error_for_status()?;
        debug!("GET {} -> {}", url, resp.status());
        Ok(resp.text()?)
    }

    fn post_form(&self, url: &Url, form: &[(String, String)]) -> TransportResult<String> {
        debug!("POST {}", url);
        for (key, value) in form {
            debug!("  {} = {}", key, value);
        }
        // Redirects are followed, so the body is the page the POST forwards to.
        let resp = self.client.post(url.clone()).form(form).send()?.error_for_status()?;
        debug!("POST {} -> {} ({})", url, resp.status(), resp.url());
        Ok(resp.text()?)
    }

    fn set_cookies(&self, url: &Url, cookies: &[(&str, &str)]) {
        for (name, value) in cookies {
            self.jar.add_cookie_str(&format!("{}={}; Path=/", name, value), url);
        }
    }

    fn cookie_header(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}
