// src/services/transport.rs

//! Transport: one HTTP GET per page.
//!
//! No retry happens here; the collector owns retry policy.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, PageRequest};
use crate::utils::http::{body_snippet, create_async_client};

const SNIPPET_CHARS: usize = 200;

/// Anything that can turn a page request into a raw reply body.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<String>;
}

/// Build the request URL with parameters in a fixed order.
pub fn build_url(request: &PageRequest) -> Result<Url> {
    let mut url = Url::parse(&request.base_url)?;
    {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in request.query_pairs() {
            pairs.append_pair(name, &value);
        }
    }
    Ok(url)
}

/// reqwest-backed page source.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport using the connect/request timeouts from `config`.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl PageSource for HttpTransport {
    async fn fetch_page(&self, request: &PageRequest) -> Result<String> {
        let url = build_url(request)?;
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        log::debug!(
            "HTTP get page={} status={} elapsed_ms={}",
            request.page_number,
            status.as_u16(),
            started.elapsed().as_millis()
        );

        if status != StatusCode::OK {
            return Err(AppError::Status {
                status: status.as_u16(),
                body_snippet: body_snippet(&body, SNIPPET_CHARS),
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::DateRange;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn request(base_url: &str) -> PageRequest {
        let range = DateRange::new("202501010000", "202501312359").unwrap();
        PageRequest::new(base_url, "abc123", &range, 999, 2)
    }

    /// Serve exactly one canned HTTP reply. Returns the listener URL and a
    /// handle yielding the request head that was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let reply = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });
        (format!("http://{addr}/api"), handle)
    }

    #[test]
    fn url_has_stable_query_order() {
        let url = build_url(&request("https://example.com/api")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api?numOfRows=999&pageNo=2&bidNtceBgnDt=202501010000&bidNtceEndDt=202501312359&ServiceKey=abc123&type=json"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = build_url(&request("not a url")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn ok_reply_returns_body() {
        let (base, _) = serve_once("200 OK", r#"{"response":{}}"#).await;
        let transport = HttpTransport::new(&ApiConfig::default()).unwrap();
        let body = transport.fetch_page(&request(&base)).await.unwrap();
        assert_eq!(body, r#"{"response":{}}"#);
    }

    #[tokio::test]
    async fn sends_get_with_json_accept_and_ordered_query() {
        let (base, head) = serve_once("200 OK", "{}").await;
        let transport = HttpTransport::new(&ApiConfig::default()).unwrap();
        transport.fetch_page(&request(&base)).await.unwrap();

        let head = head.await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /api?numOfRows=999&pageNo=2&bidNtceBgnDt=202501010000&bidNtceEndDt=202501312359&ServiceKey=abc123&type=json HTTP/1.1"
        );
        assert!(
            head.to_ascii_lowercase()
                .contains("\r\naccept: application/json\r\n")
        );
    }

    #[tokio::test]
    async fn non_200_is_a_transport_error() {
        let (base, _) = serve_once("500 Internal Server Error", "SERVICE ERROR").await;
        let transport = HttpTransport::new(&ApiConfig::default()).unwrap();
        let err = transport.fetch_page(&request(&base)).await.unwrap_err();
        match &err {
            AppError::Status {
                status,
                body_snippet,
            } => {
                assert_eq!(*status, 500);
                assert_eq!(body_snippet, "SERVICE ERROR");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_retryable());
    }
}
