// src/probe/transport.rs
// =============================================================================
// The HTTP collaborator.
//
// The engine only needs "GET this URL with these headers, tell me what
// happened": status, headers, body, which URLs we bounced through, and where
// we ended up. That contract is the Transport trait, so tests can swap in a
// scripted transport and the real one can stay a thin reqwest wrapper.
//
// HttpTransport follows redirects itself (reqwest's redirect policy is set to
// none) because reqwest doesn't report the intermediate hops. Credentials are
// dropped once a hop leaves the original scheme/host/port, as reqwest does.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, AUTHORIZATION, COOKIE, LOCATION, PROXY_AUTHORIZATION, WWW_AUTHENTICATE,
};
use reqwest::{redirect, Client};
use std::time::Duration;
use url::Url;

use crate::error::{EngineError, TransportError};

/// One GET request as the engine wants it sent
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub headers: HeaderMap,
    /// Bound on the whole call, redirects included
    pub timeout: Duration,
}

/// What came back from a GET, after following redirects
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// URL of the last response
    pub final_url: String,
    /// URLs that answered with a redirect, in the order they were visited
    pub history: Vec<String>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

// Never forwarded to a different origin
const SENSITIVE_HEADERS: [reqwest::header::HeaderName; 4] =
    [AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, WWW_AUTHENTICATE];

fn is_same_origin(from: &Url, to: &Url) -> bool {
    from.scheme() == to.scheme()
        && from.host_str() == to.host_str()
        && from.port_or_known_default() == to.port_or_known_default()
}

/// reqwest-backed transport with manual redirect tracking
pub struct HttpTransport {
    client: Client,
    max_redirects: usize,
}

impl HttpTransport {
    pub fn new(max_redirects: usize) -> Result<Self, EngineError> {
        // Redirects are followed by hand in follow_redirects()
        let client = Client::builder().redirect(redirect::Policy::none()).build()?;

        Ok(Self {
            client,
            max_redirects,
        })
    }

    async fn follow_redirects(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut current =
            Url::parse(&request.url).map_err(|_| TransportError::InvalidUrl(request.url.clone()))?;
        let mut headers = request.headers.clone();
        let mut history = Vec::new();

        loop {
            let response = self
                .client
                .get(current.clone())
                .headers(headers.clone())
                .send()
                .await?;

            let status = response.status();

            // A redirect without a usable Location is the final answer
            let next = if status.is_redirection() {
                response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .map(|location| {
                        current
                            .join(location)
                            .map_err(|_| TransportError::InvalidRedirect(location.to_string()))
                    })
                    .transpose()?
            } else {
                None
            };

            match next {
                Some(target) => {
                    if history.len() >= self.max_redirects {
                        return Err(TransportError::TooManyRedirects(self.max_redirects));
                    }
                    tracing::debug!("{} redirected ({}) to {}", current, status.as_u16(), target);
                    if !is_same_origin(&current, &target) {
                        for name in &SENSITIVE_HEADERS {
                            headers.remove(name);
                        }
                    }
                    history.push(current.to_string());
                    current = target;
                }
                None => {
                    let response_headers = response.headers().clone();
                    let body = response.bytes().await?.to_vec();

                    return Ok(TransportResponse {
                        status: status.as_u16(),
                        headers: response_headers,
                        body,
                        final_url: current.to_string(),
                        history,
                    });
                }
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        // The timeout covers every hop and the body download
        tokio::time::timeout(request.timeout, self.follow_redirects(request))
            .await
            .map_err(|_| TransportError::Timeout)?
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[async_trait] do?
//    - It rewrites `async fn` in a trait into methods returning boxed futures
//    - That lets us store the transport as Box<dyn Transport> in the Engine
//
// 2. Why redirect::Policy::none()?
//    - With redirects off, every 3xx comes back to us as a normal response
//    - We read its Location header, join it onto the current URL and go again
//    - Each visited URL is pushed onto `history` before we move on
//
// 3. Why is `headers` a local copy?
//    - A redirect to another host must not carry our Authorization or Cookie
//    - We remove them from the copy once, and later hops inherit that
//
// 4. What is .transpose()?
//    - It turns Option<Result<T, E>> into Result<Option<T>, E>
//    - So `?` can bail out on a bad Location while "no Location" stays None
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(url: String) -> TransportRequest {
        TransportRequest {
            url,
            headers: HeaderMap::new(),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_plain_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("server", "LiteSpeed")
                    .set_body_string("hello"),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(10).unwrap();
        let response = transport.get(&request(format!("{}/", server.uri()))).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"hello");
        assert_eq!(response.headers.get("server").unwrap(), "LiteSpeed");
        assert!(response.history.is_empty());
        assert_eq!(response.final_url, format!("{}/", server.uri()));
    }

    #[tokio::test]
    async fn test_sends_request_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "Googlebot-News"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(10).unwrap();
        let mut req = request(format!("{}/news", server.uri()));
        req.headers = crate::identity::headers_for("news", None);
        let response = transport.get(&req).await.unwrap();

        assert_eq!(response.status, 204);
    }

    #[tokio::test]
    async fn test_records_redirect_chain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/uk/"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/uk/"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/uk/home"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/uk/home"))
            .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(10).unwrap();
        let response = transport.get(&request(format!("{}/", server.uri()))).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.history,
            vec![format!("{}/", server.uri()), format!("{}/uk/", server.uri())]
        );
        assert_eq!(response.final_url, format!("{}/uk/home", server.uri()));
    }

    fn with_authorization(url: String) -> TransportRequest {
        let mut req = request(url);
        req.headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        req.headers.insert(COOKIE, HeaderValue::from_static("session=1"));
        req
    }

    #[tokio::test]
    async fn test_credentials_dropped_on_cross_host_redirect() {
        let origin = MockServer::start().await;
        let other = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/landing", other.uri()).as_str()),
            )
            .mount(&origin)
            .await;
        Mock::given(method("GET"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&other)
            .await;
        Mock::given(method("GET"))
            .and(header_exists("cookie"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&other)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&other)
            .await;

        let transport = HttpTransport::new(10).unwrap();
        let response = transport
            .get(&with_authorization(format!("{}/", origin.uri())))
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.final_url, format!("{}/landing", other.uri()));
    }

    #[tokio::test]
    async fn test_credentials_kept_on_same_host_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/inside"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/inside"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(10).unwrap();
        let response = transport
            .get(&with_authorization(format!("{}/", server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_origin_comparison() {
        let url = |s: &str| Url::parse(s).unwrap();
        assert!(is_same_origin(&url("https://a.test/"), &url("https://a.test:443/uk/")));
        assert!(!is_same_origin(&url("http://a.test/"), &url("https://a.test/")));
        assert!(!is_same_origin(&url("https://a.test/"), &url("https://b.test/")));
        assert!(!is_same_origin(&url("http://a.test:8080/"), &url("http://a.test:8081/")));
    }

    #[tokio::test]
    async fn test_redirect_without_location_is_final() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(302))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(10).unwrap();
        let response = transport.get(&request(format!("{}/", server.uri()))).await.unwrap();

        assert_eq!(response.status, 302);
        assert!(response.history.is_empty());
    }

    #[tokio::test]
    async fn test_redirect_loop_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(3).unwrap();
        let error = transport
            .get(&request(format!("{}/loop", server.uri())))
            .await
            .unwrap_err();

        assert!(matches!(error, TransportError::TooManyRedirects(3)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(10).unwrap();
        let mut req = request(format!("{}/slow", server.uri()));
        req.timeout = Duration::from_millis(100);
        let error = transport.get(&req).await.unwrap_err();

        assert!(matches!(error, TransportError::Timeout));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop a listener so the port is (almost certainly) closed
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let transport = HttpTransport::new(10).unwrap();
        let result = transport
            .get(&request(format!("http://127.0.0.1:{}/", port)))
            .await;

        assert!(result.is_err());
    }
}
