use headers::{HeaderMapExt, UserAgent};
use hyper::client::HttpConnector;
use hyper::header::{HeaderValue, ACCEPT};
use hyper::{Body, Client, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;

use crate::model::{Issue, Repository};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid url '{url}'")]
    Uri {
        url: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: hyper::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("could not parse response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The two reads the board needs from the GitHub REST API.
#[allow(async_fn_in_trait)]
pub trait GithubApi {
    async fn repositories(&self, org: &str) -> Result<Vec<Repository>, LoadError>;

    async fn issues(&self, org: &str, repo: &str) -> Result<Vec<Issue>, LoadError>;
}

pub struct Github {
    client: Client<HttpsConnector<HttpConnector>>,
    endpoint: String,
}

impl Github {
    pub const API_ENDPOINT: &'static str = "https://api.github.com";

    const USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::builder().build::<_, Body>(HttpsConnector::new()),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn repositories_url(&self, org: &str) -> String {
        format!("{}/orgs/{}/repos", self.endpoint, org)
    }

    fn issues_url(&self, org: &str, repo: &str) -> String {
        format!(
            "{}/repos/{owner}/{repo}/issues?filter=all",
            self.endpoint,
            owner = org,
            repo = repo
        )
    }

    pub async fn get<T>(&self, url: &str) -> Result<T, LoadError>
    where
        T: DeserializeOwned,
    {
        let uri: Uri = url.parse().map_err(|source| LoadError::Uri {
            url: url.to_string(),
            source,
        })?;
        let mut req = Request::new(Body::empty());
        *req.uri_mut() = uri;
        req.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        req.headers_mut()
            .typed_insert(UserAgent::from_static(Self::USER_AGENT));

        tracing::debug!(%url, "GET");
        let transport = |source| LoadError::Transport {
            url: url.to_string(),
            source,
        };
        let resp = self.client.request(req).await.map_err(transport)?;
        let status = resp.status();
        let chunk = hyper::body::to_bytes(resp.into_body())
            .await
            .map_err(transport)?;

        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status,
                body: String::from_utf8_lossy(&chunk).into_owned(),
            });
        }
        serde_json::from_slice(&chunk).map_err(|source| LoadError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl GithubApi for Github {
    async fn repositories(&self, org: &str) -> Result<Vec<Repository>, LoadError> {
        self.get(&self.repositories_url(org)).await
    }

    async fn issues(&self, org: &str, repo: &str) -> Result<Vec<Issue>, LoadError> {
        self.get(&self.issues_url(org, repo)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn builds_endpoints() {
        let gh = Github::new("https://api.github.com/");
        assert_eq!(
            gh.repositories_url("FreeCodeCampOKC"),
            "https://api.github.com/orgs/FreeCodeCampOKC/repos"
        );
        assert_eq!(
            gh.issues_url("FreeCodeCampOKC", "website"),
            "https://api.github.com/repos/FreeCodeCampOKC/website/issues?filter=all"
        );
    }

    #[tokio::test]
    async fn invalid_url_is_reported() {
        let gh = Github::new("not a url");
        let err = gh.repositories("acme").await.unwrap_err();
        assert!(matches!(err, LoadError::Uri { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn decodes_repositories_and_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/repos"))
            .and(header("accept", "application/vnd.github+json"))
            .and(header("user-agent", Github::USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "website", "html_url": "https://github.com/acme/website" }
            ])))
            .mount(&server)
            .await;

        let repos = Github::new(&server.uri()).repositories("acme").await.unwrap();

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "website");
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/gone/issues"))
            .and(query_param("filter", "all"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = Github::new(&server.uri())
            .issues("acme", "gone")
            .await
            .unwrap_err();

        match err {
            LoadError::Status { status, body, .. } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body, "not found");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/site/issues"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>oops</body></html>"),
            )
            .mount(&server)
            .await;

        let err = Github::new(&server.uri())
            .issues("acme", "site")
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::Decode { .. }), "{:?}", err);
    }
}
