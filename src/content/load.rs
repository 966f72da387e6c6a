//! Retrieving the content file from disk or over http(s).

use super::SiteData;
use crate::config::BuildConfig;
use std::{fmt, fs, path::PathBuf, time::Duration};
use thiserror::Error;

/// Every way loading the content file can fail. All of them are fatal to
/// bootstrap.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to fetch `{0}`")]
    Network(String, #[source] reqwest::Error),

    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: u16 },

    #[error("content file is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid content: {0}")]
    Invalid(String),
}

/// Where the content file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Remote(String),
}

impl ContentSource {
    pub fn from_config(build: &BuildConfig) -> Self {
        if build.data_is_remote() {
            Self::Remote(build.data.clone())
        } else {
            Self::File(PathBuf::from(&build.data))
        }
    }

    /// Read the raw document.
    pub fn fetch(&self, timeout: Duration) -> Result<String, ContentError> {
        match self {
            Self::File(path) => {
                fs::read_to_string(path).map_err(|err| ContentError::Io(path.clone(), err))
            }
            Self::Remote(url) => fetch_remote(url, timeout),
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

fn fetch_remote(url: &str, timeout: Duration) -> Result<String, ContentError> {
    let network = |err| ContentError::Network(url.to_string(), err);

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("deskfolio/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(network)?;

    let response = client.get(url).send().map_err(network)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ContentError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(network)
}

/// Fetch, parse and validate the content file.
pub fn load_site_data(source: &ContentSource, timeout: Duration) -> Result<SiteData, ContentError> {
    let json = source.fetch(timeout)?;
    SiteData::from_json(&json)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::tests::SAMPLE_JSON;
    use std::sync::mpsc;
    use std::thread;

    /// Serve `body` with `status` on every request until signalled or the sender drops.
    pub(crate) fn spawn_content_server(
        status: u16,
        body: &'static str,
    ) -> (String, mpsc::Sender<()>, thread::JoinHandle<()>) {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base_url = format!("http://{}", server.server_addr());
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if !matches!(shutdown_rx.try_recv(), Err(mpsc::TryRecvError::Empty)) {
                    break;
                }
                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };
                let response = tiny_http::Response::from_string(body).with_status_code(status);
                let _ = request.respond(response);
            }
        });

        (base_url, shutdown_tx, handle)
    }

    #[test]
    fn test_source_from_config() {
        let mut build = BuildConfig::default();
        assert_eq!(
            ContentSource::from_config(&build),
            ContentSource::File("site-data.json".into())
        );

        build.data = "https://ana.dev/site-data.json".into();
        assert_eq!(
            ContentSource::from_config(&build),
            ContentSource::Remote("https://ana.dev/site-data.json".into())
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site-data.json");
        fs::write(&path, SAMPLE_JSON).unwrap();

        let data = load_site_data(&ContentSource::File(path), Duration::from_secs(1)).unwrap();
        assert_eq!(data.projects.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let source = ContentSource::File("/nonexistent/site-data.json".into());
        let err = load_site_data(&source, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ContentError::Io(..)));
        assert!(err.to_string().contains("/nonexistent/site-data.json"));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site-data.json");
        fs::write(&path, "{ \"personalInfo\": ").unwrap();

        let err = load_site_data(&ContentSource::File(path), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ContentError::Json(_)));
    }

    #[test]
    fn test_load_remote_ok() {
        let (base_url, shutdown, handle) = spawn_content_server(200, SAMPLE_JSON);
        let source = ContentSource::Remote(format!("{base_url}/site-data.json"));

        let data = load_site_data(&source, Duration::from_secs(5)).unwrap();
        assert_eq!(data.personal_info.name, "Ana Lima");

        drop(shutdown);
        handle.join().unwrap();
    }

    #[test]
    fn test_load_remote_not_found() {
        let (base_url, shutdown, handle) = spawn_content_server(404, "not here");
        let source = ContentSource::Remote(format!("{base_url}/site-data.json"));

        let err = load_site_data(&source, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ContentError::Status { status: 404, .. }));
        assert!(err.to_string().contains("status: 404"));

        drop(shutdown);
        handle.join().unwrap();
    }
}
