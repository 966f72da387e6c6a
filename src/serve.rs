//! Development server.
//!
//! Built on `tiny_http`:
//!
//! - `/` and `/index.html` bootstrap the page live on every request, so
//!   content and shell edits show up on reload
//! - `?viewport=N&click=ACTION` replays inputs before the page is returned
//! - every other path is served from the build output directory
//! - file watching (via `watch`) and graceful shutdown on Ctrl+C
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Main Thread   │     │  Watcher Thread  │
//! │  (HTTP Server)  │     │  (File Monitor)  │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//!   live bootstrap /         reload config,
//!   static files             re-copy assets
//! ```

use crate::{
    bootstrap::{self, Boot},
    build::PAGE_NAME,
    config::{SiteConfig, cfg},
    desktop::Gesture,
    log,
    utils::minify::minify_page,
    watch::watch_for_changes_blocking,
};
use anyhow::{Context, Result, anyhow};
use std::{fs, net::SocketAddr, path::Path, sync::Arc};
use tiny_http::{Header, Request, Response, Server};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Start the development server with optional file watching.
///
/// Blocks until Ctrl+C is received.
pub fn serve_site() -> Result<()> {
    let c = cfg();
    let interface: std::net::IpAddr = c.serve.interface.parse()?;

    let (server, addr) = try_bind_port(interface, c.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    if c.serve.watch {
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking() {
                log!("watch"; "{err}");
            }
        });
    }

    for request in server.incoming_requests() {
        // config may have been hot-reloaded by the watcher
        if let Err(e) = handle_request(request, &cfg()) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// A response before it is handed to `tiny_http`.
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    fn text(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: message.into().into_bytes(),
        }
    }
}

fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    let reply = resolve(request.url(), config);
    if reply.status >= 500 {
        log!("serve"; "{} → {}", request.url(), reply.status);
    }

    let header = Header::from_bytes("Content-Type", reply.content_type)
        .map_err(|()| anyhow!("invalid content type `{}`", reply.content_type))?;
    let response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

/// Resolution order:
/// 1. `/` or `/index.html` → live page
/// 2. Exact file in the output directory → that file
/// 3. Directory with index.html → that index
/// 4. Nothing found → 404
fn resolve(url: &str, config: &SiteConfig) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let path = urlencoding::decode(path)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    let request_path = path.trim_matches('/');

    if request_path.is_empty() || request_path == PAGE_NAME {
        return match LiveQuery::parse(query, config) {
            Ok(query) => live_page(&query, config).unwrap_or_else(|err| {
                log!("error"; "{err:#}");
                Reply::text(500, format!("{err:#}"))
            }),
            Err(message) => Reply::text(400, message),
        };
    }

    // no escaping the output directory
    if request_path.split('/').any(|part| part == "..") {
        return Reply::text(404, "404 Not Found");
    }

    let local_path = config.build.output.join(request_path);
    let file = if local_path.is_dir() {
        local_path.join(PAGE_NAME)
    } else {
        local_path
    };
    match fs::read(&file) {
        Ok(body) if file.is_file() => Reply::ok(guess_content_type(&file), body),
        _ => Reply::text(404, "404 Not Found"),
    }
}

// ============================================================================
// Live Page
// ============================================================================

/// `?viewport=N&click=ACTION&click=ACTION...`
#[derive(Debug, PartialEq)]
struct LiveQuery {
    viewport: u32,
    clicks: Vec<Gesture>,
}

impl LiveQuery {
    fn parse(query: &str, config: &SiteConfig) -> Result<Self, String> {
        let mut parsed = Self {
            viewport: config.desktop.viewport_width,
            clicks: Vec::new(),
        };
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(value).map_err(|e| e.to_string())?;
            match key {
                "viewport" => {
                    parsed.viewport = value
                        .parse()
                        .ok()
                        .filter(|&w| w > 0)
                        .ok_or_else(|| format!("invalid viewport `{value}`"))?;
                }
                "click" => parsed
                    .clicks
                    .push(value.parse().map_err(|e: crate::desktop::GestureError| e.to_string())?),
                // cache busters and the like
                _ => {}
            }
        }
        Ok(parsed)
    }
}

fn live_page(query: &LiveQuery, config: &SiteConfig) -> Result<Reply> {
    let shell = bootstrap::read_shell(&config.build)?;
    let boot = bootstrap::bootstrap(&shell, config, query.viewport)
        .with_context(|| format!("Page shell is not valid HTML: {}", config.build.shell.display()))?;

    let document = match boot {
        Boot::Ready(mut session) => {
            for gesture in &query.clicks {
                let outcome = session.perform(gesture);
                if !outcome.changed() {
                    log!("serve"; "{gesture:?} had no effect");
                }
            }
            session.document
        }
        failed @ Boot::Failed { .. } => failed.into_document(),
    };

    let html = document.to_html();
    let body = minify_page(html.as_bytes(), &config.build).into_owned();
    Ok(Reply::ok("text/html; charset=utf-8", body))
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::SAMPLE_JSON;
    use tempfile::TempDir;

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("site-data.json"), SAMPLE_JSON).unwrap();
        fs::create_dir_all(root.join("public/assets")).unwrap();
        fs::write(root.join("public/assets/ana.png"), b"\x89PNG").unwrap();

        let mut config = SiteConfig::default();
        config.build.data = root.join("site-data.json").to_string_lossy().into_owned();
        config.build.shell = root.join("index.html");
        config.build.output = root.join("public");
        config.build.minify = false;
        (dir, config)
    }

    fn body(reply: &Reply) -> &str {
        std::str::from_utf8(&reply.body).unwrap()
    }

    #[test]
    fn test_root_bootstraps_live() {
        let (dir, config) = site();
        let reply = resolve("/", &config);
        assert_eq!(reply.status, 200);
        assert!(body(&reply).contains("data-project-target=\"proj3\""));

        // content edits show up without a rebuild
        let edited = SAMPLE_JSON.replace("Ana Lima // Portfolio", "Ana // v2");
        fs::write(dir.path().join("site-data.json"), edited).unwrap();
        let reply = resolve("/index.html", &config);
        assert!(body(&reply).contains("<title>Ana // v2</title>"));
    }

    #[test]
    fn test_click_replay_in_query() {
        let (_dir, config) = site();
        let reply = resolve("/?click=window%3Aabout&click=project:proj3", &config);
        assert_eq!(reply.status, 200);
        let doc = crate::dom::Document::parse(body(&reply)).unwrap();
        let about = doc.get_element_by_id("about").unwrap();
        assert_eq!(doc.style(about, "display").as_deref(), Some("block"));
        let view = doc.get_element_by_id("project-view").unwrap();
        assert_eq!(doc.style(view, "display").as_deref(), Some("block"));
    }

    #[test]
    fn test_narrow_viewport_query() {
        let (_dir, config) = site();
        let reply = resolve("/?viewport=800&click=window:about", &config);
        let doc = crate::dom::Document::parse(body(&reply)).unwrap();
        let about = doc.get_element_by_id("about").unwrap();
        assert_eq!(doc.style(about, "display").as_deref(), Some("none"));
    }

    #[test]
    fn test_bad_query_is_400() {
        let (_dir, config) = site();
        assert_eq!(resolve("/?click=explode", &config).status, 400);
        assert_eq!(resolve("/?viewport=wide", &config).status, 400);
        assert_eq!(resolve("/?t=123", &config).status, 200);
    }

    #[test]
    fn test_missing_content_serves_fallback() {
        let (dir, config) = site();
        fs::remove_file(dir.path().join("site-data.json")).unwrap();
        let reply = resolve("/", &config);
        assert_eq!(reply.status, 200);
        assert!(body(&reply).contains("Erro ao carregar conteúdo. Verifique o console."));
    }

    #[test]
    fn test_static_files() {
        let (_dir, config) = site();
        let reply = resolve("/assets/ana.png", &config);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "image/png");
        assert_eq!(reply.body, b"\x89PNG");

        assert_eq!(resolve("/assets/missing.png", &config).status, 404);
        assert_eq!(resolve("/assets", &config).status, 404);
        assert_eq!(resolve("/../site-data.json", &config).status, 404);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a.css")), "text/css; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("a.bin")), "application/octet-stream");
    }
}
