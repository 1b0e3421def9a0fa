//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl, archive and delivery cycle end-to-end.

use site_snapshot::config::Config;
use site_snapshot::crawler::{crawl, BudgetLimit, Coordinator, CrawlLimits, Termination};
use site_snapshot::service::{JobStatus, LocalDelivery, SnapshotService};
use site_snapshot::{SeedTarget, SnapshotError};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML response; `set_body_string` would force `text/plain`
fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

fn css(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/css")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn limits(max_pages: u32, max_total_bytes: u64, max_file_bytes: u64) -> CrawlLimits {
    CrawlLimits {
        max_pages,
        max_total_bytes,
        max_file_bytes,
    }
}

/// Builds a response without Content-Length, body sent as two chunks
fn chunked(content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nTransfer-Encoding: chunked\r\n\
         Connection: close\r\n\r\n",
        content_type
    )
    .into_bytes();
    let (head, tail) = body.split_at(body.len() / 2);
    for chunk in [head, tail] {
        if chunk.is_empty() {
            continue;
        }
        out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}

/// Starts a server that answers every request with `route(path)`
///
/// Returns the base URL. Requests for unknown paths get a 404.
async fn serve_raw(route: fn(&str) -> Option<Vec<u8>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request: Vec<u8> = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let response = route(&target).unwrap_or_else(|| {
                    b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_vec()
                });
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

fn service_config(work_dir: &Path) -> Config {
    let mut config = Config::default();
    config.output.work_dir = work_dir.display().to_string();
    config.cleanup.grace_period_secs = 0;
    config
}

#[tokio::test]
async fn test_crawl_stays_on_domain() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    mount(
        &mock_server,
        "/",
        html(
            r#"<html><head><title>Home</title></head><body>
            <a href="about.html">About</a>
            <a href="http://other.com/x.html">Elsewhere</a>
            </body></html>"#,
        ),
    )
    .await;
    mount(
        &mock_server,
        "/about.html",
        html("<html><body>About us</body></html>"),
    )
    .await;

    let seed = format!("{}/", mock_server.uri());
    let report = crawl(&seed, dest.path(), CrawlLimits::default())
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_downloaded, 2);
    assert_eq!(report.termination, Termination::Exhausted);
    assert!(report.visited.iter().all(|u| !u.contains("other.com")));
    assert!(dest.path().join("index.html").is_file());
    assert!(dest.path().join("about.html").is_file());

    let written: u64 = report.artifacts.iter().map(|a| a.size).sum();
    assert_eq!(report.total_bytes, written);
}

#[tokio::test]
async fn test_srcset_candidates_all_fetched() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    mount(
        &mock_server,
        "/gallery/",
        html(
            r#"<html><body>
            <img srcset="img/small.png 480w, img/medium.png 800w, /img/large.png 1200w" alt="">
            </body></html>"#,
        ),
    )
    .await;
    for route in ["/gallery/img/small.png", "/gallery/img/medium.png", "/img/large.png"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let seed = format!("{}/gallery/", mock_server.uri());
    let report = crawl(&seed, dest.path(), CrawlLimits::default())
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_downloaded, 1);
    assert_eq!(report.resources_downloaded, 3);
    assert!(dest.path().join("gallery/index.html").is_file());
    assert!(dest.path().join("gallery/img/small.png").is_file());
    assert!(dest.path().join("gallery/img/medium.png").is_file());
    assert!(dest.path().join("img/large.png").is_file());
}

#[tokio::test]
async fn test_page_limit_caps_crawl() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount(
        &mock_server,
        "/",
        html(&format!("<html><body>{}</body></html>", links)),
    )
    .await;
    for i in 1..=5 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(html("<html></html>"))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let seed = format!("{}/", mock_server.uri());
    let report = crawl(&seed, dest.path(), limits(1, 1024 * 1024, 1024 * 1024))
        .await
        .expect("A budget-capped crawl is not an error");

    assert_eq!(report.pages_downloaded, 1);
    assert_eq!(report.termination, Termination::BudgetCapped(BudgetLimit::Pages));
    assert!(report.is_budget_capped());
    assert_eq!(report.frontier_remaining, 5);
    assert_eq!(report.urls_processed, 1);
}

#[tokio::test]
async fn test_oversize_resource_skipped() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    let page = r#"<html><body>
        <img src="/big.png">
        <link rel="stylesheet" href="/small.css">
        </body></html>"#;
    mount(&mock_server, "/", html(page)).await;
    mount(
        &mock_server,
        "/big.png",
        ResponseTemplate::new(200).set_body_bytes(vec![7u8; 1001]),
    )
    .await;
    mount(&mock_server, "/small.css", css("body { margin: 0 }")).await;

    let seed = format!("{}/", mock_server.uri());
    let report = crawl(&seed, dest.path(), limits(20, 1024 * 1024, 1000))
        .await
        .expect("Crawl failed");

    assert!(!dest.path().join("big.png").exists());
    assert!(dest.path().join("small.css").is_file());
    assert_eq!(report.outcomes.oversize_rejected, 1);
    assert_eq!(report.resources_downloaded, 1);
    assert_eq!(
        report.total_bytes,
        (page.len() + "body { margin: 0 }".len()) as u64
    );
    assert_eq!(report.termination, Termination::Exhausted);
}

#[tokio::test]
async fn test_byte_budget_stops_before_overrun() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    let page = r#"<html><body><script src="/app.js"></script></body></html>"#;
    mount(&mock_server, "/", html(page)).await;
    mount(
        &mock_server,
        "/app.js",
        ResponseTemplate::new(200).set_body_raw(vec![b';'; 200], "application/javascript"),
    )
    .await;

    let budget = page.len() as u64 + 50;
    let seed = format!("{}/", mock_server.uri());
    let report = crawl(&seed, dest.path(), limits(20, budget, 1024))
        .await
        .expect("Crawl failed");

    assert_eq!(report.termination, Termination::BudgetCapped(BudgetLimit::Bytes));
    assert_eq!(report.total_bytes, page.len() as u64);
    assert!(report.total_bytes <= budget);
    assert_eq!(report.outcomes.over_budget, 1);
    assert!(!dest.path().join("app.js").exists());
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    let routes = [
        ("/", r#"<a href="/a">A</a><a href="/b">B</a><a href="/">Home</a>"#),
        ("/a", r#"<a href="/b">B</a><a href="/#top">Home</a>"#),
        ("/b", r#"<a href="/a">A</a><a href="b">B</a>"#),
    ];
    for (route, body) in routes {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html(&format!("<html><body>{}</body></html>", body)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let seed = format!("{}/", mock_server.uri());
    let report = crawl(&seed, dest.path(), CrawlLimits::default())
        .await
        .expect("Crawl failed");

    let unique: HashSet<&String> = report.visited.iter().collect();
    assert_eq!(unique.len(), report.visited.len());
    assert_eq!(report.urls_processed, report.visited.len());
    assert!(report.pages_downloaded >= 3);
}

#[tokio::test]
async fn test_failed_urls_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    mount(
        &mock_server,
        "/",
        html(r#"<a href="/missing">Gone</a><a href="/broken">Broken</a><a href="/ok">OK</a>"#),
    )
    .await;
    mount(&mock_server, "/missing", ResponseTemplate::new(404)).await;
    mount(&mock_server, "/broken", ResponseTemplate::new(500)).await;
    mount(&mock_server, "/ok", html("<p>fine</p>")).await;

    let seed = format!("{}/", mock_server.uri());
    let report = crawl(&seed, dest.path(), CrawlLimits::default())
        .await
        .expect("Crawl failed");

    assert_eq!(report.outcomes.fetch_failed, 2);
    assert_eq!(report.pages_downloaded, 2);
    assert!(dest.path().join("ok.html").is_file());
    assert!(!dest.path().join("missing.html").exists());
}

#[tokio::test]
async fn test_off_domain_redirect_rejected() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();
    let port = mock_server.address().port();

    mount(&mock_server, "/", html(r#"<a href="/go">Go</a>"#)).await;
    mount(
        &mock_server,
        "/go",
        ResponseTemplate::new(302)
            .insert_header("Location", format!("http://localhost:{}/landing", port).as_str()),
    )
    .await;
    mount(&mock_server, "/landing", html("<p>landed</p>")).await;

    let seed = format!("http://127.0.0.1:{}/", port);
    let report = crawl(&seed, dest.path(), CrawlLimits::default())
        .await
        .expect("Crawl failed");

    assert_eq!(report.outcomes.scope_rejected, 1);
    assert_eq!(report.pages_downloaded, 1);
    assert!(!dest.path().join("go.html").exists());
    assert!(!dest.path().join("landing.html").exists());
}

#[tokio::test]
async fn test_unreachable_seed_is_empty_result() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();
    mount(&mock_server, "/", ResponseTemplate::new(503)).await;

    let seed = format!("{}/", mock_server.uri());
    let result = crawl(&seed, dest.path(), CrawlLimits::default()).await;

    assert!(matches!(result, Err(SnapshotError::EmptyResult { .. })));
}

#[tokio::test]
async fn test_coordinator_reused_across_crawls() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", html(r#"<a href="/next">Next</a>"#)).await;
    mount(&mock_server, "/next", html("<p>next</p>")).await;

    let coordinator = Coordinator::with_limits(&Config::default(), CrawlLimits::default())
        .expect("Failed to create coordinator");
    let seed = SeedTarget::parse(&format!("{}/", mock_server.uri())).unwrap();

    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let (first, second) = tokio::join!(
        coordinator.run(&seed, first_dir.path()),
        coordinator.run(&seed, second_dir.path())
    );

    let first = first.expect("First crawl failed");
    let second = second.expect("Second crawl failed");
    assert_eq!(first.pages_downloaded, 2);
    assert_eq!(second.pages_downloaded, 2);
    assert!(first_dir.path().join("next.html").is_file());
    assert!(second_dir.path().join("next.html").is_file());
}

#[tokio::test]
async fn test_service_job_delivers_archive() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/",
        html(r#"<link rel="stylesheet" href="/style.css"><a href="/docs/">Docs</a>"#),
    )
    .await;
    mount(&mock_server, "/style.css", css("h1 { color: red }")).await;
    mount(&mock_server, "/docs/", html("<h1>Docs</h1>")).await;

    let work = TempDir::new().unwrap();
    let outbox = TempDir::new().unwrap();
    let service = SnapshotService::new(
        service_config(work.path()),
        LocalDelivery::new(outbox.path()),
    )
    .expect("Failed to create service");

    let receipt = service
        .submit(1, &mock_server.uri())
        .await
        .expect("Job failed");
    assert_eq!(service.status(1), None);

    let port = mock_server.address().port();
    let delivered = outbox
        .path()
        .join(format!("website_backup_127.0.0.1_{}.zip", port));
    assert!(delivered.is_file());
    assert_eq!(receipt.archive.files, 3);
    assert!(receipt
        .caption
        .starts_with("Download completed! Downloaded 3 files. File size: "));

    let mut archive = zip::ZipArchive::new(File::open(&delivered).unwrap()).unwrap();
    let names: HashSet<String> = archive.file_names().map(String::from).collect();
    assert!(names.contains("index.html"));
    assert!(names.contains("style.css"));
    assert!(names.contains("docs/index.html"));
    assert_eq!(archive.by_name("style.css").unwrap().size(), 17);

    receipt.cleanup.await.unwrap();
    assert!(!receipt.paths.root.exists());
    assert!(delivered.is_file());
}

#[tokio::test]
async fn test_service_empty_result_cleans_up() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", ResponseTemplate::new(404)).await;

    let work = TempDir::new().unwrap();
    let outbox = TempDir::new().unwrap();
    let service = SnapshotService::new(
        service_config(work.path()),
        LocalDelivery::new(outbox.path()),
    )
    .unwrap();

    let result = service.submit(9, &mock_server.uri()).await;

    assert!(matches!(result, Err(SnapshotError::EmptyResult { .. })));
    assert_eq!(service.status(9), None);
    assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    assert_eq!(fs::read_dir(outbox.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_service_one_job_per_requester() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>slow</p>").set_delay(std::time::Duration::from_millis(200)))
        .mount(&mock_server)
        .await;

    let work = TempDir::new().unwrap();
    let outbox = TempDir::new().unwrap();
    let service = SnapshotService::new(
        service_config(work.path()),
        LocalDelivery::new(outbox.path()),
    )
    .unwrap();

    let seed = mock_server.uri();
    let watch = async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        service.status(4)
    };
    let (first, second, other, seen) = tokio::join!(
        service.submit(4, &seed),
        service.submit(4, &seed),
        service.submit(5, &seed),
        watch
    );

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(SnapshotError::JobInProgress { requester: 4 })
    ));
    let other = other.expect("A different requester runs concurrently");
    assert_eq!(seen, Some(JobStatus::Downloading));
    assert_ne!(first.unwrap().paths.root, other.paths.root);
    assert_eq!(service.registry().active_count(), 0);
}

#[tokio::test]
async fn test_streamed_resource_over_cap_skipped() {
    fn route(target: &str) -> Option<Vec<u8>> {
        match target {
            "/" => Some(chunked(
                "text/html",
                br#"<script src="/big.js"></script><script src="/fits.js"></script>"#,
            )),
            "/big.js" => Some(chunked("application/javascript", &[b';'; 1001])),
            "/fits.js" => Some(chunked("application/javascript", &[b';'; 1000])),
            _ => None,
        }
    }

    let base = serve_raw(route).await;
    let dest = TempDir::new().unwrap();

    let report = crawl(&format!("{}/", base), dest.path(), limits(20, 1024 * 1024, 1000))
        .await
        .expect("Crawl failed");

    assert!(!dest.path().join("big.js").exists());
    assert_eq!(fs::metadata(dest.path().join("fits.js")).unwrap().len(), 1000);
    assert_eq!(report.outcomes.oversize_rejected, 1);
    assert_eq!(report.resources_downloaded, 1);
    let written: u64 = report.artifacts.iter().map(|a| a.size).sum();
    assert_eq!(report.total_bytes, written);
    assert_eq!(report.termination, Termination::Exhausted);
}

#[tokio::test]
async fn test_last_page_at_limit_reports_exhausted() {
    let mock_server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    mount(
        &mock_server,
        "/",
        html(r#"<a href="about.html">About</a><a href="http://other.com/x.html">Away</a>"#),
    )
    .await;
    mount(&mock_server, "/about.html", html("<p>About us</p>")).await;

    let seed = format!("{}/", mock_server.uri());
    let report = crawl(&seed, dest.path(), limits(2, 1024 * 1024, 1024 * 1024))
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_downloaded, 2);
    assert_eq!(report.termination, Termination::Exhausted);
    assert!(!report.is_budget_capped());
    assert_eq!(report.frontier_remaining, 0);
}
