use anyhow::Result;
use pagesum_common::PagesumError;
use pagesum_config::PagesumConfig;
use pagesum_http::{FetchOpts, HttpClient, HttpError};
use pagesum_web::{PageSummary, extract, save_raw_html};

use crate::cli::Cli;

fn fetch_error(err: HttpError) -> PagesumError {
    match err {
        HttpError::Build(msg) => PagesumError::Config(msg),
        other => PagesumError::Network(other.to_string()),
    }
}

/// Fetch the page, optionally persist it, and return the capped summary.
pub async fn run(cli: &Cli, cfg: &PagesumConfig) -> Result<PageSummary> {
    let timeout = cli.timeout(cfg);
    let client = HttpClient::new(&cfg.fetch.user_agent)
        .map_err(fetch_error)?
        .with_timeout(timeout);

    tracing::info!(url = %cli.url, timeout_secs = timeout.as_secs(), "app.fetch.start");
    let html = client
        .get_text(&cli.url, FetchOpts::default())
        .await
        .map_err(fetch_error)?;

    if let Some(path) = &cli.save_html {
        save_raw_html(path, &html)?;
    }

    let mut summary = extract(&html);
    summary.truncate(cfg.limits);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesum_config::Limits;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><title> My Page </title><body><h1>Intro</h1><nav><a href="/a">Link A</a><a href="/b">  Link   B </a></nav><h2>Sub</h2></body></html>"#;

    fn cli_for(url: String) -> Cli {
        Cli {
            url,
            timeout: Some(5),
            save_html: None,
            config: None,
        }
    }

    async fn serve(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header(
                "user-agent",
                "OpenDeepWikiBot/0.1 (+https://deepwiki.com)",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn summarizes_served_page() {
        let server = serve(PAGE).await;
        let cli = cli_for(format!("{}/", server.uri()));

        let summary = run(&cli, &PagesumConfig::default()).await.unwrap();

        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({
                "title": "My Page",
                "h1": ["Intro"],
                "h2": ["Sub"],
                "nav_links": [
                    { "href": "/a", "text": "Link A" },
                    { "href": "/b", "text": "Link B" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn saves_raw_html_before_extracting() {
        let server = serve(PAGE).await;
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("raw.html");
        let mut cli = cli_for(format!("{}/", server.uri()));
        cli.save_html = Some(out.clone());

        run(&cli, &PagesumConfig::default()).await.unwrap();

        assert_eq!(std::fs::read_to_string(out).unwrap(), PAGE);
    }

    #[tokio::test]
    async fn applies_configured_limits() {
        let body: String = (0..40)
            .map(|i| format!(r#"<h2>S{i}</h2><a href="/{i}">L{i}</a>"#))
            .collect();
        let server = serve(&body).await;
        let cli = cli_for(format!("{}/", server.uri()));
        let cfg = PagesumConfig {
            limits: Limits {
                h1: 5,
                h2: 2,
                nav_links: 3,
            },
            ..Default::default()
        };

        let summary = run(&cli, &cfg).await.unwrap();

        assert_eq!(summary.h2, ["S0", "S1"]);
        assert_eq!(summary.nav_links.len(), 3);
        assert_eq!(summary.nav_links[2].href, "/2");
    }

    #[tokio::test]
    async fn default_limits_cap_nav_links_at_thirty() {
        let body: String = (0..40).map(|i| format!(r#"<a href="/{i}">L{i}</a>"#)).collect();
        let server = serve(&body).await;
        let cli = cli_for(format!("{}/", server.uri()));

        let summary = run(&cli, &PagesumConfig::default()).await.unwrap();

        assert_eq!(summary.nav_links.len(), 30);
        assert_eq!(summary.nav_links[29].text, "L29");
    }

    #[tokio::test]
    async fn http_failure_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let cli = cli_for(server.uri());

        let err = run(&cli, &PagesumConfig::default()).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PagesumError>(),
            Some(PagesumError::Network(_))
        ));
    }

    #[tokio::test]
    async fn unwritable_snapshot_path_fails_the_run() {
        let server = serve(PAGE).await;
        let tmp = tempfile::TempDir::new().unwrap();
        let mut cli = cli_for(format!("{}/", server.uri()));
        cli.save_html = Some(tmp.path().join("missing").join("raw.html"));

        let err = run(&cli, &PagesumConfig::default()).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PagesumError>(),
            Some(PagesumError::FileWrite { .. })
        ));
    }
}
