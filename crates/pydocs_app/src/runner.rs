use std::fs;
use std::io::Write;

use anyhow::Context;
use pydocs_core::ScrapeConfig;
use pydocs_engine::{
    control_output, run_mode, FetchSettings, OutputError, PageError, PersistError, ProgressSink,
    ResponseCache, ScrapeError, Session,
};
use pydocs_logging::{pydocs_debug, pydocs_info};

use crate::cli::Cli;

pub const EXIT_FETCH: u8 = 2;
pub const EXIT_STRUCTURE: u8 = 3;
pub const EXIT_OUTPUT: u8 = 4;
pub const EXIT_OTHER: u8 = 1;

/// Build the run configuration: defaults, then the RON file, then `--base-dir`.
pub fn load_config(cli: &Cli) -> anyhow::Result<ScrapeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            ron::from_str::<ScrapeConfig>(&text)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => ScrapeConfig::default(),
    };
    if let Some(base_dir) = &cli.base_dir {
        config = config.with_base_dir(base_dir.clone());
    }
    Ok(config)
}

/// Run the selected mode and render its table to `console`.
pub fn run(
    cli: &Cli,
    config: &ScrapeConfig,
    progress: &dyn ProgressSink,
    console: &mut dyn Write,
) -> anyhow::Result<()> {
    let mode = cli.mode();
    pydocs_info!(
        "Command line arguments: mode={}, output={:?}, clear_cache={}",
        mode,
        cli.output_mode(),
        cli.clear_cache
    );

    let session = Session::new(
        ResponseCache::new(config.cache_dir()),
        FetchSettings::default(),
        FetchSettings::for_downloads(),
    );
    if cli.clear_cache {
        session.clear_cache()?;
        pydocs_debug!("Response cache cleared at {}", config.cache_dir().display());
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let table = runtime.block_on(run_mode(mode, &session, config, progress))?;

    if let Some(table) = table {
        control_output(&table, cli.output_mode(), mode, config, console)?;
    }
    Ok(())
}

/// Process exit status for a failed run.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(err) = err.downcast_ref::<ScrapeError>() {
        return match err {
            ScrapeError::Page(PageError::Fetch(_)) => EXIT_FETCH,
            ScrapeError::Page(_) => EXIT_STRUCTURE,
            ScrapeError::Persist(_) => EXIT_OUTPUT,
            ScrapeError::Table(_) => EXIT_OTHER,
        };
    }
    if err.is::<OutputError>() || err.is::<PersistError>() {
        return EXIT_OUTPUT;
    }
    EXIT_OTHER
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use pydocs_core::ArityMismatch;
    use pydocs_engine::{FetchMetadata, FetchOutput, NullProgressSink};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn config_file_then_base_dir_override() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("pydocs.ron");
        fs::write(
            &path,
            r#"(main_peps_url: "http://localhost:9000/", encoding: "windows-1251")"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "pydocs",
            "pep",
            "--config",
            path.to_str().unwrap(),
            "--base-dir",
            "/srv/pydocs",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config.main_peps_url, "http://localhost:9000/");
        assert_eq!(config.encoding, "windows-1251");
        assert_eq!(config.main_doc_url, pydocs_core::ScrapeConfig::default().main_doc_url);
        assert_eq!(config.base_dir(), PathBuf::from("/srv/pydocs").as_path());
    }

    #[test]
    fn unreadable_config_is_reported() {
        let cli = Cli::try_parse_from(["pydocs", "pep", "--config", "/nonexistent/pydocs.ron"])
            .unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pydocs.ron"));
    }

    fn sidebar(version: &str) -> String {
        format!(
            r#"<html><body><div class="sphinxsidebarwrapper"><ul>
<li><a href="https://docs.python.org/{version}/">Python {version} (stable)</a></li>
<li><a href="https://www.python.org/doc/versions/">All versions</a></li>
</ul></div></body></html>"#
        )
    }

    #[test]
    fn clear_cache_then_fetch_then_render() {
        let server_rt = tokio::runtime::Runtime::new().unwrap();
        let server = server_rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/3/"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_raw(sidebar("3.13"), "text/html"),
                )
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let temp = tempfile::TempDir::new().unwrap();
        let config_path = temp.path().join("pydocs.ron");
        fs::write(
            &config_path,
            format!(r#"(main_doc_url: "{}/3/")"#, server.uri()),
        )
        .unwrap();
        let cli = Cli::try_parse_from([
            "pydocs",
            "latest-versions",
            "--clear-cache",
            "--config",
            config_path.to_str().unwrap(),
            "--base-dir",
            temp.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        let stale = sidebar("3.99");
        ResponseCache::new(config.cache_dir())
            .put(&FetchOutput {
                metadata: FetchMetadata {
                    original_url: config.main_doc_url.clone(),
                    final_url: config.main_doc_url.clone(),
                    redirect_count: 0,
                    content_type: Some("text/html".to_string()),
                    byte_len: stale.len() as u64,
                },
                bytes: stale.into_bytes(),
            })
            .unwrap();

        let mut console = Vec::new();
        run(&cli, &config, &NullProgressSink, &mut console).unwrap();

        let printed = String::from_utf8(console).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines[0], "Ссылка на документацию Версия Статус");
        assert_eq!(lines[1], "https://docs.python.org/3.13/ 3.13 stable");
        assert!(!printed.contains("3.99"));
        assert!(ResponseCache::new(config.cache_dir())
            .get(&config.main_doc_url)
            .is_some());

        server_rt.block_on(server.verify());
    }

    #[test]
    fn exit_codes_follow_failure_class() {
        let structural = anyhow::Error::from(ScrapeError::Page(PageError::MissingContent {
            what: "version list",
            url: "https://docs.python.org/3/".to_string(),
        }));
        assert_eq!(exit_code(&structural), EXIT_STRUCTURE);

        let table = anyhow::Error::from(ScrapeError::Table(ArityMismatch {
            expected: 3,
            actual: 2,
        }));
        assert_eq!(exit_code(&table), EXIT_OTHER);

        let persist = anyhow::Error::from(ScrapeError::Persist(PersistError::NotADirectory(
            PathBuf::from("downloads"),
        )));
        assert_eq!(exit_code(&persist), EXIT_OUTPUT);

        let output = anyhow::Error::from(OutputError::Io(std::io::Error::other("closed pipe")));
        assert_eq!(exit_code(&output), EXIT_OUTPUT);

        assert_eq!(exit_code(&anyhow::anyhow!("runtime")), EXIT_OTHER);
    }
}
