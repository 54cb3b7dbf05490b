use anyhow::{Context, Result};
use argh::FromArgs;
use tracing_subscriber::EnvFilter;

use std::io::Write;
use std::path::Path;

mod events;
mod format;
mod github;
mod loader;
mod model;
mod page;
mod template;

use events::LogObserver;
use github::Github;
use loader::{Loader, Ordering};
use page::Page;
use template::Templates;

const DEFAULT_ORG: &str = "FreeCodeCampOKC";

/// Render a GitHub organization's repositories and their issues into an HTML page.
///
/// Environment variables (also read from a `.env` file):
///   GITHUB_ORG        organization used when --org is not given
///   GITHUB_API_URL    API endpoint used when --api-url is not given
///   RUST_LOG          log filter, defaults to `info`
#[derive(FromArgs)]
struct Args {
    /// show version
    #[argh(switch)]
    version: bool,

    /// organization whose repositories are listed
    #[argh(option, short = 'o')]
    org: Option<String>,

    /// output file, `-` for stdout [default: ./index.html]
    #[argh(option, short = 'p', default = "String::from(\"./index.html\")")]
    output: String,

    /// order of issue sections: input or completion [default: input]
    #[argh(option, short = 's', default = "Ordering::Input")]
    ordering: Ordering,

    /// api endpoint [default: https://api.github.com]
    #[argh(option)]
    api_url: Option<String>,
}

struct Config {
    org: String,
    api_url: String,
    output: String,
    ordering: Ordering,
}

impl Config {
    /// Flags win over `env`, which wins over the built-in defaults.
    fn resolve<F>(args: Args, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            org: args
                .org
                .or_else(|| env("GITHUB_ORG"))
                .unwrap_or_else(|| DEFAULT_ORG.to_string()),
            api_url: args
                .api_url
                .or_else(|| env("GITHUB_API_URL"))
                .unwrap_or_else(|| Github::API_ENDPOINT.to_string()),
            output: args.output,
            ordering: args.ordering,
        }
    }
}

fn mkdir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("could not create {}", dir.display())),
        _ => Ok(()),
    }
}

fn write_output(output: &str, html: &str) -> Result<()> {
    if output == "-" {
        let stdout = &mut std::io::stdout();
        stdout.write_all(html.as_bytes())?;
        return Ok(());
    }
    let path = Path::new(output);
    mkdir(path)?;
    std::fs::write(path, html).with_context(|| format!("could not write {}", output))?;
    tracing::info!(path = %output, "page written");
    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let templates = Templates::new().context("could not compile templates")?;
    let github = Github::new(&config.api_url);
    let loader = Loader::new(github, templates, LogObserver, &config.org);

    let mut page = Page::new(&config.org);
    let result = loader.run(&mut page, config.ordering).await;

    if result.is_ok() && page.issues.is_empty() {
        tracing::info!(org = %config.org, "no open issues");
    }
    let html = page
        .render(loader.templates())
        .context("could not render page")?;
    write_output(&config.output, &html)?;

    let summary = result.with_context(|| format!("could not load {}", config.org))?;
    tracing::info!(
        repositories = summary.repositories,
        rendered = summary.rendered,
        empty = summary.empty,
        failed = summary.failed,
        "done"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Args = argh::from_env();
    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = run(Config::resolve(args, |key| std::env::var(key).ok())).await {
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(org: Option<&str>, api_url: Option<&str>) -> Args {
        Args {
            version: false,
            org: org.map(String::from),
            output: "-".to_string(),
            ordering: Ordering::Completion,
            api_url: api_url.map(String::from),
        }
    }

    fn env(key: &str) -> Option<String> {
        match key {
            "GITHUB_ORG" => Some("from-env".to_string()),
            "GITHUB_API_URL" => Some("http://env.local".to_string()),
            _ => None,
        }
    }

    #[test]
    fn flags_win_over_env() {
        let config = Config::resolve(args(Some("rust-lang"), Some("http://localhost:8080")), env);
        assert_eq!(config.org, "rust-lang");
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.ordering, Ordering::Completion);
        assert_eq!(config.output, "-");
    }

    #[test]
    fn env_fills_missing_flags() {
        let config = Config::resolve(args(None, None), env);
        assert_eq!(config.org, "from-env");
        assert_eq!(config.api_url, "http://env.local");
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let config = Config::resolve(args(None, None), |_| None);
        assert_eq!(config.org, DEFAULT_ORG);
        assert_eq!(config.api_url, Github::API_ENDPOINT);
    }

    #[test]
    fn parses_command_line() {
        let args = Args::from_args(
            &["org-issues-board"],
            &["--org", "acme", "--ordering", "completion", "-p", "out/page.html"],
        )
        .unwrap();
        assert_eq!(args.org.as_deref(), Some("acme"));
        assert_eq!(args.ordering, Ordering::Completion);
        assert_eq!(args.output, "out/page.html");
        assert_eq!(args.api_url, None);
    }

    #[test]
    fn mkdir_creates_parent() {
        let dir = std::env::temp_dir().join(format!("org-issues-board-{}", std::process::id()));
        let file = dir.join("nested").join("index.html");
        mkdir(&file).unwrap();
        assert!(dir.join("nested").is_dir());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
