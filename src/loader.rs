//! Two-stage pipeline: list an organization's repositories, then fetch the
//! issues of every repository concurrently and render them into a [`Page`].

use std::fmt;
use std::str::FromStr;

use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::events::Observer;
use crate::format::format_issue;
use crate::github::{GithubApi, LoadError};
use crate::model::{Issue, RenderContext, Repository};
use crate::page::Page;
use crate::template::Templates;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("could not render {0}")]
    Render(&'static str, #[source] handlebars::RenderError),
}

/// Order in which per-repository issue fragments are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    /// Wait for every request, then append in repository list order.
    #[default]
    Input,
    /// Append each fragment as soon as its request resolves.
    Completion,
}

impl FromStr for Ordering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Ordering::Input),
            "completion" => Ok(Ordering::Completion),
            _ => Err(format!(
                "unknown ordering '{}', expected 'input' or 'completion'",
                s
            )),
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Ordering::Input => write!(f, "input"),
            Ordering::Completion => write!(f, "completion"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub repositories: usize,
    pub rendered: usize,
    pub empty: usize,
    pub failed: usize,
}

pub struct Loader<A, O> {
    api: A,
    templates: Templates,
    observer: O,
    org: String,
}

impl<A: GithubApi, O: Observer> Loader<A, O> {
    pub fn new(api: A, templates: Templates, observer: O, org: &str) -> Self {
        Self {
            api,
            templates,
            observer,
            org: org.to_string(),
        }
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Lists the organization's repositories into the `repos` container.
    ///
    /// On failure a notice replaces the container content and the error is
    /// returned; nothing is retried.
    pub async fn load_repositories(&self, page: &mut Page) -> Result<Vec<Repository>, Error> {
        match self.api.repositories(&self.org).await {
            Ok(repos) => {
                let html = self
                    .templates
                    .repos(&repos)
                    .map_err(|e| Error::Render("repositories", e))?;
                page.repos.set(html);
                self.observer.repositories_loaded(&repos);
                Ok(repos)
            }
            Err(err) => {
                tracing::error!(org = %self.org, error = %chain(&err), "could not load repositories");
                let html = self
                    .templates
                    .repos_failed(&self.org, &err)
                    .map_err(|e| Error::Render("repositories", e))?;
                page.repos.set(html);
                Err(err.into())
            }
        }
    }

    /// Fetches issues for every repository at once. A failed repository gets
    /// an error fragment and never holds up the others.
    pub async fn load_issues(
        &self,
        repos: &[Repository],
        page: &mut Page,
        ordering: Ordering,
    ) -> Result<Summary, Error> {
        let mut summary = Summary {
            repositories: repos.len(),
            ..Summary::default()
        };
        let fetches = repos.iter().map(|repo| async move {
            let result = self.api.issues(&self.org, &repo.name).await;
            (repo, result)
        });

        match ordering {
            Ordering::Input => {
                for (repo, result) in join_all(fetches).await {
                    self.show_issues(repo, result, page, &mut summary)?;
                }
            }
            Ordering::Completion => {
                let mut pending: FuturesUnordered<_> = fetches.collect();
                while let Some((repo, result)) = pending.next().await {
                    self.show_issues(repo, result, page, &mut summary)?;
                }
            }
        }

        tracing::debug!(?summary, "issues done");
        Ok(summary)
    }

    pub async fn run(&self, page: &mut Page, ordering: Ordering) -> Result<Summary, Error> {
        let repos = self.load_repositories(page).await?;
        self.load_issues(&repos, page, ordering).await
    }

    fn show_issues(
        &self,
        repo: &Repository,
        result: Result<Vec<Issue>, LoadError>,
        page: &mut Page,
        summary: &mut Summary,
    ) -> Result<(), Error> {
        match result {
            Err(err) => {
                tracing::error!(repo = %repo.name, error = %chain(&err), "could not load issues");
                let html = self
                    .templates
                    .issues_failed(repo, &err)
                    .map_err(|e| Error::Render("issues", e))?;
                page.issues.append(&html);
                self.observer.issues_failed(repo, &err);
                summary.failed += 1;
            }
            Ok(issues) if issues.is_empty() => {
                tracing::debug!(repo = %repo.name, "no issues");
                summary.empty += 1;
            }
            Ok(issues) => {
                let issues = issues.into_iter().map(format_issue).collect();
                let ctx = RenderContext::new(repo, issues);
                let html = self
                    .templates
                    .issues(&ctx)
                    .map_err(|e| Error::Render("issues", e))?;
                page.issues.append(&html);
                self.observer.issues_loaded(repo, &ctx.issues);
                summary.rendered += 1;
            }
        }
        Ok(())
    }
}

fn chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
