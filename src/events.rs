use crate::github::LoadError;
use crate::model::{FormattedIssue, Repository};

/// Hooks fired by the loader as the board fills in. All hooks default to
/// doing nothing.
pub trait Observer {
    fn repositories_loaded(&self, _repos: &[Repository]) {}

    fn issues_loaded(&self, _repo: &Repository, _issues: &[FormattedIssue]) {}

    fn issues_failed(&self, _repo: &Repository, _err: &LoadError) {}
}

pub struct LogObserver;

impl Observer for LogObserver {
    fn repositories_loaded(&self, repos: &[Repository]) {
        tracing::info!(count = repos.len(), "repositories loaded");
    }

    fn issues_loaded(&self, repo: &Repository, issues: &[FormattedIssue]) {
        tracing::info!(repo = %repo.name, count = issues.len(), "issues loaded");
    }

    fn issues_failed(&self, repo: &Repository, _err: &LoadError) {
        tracing::debug!(repo = %repo.name, "issues unavailable");
    }
}

impl<T: Observer + ?Sized> Observer for &T {
    fn repositories_loaded(&self, repos: &[Repository]) {
        (**self).repositories_loaded(repos)
    }

    fn issues_loaded(&self, repo: &Repository, issues: &[FormattedIssue]) {
        (**self).issues_loaded(repo, issues)
    }

    fn issues_failed(&self, repo: &Repository, err: &LoadError) {
        (**self).issues_failed(repo, err)
    }
}
