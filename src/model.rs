use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An issue as returned by the API. Everything but `created_at` is kept in
/// `extra` and written back out unchanged, absent fields included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Issue {
    pub fn title(&self) -> Option<&str> {
        self.extra.get("title").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedIssue {
    #[serde(flatten)]
    pub issue: Issue,
    pub display_date: String,
}

/// Template input for one repository's issues fragment.
#[derive(Debug, Serialize)]
pub struct RenderContext {
    pub name: String,
    pub url: String,
    pub slug: String,
    pub issues: Vec<FormattedIssue>,
}

impl RenderContext {
    pub fn new(repo: &Repository, issues: Vec<FormattedIssue>) -> Self {
        Self {
            name: repo.name.clone(),
            url: repo.html_url.clone(),
            slug: slug::slugify(&repo.name),
            issues,
        }
    }
}
