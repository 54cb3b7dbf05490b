use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::model::{RenderContext, Repository};

pub const REPOS: &str = r#"<ul class="repos">
{{#each repos}}
  <li class="repo"><a href="{{html_url}}">{{name}}</a>{{#if description}} <span class="description">{{description}}</span>{{/if}}</li>
{{/each}}
</ul>
"#;

pub const REPOS_FAILED: &str = r#"<p class="error">Could not load repositories for {{org}}: {{error}}</p>
"#;

pub const ISSUES: &str = r#"<section class="repo-issues" id="issues-{{slug}}">
  <h2><a href="{{url}}">{{name}}</a></h2>
  <ul>
  {{#each issues}}
    <li class="issue">
      <a href="{{html_url}}">{{title}}</a>
      <time>{{display_date}}</time>
      {{#if body}}<p>{{body}}</p>{{/if}}
    </li>
  {{/each}}
  </ul>
</section>
"#;

pub const ISSUES_FAILED: &str = r#"<section class="repo-issues error" id="issues-{{slug}}">
  <h2><a href="{{url}}">{{name}}</a></h2>
  <p class="error">Could not load issues: {{error}}</p>
</section>
"#;

pub const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{org}}</title>
</head>
<body>
  <h1>{{org}}</h1>
  <div id="{{repos.id}}">
{{{repos.html}}}  </div>
  <div id="{{issues.id}}">
{{{issues.html}}}  </div>
</body>
</html>
"#;

/// Compiled templates for every fragment the board renders.
pub struct Templates {
    hb: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut hb = Handlebars::new();
        hb.register_template_string("repos", REPOS)?;
        hb.register_template_string("repos_failed", REPOS_FAILED)?;
        hb.register_template_string("issues", ISSUES)?;
        hb.register_template_string("issues_failed", ISSUES_FAILED)?;
        hb.register_template_string("page", PAGE)?;
        Ok(Self { hb })
    }

    pub fn repos(&self, repos: &[Repository]) -> Result<String, handlebars::RenderError> {
        self.hb.render("repos", &json!({ "repos": repos }))
    }

    pub fn repos_failed(
        &self,
        org: &str,
        error: &dyn std::fmt::Display,
    ) -> Result<String, handlebars::RenderError> {
        self.hb.render(
            "repos_failed",
            &json!({ "org": org, "error": error.to_string() }),
        )
    }

    pub fn issues(&self, ctx: &RenderContext) -> Result<String, handlebars::RenderError> {
        self.hb.render("issues", ctx)
    }

    pub fn issues_failed(
        &self,
        repo: &Repository,
        error: &dyn std::fmt::Display,
    ) -> Result<String, handlebars::RenderError> {
        let ctx = RenderContext::new(repo, Vec::new());
        self.hb.render(
            "issues_failed",
            &json!({
                "name": ctx.name,
                "url": ctx.url,
                "slug": ctx.slug,
                "error": error.to_string(),
            }),
        )
    }

    pub fn page<T: Serialize>(&self, page: &T) -> Result<String, handlebars::RenderError> {
        self.hb.render("page", page)
    }
}
