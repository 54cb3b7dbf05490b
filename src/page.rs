use serde::Serialize;

use crate::template::Templates;

/// A named slot of the output page holding rendered HTML.
#[derive(Debug, Serialize)]
pub struct Container {
    pub id: &'static str,
    pub html: String,
}

impl Container {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            html: String::new(),
        }
    }

    pub fn set(&mut self, html: String) {
        self.html = html;
    }

    pub fn append(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct Page {
    pub org: String,
    pub repos: Container,
    pub issues: Container,
}

impl Page {
    pub fn new(org: &str) -> Self {
        Self {
            org: org.to_string(),
            repos: Container::new("repos"),
            issues: Container::new("issues"),
        }
    }

    pub fn render(&self, templates: &Templates) -> Result<String, handlebars::RenderError> {
        templates.page(self)
    }
}
