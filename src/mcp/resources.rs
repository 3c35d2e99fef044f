//! Resource registry: static URIs and URI templates

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::protocol::{ResourceContent, ResourceDefinition, ResourceTemplateDefinition};
use crate::error::{DemoError, Result};

static PLACEHOLDER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid placeholder regex"));

/// Values extracted from a templated URI, keyed by placeholder name
pub type UriParams = HashMap<String, String>;

type ResourceHandler =
    Arc<dyn Fn(&str, &UriParams) -> Result<Vec<ResourceContent>> + Send + Sync>;

/// Display metadata for a resource
#[derive(Debug, Clone, Default)]
pub struct ResourceMeta {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub mime_type: Option<String>,
}

impl ResourceMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A URI pattern with `{name}` placeholders, each matching one path segment
#[derive(Debug, Clone)]
pub struct UriTemplate {
    pattern: String,
    regex: Regex,
    names: Vec<String>,
}

impl UriTemplate {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid =
            |why: &str| DemoError::InvalidInput(format!("URI template '{pattern}': {why}"));

        let mut regex = String::from("^");
        let mut names = Vec::new();
        let mut rest = pattern;

        while let Some(open) = rest.find(['{', '}']) {
            if rest.as_bytes()[open] == b'}' {
                return Err(invalid("unmatched '}'"));
            }
            regex.push_str(&regex::escape(&rest[..open]));
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
            let name = &after[..close];
            if !PLACEHOLDER_NAME.is_match(name) {
                return Err(invalid(&format!("invalid placeholder '{name}'")));
            }
            if names.iter().any(|n| n == name) {
                return Err(invalid(&format!("duplicate placeholder '{name}'")));
            }
            regex.push_str(&format!("(?P<{name}>[^/]+)"));
            names.push(name.to_string());
            rest = &after[close + 1..];
        }
        regex.push_str(&regex::escape(rest));
        regex.push('$');

        let regex = Regex::new(&regex).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            names,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Placeholder values when `uri` matches
    pub fn matches(&self, uri: &str) -> Option<UriParams> {
        let captures = self.regex.captures(uri)?;
        Some(
            self.names
                .iter()
                .filter_map(|n| captures.name(n).map(|m| (n.clone(), m.as_str().to_string())))
                .collect(),
        )
    }
}

struct StaticResource {
    uri: String,
    meta: ResourceMeta,
    handler: ResourceHandler,
}

struct TemplateResource {
    template: UriTemplate,
    meta: ResourceMeta,
    handler: ResourceHandler,
}

/// URI → content handlers. Static URIs are matched before templates.
#[derive(Default)]
pub struct ResourceRegistry {
    statics: Vec<StaticResource>,
    templates: Vec<TemplateResource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_static<F>(
        &mut self,
        uri: impl Into<String>,
        meta: ResourceMeta,
        handler: F,
    ) -> Result<()>
    where
        F: Fn(&str) -> Result<Vec<ResourceContent>> + Send + Sync + 'static,
    {
        let uri = uri.into();
        if self.statics.iter().any(|r| r.uri == uri) {
            return Err(DemoError::DuplicateRegistration(format!("resource '{uri}'")));
        }
        self.statics.push(StaticResource {
            uri,
            meta,
            handler: Arc::new(move |uri: &str, _: &UriParams| handler(uri)),
        });
        Ok(())
    }

    pub fn register_template<F>(
        &mut self,
        pattern: &str,
        meta: ResourceMeta,
        handler: F,
    ) -> Result<()>
    where
        F: Fn(&str, &UriParams) -> Result<Vec<ResourceContent>> + Send + Sync + 'static,
    {
        if self.templates.iter().any(|t| t.template.as_str() == pattern) {
            return Err(DemoError::DuplicateRegistration(format!(
                "resource template '{pattern}'"
            )));
        }
        self.templates.push(TemplateResource {
            template: UriTemplate::parse(pattern)?,
            meta,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Read a resource by URI
    pub fn resolve(&self, uri: &str) -> Result<Vec<ResourceContent>> {
        if let Some(resource) = self.statics.iter().find(|r| r.uri == uri) {
            return (resource.handler)(uri, &UriParams::new());
        }

        for resource in &self.templates {
            if let Some(params) = resource.template.matches(uri) {
                tracing::debug!(uri, template = resource.template.as_str(), "template matched");
                return (resource.handler)(uri, &params);
            }
        }

        Err(DemoError::ResourceNotFound(uri.to_string()))
    }

    /// Static resources, in registration order
    pub fn list(&self) -> Vec<ResourceDefinition> {
        self.statics
            .iter()
            .map(|r| ResourceDefinition {
                uri: r.uri.clone(),
                name: r.meta.name.clone(),
                title: r.meta.title.clone(),
                description: r.meta.description.clone(),
                mime_type: r.meta.mime_type.clone(),
            })
            .collect()
    }

    /// Resource templates, in registration order
    pub fn list_templates(&self) -> Vec<ResourceTemplateDefinition> {
        self.templates
            .iter()
            .map(|t| ResourceTemplateDefinition {
                uri_template: t.template.as_str().to_string(),
                name: t.meta.name.clone(),
                title: t.meta.title.clone(),
                description: t.meta.description.clone(),
                mime_type: t.meta.mime_type.clone(),
            })
            .collect()
    }
}
