//! Plain-text demo resources

use crate::error::Result;
use crate::mcp::{ResourceContent, ResourceMeta, ResourceRegistry};

pub fn register(resources: &mut ResourceRegistry) -> Result<()> {
    resources.register_static(
        "config://app",
        ResourceMeta::new("config")
            .title("Application Config")
            .description("Application configuration data")
            .mime_type("text/plain"),
        |uri| Ok(vec![ResourceContent::text(uri, "App configuration here")]),
    )?;

    resources.register_template(
        "greeting://{name}",
        ResourceMeta::new("greeting")
            .title("Greeting Resource")
            .description("Dynamic greeting generator"),
        |uri, params| {
            let name = params.get("name").map(String::as_str).unwrap_or_default();
            Ok(vec![ResourceContent::text(uri, format!("Hello, {name}!"))])
        },
    )?;

    resources.register_template(
        "users://{userId}/profile",
        ResourceMeta::new("user-profile")
            .title("User Profile")
            .description("User profile information"),
        |uri, params| {
            let user_id = params.get("userId").map(String::as_str).unwrap_or_default();
            Ok(vec![ResourceContent::text(
                uri,
                format!("Profile data for user {user_id}"),
            )])
        },
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ResourceRegistry {
        let mut resources = ResourceRegistry::new();
        register(&mut resources).unwrap();
        resources
    }

    #[test]
    fn test_greeting_template() {
        let contents = registry().resolve("greeting://Ada").unwrap();
        assert_eq!(
            contents,
            vec![ResourceContent::text("greeting://Ada", "Hello, Ada!")]
        );
    }

    #[test]
    fn test_profile_template() {
        let contents = registry().resolve("users://42/profile").unwrap();
        assert_eq!(contents[0].text, "Profile data for user 42");
    }

    #[test]
    fn test_listing() {
        let resources = registry();
        assert_eq!(resources.list()[0].mime_type.as_deref(), Some("text/plain"));
        let templates: Vec<_> = resources
            .list_templates()
            .into_iter()
            .map(|t| t.uri_template)
            .collect();
        assert_eq!(templates, vec!["greeting://{name}", "users://{userId}/profile"]);
    }
}
