//! Test-user payload construction and Extic extension accessors.
//!
//! User payloads stay untyped `serde_json::Value` objects because the vendor
//! extension namespace carries loosely defined, evolving fields. The builder
//! produces the wire shape the Extic SCIM endpoint expects; the accessors
//! read back the extension fields without assuming any of them are present.

use serde::Serialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// SCIM core User schema URN.
pub const CORE_USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// Extic vendor extension schema URN.
pub const EXTIC_USER_SCHEMA: &str = "urn:extic:scim:schemas:1.0:User";

/// One vendor extended attribute, a name/value pair.
///
/// The server treats `extendAttrs` as an ordered sequence; names are not
/// guaranteed unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendAttr {
    pub name: String,
    pub value: String,
}

impl ExtendAttr {
    /// Create a name/value pair.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Fluent builder for test-user payloads carrying the Extic extension.
#[derive(Debug, Clone, Default)]
pub struct UserPayloadBuilder {
    user_name: String,
    password: Option<String>,
    display_name: Option<String>,
    groups: Vec<String>,
    role: Option<String>,
    extend_attrs: Vec<ExtendAttr>,
}

impl UserPayloadBuilder {
    /// Start a payload for the given `userName`.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    /// Set the initial password (create only; updates omit it).
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the display name.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Add one Extic group membership.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Set the extension `role`.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Append one extended attribute. Order is preserved on the wire.
    pub fn extend_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extend_attrs.push(ExtendAttr::new(name, value));
        self
    }

    /// Assemble the SCIM payload with both schema URNs and the extension
    /// namespace object.
    pub fn build(self) -> Value {
        let mut extension = Map::new();
        extension.insert("exticGroups".to_string(), json!(self.groups));
        if let Some(role) = self.role {
            extension.insert("role".to_string(), Value::String(role));
        }
        if !self.extend_attrs.is_empty() {
            extension.insert("extendAttrs".to_string(), json!(self.extend_attrs));
        }

        let mut user = Map::new();
        user.insert(
            "schemas".to_string(),
            json!([CORE_USER_SCHEMA, EXTIC_USER_SCHEMA]),
        );
        user.insert("userName".to_string(), Value::String(self.user_name));
        if let Some(password) = self.password {
            user.insert("password".to_string(), Value::String(password));
        }
        if let Some(display_name) = self.display_name {
            user.insert("displayName".to_string(), Value::String(display_name));
        }
        user.insert(EXTIC_USER_SCHEMA.to_string(), Value::Object(extension));
        Value::Object(user)
    }
}

/// Mint a unique test username with the given prefix.
pub fn unique_user_name(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &suffix[..8])
}

/// Server-assigned resource `id`, when present.
pub fn resource_id(user: &Value) -> Option<String> {
    user.get("id").and_then(Value::as_str).map(str::to_owned)
}

/// The Extic extension object, when present.
pub fn extic_extension(user: &Value) -> Option<&Value> {
    user.get(EXTIC_USER_SCHEMA)
}

/// Group names from the extension; empty when the extension is absent.
pub fn extic_groups(user: &Value) -> Vec<&str> {
    extic_extension(user)
        .and_then(|ext| ext.get("exticGroups"))
        .and_then(Value::as_array)
        .map(|groups| groups.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// The extension `role`, when present.
pub fn role(user: &Value) -> Option<&str> {
    extic_extension(user)
        .and_then(|ext| ext.get("role"))
        .and_then(Value::as_str)
}

/// Extended attributes as name/value pairs, in wire order. Entries without
/// both string fields are skipped.
pub fn extend_attrs(user: &Value) -> Vec<(String, String)> {
    extic_extension(user)
        .and_then(|ext| ext.get("extendAttrs"))
        .and_then(Value::as_array)
        .map(|attrs| {
            attrs
                .iter()
                .filter_map(|attr| {
                    let name = attr.get("name")?.as_str()?;
                    let value = attr.get("value")?.as_str()?;
                    Some((name.to_string(), value.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `totalResults` from a list response, 0 when missing.
pub fn total_results(body: &Value) -> u64 {
    body.get("totalResults").and_then(Value::as_u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_both_schema_urns() {
        let payload = UserPayloadBuilder::new("alice")
            .password("P@ss")
            .display_name("Alice")
            .group("Standard Users")
            .extend_attr("accessLevel", "basic")
            .build();

        assert_eq!(
            payload["schemas"],
            json!([CORE_USER_SCHEMA, EXTIC_USER_SCHEMA])
        );
        assert_eq!(payload["userName"], "alice");
        assert_eq!(payload["password"], "P@ss");
        assert_eq!(payload["displayName"], "Alice");
        assert_eq!(
            payload[EXTIC_USER_SCHEMA]["exticGroups"],
            json!(["Standard Users"])
        );
        assert_eq!(
            payload[EXTIC_USER_SCHEMA]["extendAttrs"],
            json!([{"name": "accessLevel", "value": "basic"}])
        );
    }

    #[test]
    fn builder_omits_optional_fields() {
        let payload = UserPayloadBuilder::new("bob").group("Standard Users").build();
        assert!(payload.get("password").is_none());
        assert!(payload.get("displayName").is_none());
        assert!(payload[EXTIC_USER_SCHEMA].get("role").is_none());
        assert!(payload[EXTIC_USER_SCHEMA].get("extendAttrs").is_none());
    }

    #[test]
    fn accessors_read_back_extension_fields() {
        let payload = UserPayloadBuilder::new("carol")
            .group("Research")
            .role("Administrator")
            .extend_attr("department", "R&D")
            .extend_attr("projectCode", "PRJ-001")
            .build();

        assert_eq!(extic_groups(&payload), vec!["Research"]);
        assert_eq!(role(&payload), Some("Administrator"));
        assert_eq!(
            extend_attrs(&payload),
            vec![
                ("department".to_string(), "R&D".to_string()),
                ("projectCode".to_string(), "PRJ-001".to_string()),
            ]
        );
    }

    #[test]
    fn accessors_tolerate_missing_extension() {
        let bare = json!({"id": "42", "userName": "dave"});
        assert_eq!(resource_id(&bare), Some("42".to_string()));
        assert!(extic_groups(&bare).is_empty());
        assert!(role(&bare).is_none());
        assert!(extend_attrs(&bare).is_empty());
    }

    #[test]
    fn unique_user_names_do_not_collide() {
        let first = unique_user_name("testuser");
        let second = unique_user_name("testuser");
        assert!(first.starts_with("testuser_"));
        assert_ne!(first, second);
    }

    #[test]
    fn total_results_defaults_to_zero() {
        assert_eq!(total_results(&json!({})), 0);
        assert_eq!(total_results(&json!({"totalResults": 7})), 7);
    }
}
