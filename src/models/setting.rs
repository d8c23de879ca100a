//! Stack settings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::client::{segment, StackClient};
use crate::error::Result;
use crate::models::action::AsyncResult;
use crate::pagination::Page;
use crate::traits::{List, Update};

/// A key-value setting scoped to a stack.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackSetting {
    #[serde_as(as = "DefaultOnNull")]
    pub key: String,
    /// Scalar or structured value, as the server sent it.
    pub value: serde_json::Value,
    #[serde_as(as = "DefaultOnNull")]
    pub readonly: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub hidden: bool,
}

/// Placeholder shown instead of a hidden setting's value.
pub const HIDDEN_VALUE: &str = "(hidden)";

impl StackSetting {
    /// Copy of the setting safe for display, with hidden values replaced by
    /// [`HIDDEN_VALUE`].
    pub fn redacted(&self) -> Self {
        let mut setting = self.clone();
        if setting.hidden {
            setting.value = serde_json::Value::String(HIDDEN_VALUE.to_string());
        }
        setting
    }
}

/// Path segment for a setting key.
///
/// The settings endpoint spells dotted keys with hyphens.
pub fn setting_path_key(key: &str) -> String {
    key.replace('.', "-")
}

#[async_trait]
impl List for StackSetting {
    type Query = String; // Stack uid

    #[tracing::instrument(skip(client))]
    async fn list_page(client: &StackClient, stack_uid: &String, page: u32) -> Result<Page<Self>> {
        let path = format!("stacks/{}/settings.json", segment(stack_uid));
        let response = client.get_with_query(&path, &[("page", page)]).await?;
        let (settings, pagination) = StackClient::decode_page(response).await?;
        Ok(Page::new(settings, pagination))
    }
}

#[async_trait]
impl Update for StackSetting {
    type Id = (String, String); // (stack_uid, key)
    type Params = String; // New value
    type Output = AsyncResult;

    #[tracing::instrument(skip(client))]
    async fn update(client: &StackClient, id: Self::Id, value: String) -> Result<AsyncResult> {
        #[derive(Serialize)]
        struct Params {
            value: String,
        }

        let (stack_uid, key) = id;
        let path = format!(
            "stacks/{}/settings/{}.json",
            segment(&stack_uid),
            segment(&setting_path_key(&key))
        );
        let response = client.put(&path, &Params { value }).await?;
        StackClient::decode(response).await
    }
}

/// Fetch every setting of a stack.
pub async fn get_stack_settings(client: &StackClient, stack_uid: &str) -> Result<Vec<StackSetting>> {
    StackSetting::list_all(client, &stack_uid.to_string()).await
}

/// Change one stack setting.
///
/// # Example
///
/// ```ignore
/// // Sent to /stacks/{uid}/settings/db-host.json
/// set_setting(&client, "stack-uid", "db.host", "10.0.0.5").await?;
/// ```
pub async fn set_setting(
    client: &StackClient,
    stack_uid: &str,
    key: &str,
    value: &str,
) -> Result<AsyncResult> {
    StackSetting::update(
        client,
        (stack_uid.to_string(), key.to_string()),
        value.to_string(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_path_key_replaces_periods() {
        assert_eq!(setting_path_key("db.host"), "db-host");
        assert_eq!(setting_path_key("a.b.c"), "a-b-c");
        assert_eq!(setting_path_key("plain"), "plain");
    }

    #[test]
    fn test_setting_value_is_polymorphic() {
        let settings: Vec<StackSetting> = serde_json::from_value(serde_json::json!([
            { "key": "reboot.level", "value": 2, "readonly": false, "hidden": false },
            { "key": "allowed.web.source", "value": ["10.0.0.0/8"], "readonly": true },
            { "key": "git.ref", "value": null }
        ]))
        .unwrap();
        assert_eq!(settings[0].value, serde_json::json!(2));
        assert!(settings[1].value.is_array());
        assert!(settings[1].readonly);
        assert!(settings[2].value.is_null());
        assert!(!settings[2].hidden);
    }

    #[test]
    fn test_redacted_masks_only_hidden_values() {
        let settings: Vec<StackSetting> = serde_json::from_value(serde_json::json!([
            { "key": "db.password", "value": "s3cret", "hidden": true },
            { "key": "db.host", "value": "10.0.0.5", "hidden": false }
        ]))
        .unwrap();

        let shown: Vec<StackSetting> = settings.iter().map(StackSetting::redacted).collect();
        assert_eq!(shown[0].value, serde_json::json!(HIDDEN_VALUE));
        assert_eq!(shown[0].key, "db.password");
        assert_eq!(shown[1].value, serde_json::json!("10.0.0.5"));

        let json = serde_json::to_string(&shown).unwrap();
        assert!(!json.contains("s3cret"));
    }
}
