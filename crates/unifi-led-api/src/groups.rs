// Group endpoints
//
// Groups switch output natively (`PUT /v1/group/{id}`). Brightness has no
// group endpoint, so it fans out to the member devices one at a time.

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::client::{ApiRequest, LedClient};
use crate::models::{Brightness, Command, ECHO_RESULT, Group, OutputState};

impl LedClient {
    /// List all groups configured on the controller, exactly as reported.
    ///
    /// `GET /v1/groups`
    pub async fn list_groups(&self) -> Option<Vec<Group>> {
        debug!("listing groups");
        let result = self.execute(&ApiRequest::get(&["groups"])).await;
        Self::read_outcome(result, "groups")
    }

    /// Switch every light in a group on or off.
    ///
    /// `PUT /v1/group/{id}` with `{"command": "config-output", "value": 0|1}`.
    /// Succeeds when the response's `result` is `"success"`.
    pub async fn set_group_output(&self, group_id: &str, state: OutputState) -> bool {
        if group_id.trim().is_empty() {
            error!(%state, "cannot set group output without a group id");
            return false;
        }
        debug!(group_id, %state, "setting group output");
        let request = ApiRequest::put(&["group", group_id], Command::output(state));
        let result = self.execute::<Value>(&request).await;
        Self::command_outcome(
            result,
            &format!("set group {group_id} output to {state}"),
            |echo| echo.get(ECHO_RESULT).and_then(Value::as_str) == Some("success"),
        )
    }

    /// Set every member of `group` to the same brightness.
    ///
    /// Members are updated sequentially in the order the group lists them.
    /// Every member is attempted even after a failure; the result is `true`
    /// only if all of them succeeded (and for an empty group). A member
    /// without an id counts as a failure.
    pub async fn set_group_brightness(&self, group: &Group, level: Brightness) -> bool {
        let members = group.members();
        debug!(
            group_id = %group.id,
            group = group.name().unwrap_or_default(),
            members = members.len(),
            %level,
            "setting group brightness"
        );

        let mut all_applied = true;
        for member in members {
            if !self.set_device_brightness(&member.id.to_string(), level).await {
                all_applied = false;
            }
        }

        if !all_applied {
            warn!(group_id = %group.id, %level, "not every group member accepted the brightness");
        }
        all_applied
    }
}
