// Device endpoints
//
// `GET /v1/devices` for the listing, `PUT /v1/devices/{id}` for output and
// brightness commands. A command only counts as applied when the
// controller echoes back the requested value.

use serde_json::Value;
use tracing::{debug, error};

use crate::client::{ApiRequest, LedClient};
use crate::models::{
    Brightness, Command, Device, ECHO_LED, ECHO_OUTPUT, OutputState, echo_matches,
};

impl LedClient {
    /// List all devices adopted by the controller, exactly as reported.
    ///
    /// `GET /v1/devices`
    pub async fn list_devices(&self) -> Option<Vec<Device>> {
        debug!("listing devices");
        let result = self.execute(&ApiRequest::get(&["devices"])).await;
        Self::read_outcome(result, "devices")
    }

    /// Switch a single device on or off.
    ///
    /// `PUT /v1/devices/{id}` with `{"command": "config-output", "value": 0|1}`.
    /// Succeeds when the echoed `DeviceStatus.output` equals the request.
    /// A blank `device_id` fails without sending anything.
    pub async fn set_device_output(&self, device_id: &str, state: OutputState) -> bool {
        if device_id.trim().is_empty() {
            error!(%state, "cannot set device output without a device id");
            return false;
        }
        debug!(device_id, %state, "setting device output");
        let request = ApiRequest::put(&["devices", device_id], Command::output(state));
        let result = self.execute::<Value>(&request).await;
        Self::command_outcome(
            result,
            &format!("set device {device_id} output to {state}"),
            |echo| echo_matches(echo, ECHO_OUTPUT, state.value()),
        )
    }

    /// Set the brightness of a single device.
    ///
    /// `PUT /v1/devices/{id}` with `{"command": "sync", "value": level}`.
    /// Succeeds when the echoed `DeviceStatus.led` equals the request.
    pub async fn set_device_brightness(&self, device_id: &str, level: Brightness) -> bool {
        if device_id.trim().is_empty() {
            error!(%level, "cannot set device brightness without a device id");
            return false;
        }
        debug!(device_id, %level, "setting device brightness");
        let request = ApiRequest::put(&["devices", device_id], Command::brightness(level));
        let result = self.execute::<Value>(&request).await;
        Self::command_outcome(
            result,
            &format!("set device {device_id} brightness to {level}"),
            |echo| echo_matches(echo, ECHO_LED, level.level()),
        )
    }
}
