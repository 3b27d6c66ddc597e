// LED controller API types
//
// Device and group records are passed through to the caller as the
// controller reports them. Only the fields the client reads are modelled;
// everything else lands in a flattened `extra` map so a record serializes
// back out unchanged.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

// ── Identifiers ──────────────────────────────────────────────────────

/// A device or group id as the controller sent it.
///
/// Usually a string, occasionally a number. Kept as raw JSON so neither
/// form is rejected or rewritten; [`Display`](fmt::Display) yields the
/// text used in request paths, which is empty when the id is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Value);

impl EntityId {
    /// True when the record carried no usable id (absent or `null`).
    pub fn is_missing(&self) -> bool {
        self.0.is_null()
    }

    /// The raw JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(Value::String(id.to_owned()))
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_str() == Some(*other)
    }
}

/// Deserialize a field that is present, keeping an explicit `null` as
/// `Some(Value::Null)` so it serializes back out. Absent fields fall back
/// to `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ── Device ───────────────────────────────────────────────────────────

/// A light adopted by the controller, from `GET /v1/devices`.
///
/// Only `id` and `status.output` are interpreted. Nothing is required, so
/// an unusual record never fails the whole listing, and every field
/// (including `name`) is kept as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, skip_serializing_if = "EntityId::is_missing")]
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
    /// Catch-all for fields the client doesn't interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Device {
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }

    /// Whether the device last reported its output as on.
    pub fn is_on(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.output.as_ref())
            .and_then(loose_number)
            == Some(u64::from(OutputState::On.value()))
    }
}

/// Status block nested inside [`Device`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// 0 = off, 1 = on, as the controller encoded it.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub output: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Group ────────────────────────────────────────────────────────────

/// A group created in the controller UI, from `GET /v1/groups`.
///
/// `devices` is the fan-out membership used by
/// [`LedClient::set_group_brightness`](crate::LedClient::set_group_brightness),
/// in the order the controller lists it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "EntityId::is_missing")]
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<DeviceRef>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Group {
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }

    /// Member devices in controller order; empty when none were listed.
    pub fn members(&self) -> &[DeviceRef] {
        self.devices.as_deref().unwrap_or_default()
    }
}

/// A group member. The controller embeds a device summary; only `id` is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRef {
    #[serde(default, skip_serializing_if = "EntityId::is_missing")]
    pub id: EntityId,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Command values ───────────────────────────────────────────────────

/// Requested on/off state for a device or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputState {
    Off,
    On,
}

impl OutputState {
    /// Wire value sent in the `config-output` command.
    pub fn value(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

impl From<bool> for OutputState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for OutputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::On => "on",
        })
    }
}

/// Brightness level in percent, guaranteed to be within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    pub const MAX: Self = Self(100);
    pub const MIN: Self = Self(0);

    /// Returns `None` when `level` exceeds 100.
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX.0).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Brightness {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or(Error::InvalidBrightness(level))
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ── Wire bodies ──────────────────────────────────────────────────────

/// Body of `POST /v1/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /v1/login`. Other fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Command names accepted by `PUT /v1/devices/{id}` and `PUT /v1/group/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum CommandKind {
    /// Switch output on or off.
    ConfigOutput,
    /// Set LED brightness.
    Sync,
}

/// `{ "command": ..., "value": ... }`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Command {
    pub command: CommandKind,
    pub value: u8,
}

impl Command {
    pub fn output(state: OutputState) -> Self {
        Self {
            command: CommandKind::ConfigOutput,
            value: state.value(),
        }
    }

    pub fn brightness(level: Brightness) -> Self {
        Self {
            command: CommandKind::Sync,
            value: level.level(),
        }
    }
}

// ── Echoed state ─────────────────────────────────────────────────────

/// Echo field carrying a device's output after `config-output`.
pub(crate) const ECHO_OUTPUT: &str = "DeviceStatus.output";
/// Echo field carrying a device's brightness after `sync`.
pub(crate) const ECHO_LED: &str = "DeviceStatus.led";
/// Result field of a group command.
pub(crate) const ECHO_RESULT: &str = "result";

/// Read a loosely typed number. The controller sometimes reports numbers
/// as strings, floats or booleans, so `1`, `"1"`, `1.0` and `true` are
/// treated alike.
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
pub(crate) fn loose_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=u64::MAX as f64).contains(f))
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(u64::from(*b)),
        _ => None,
    }
}

/// Whether the echoed numeric `field` equals `expected`.
pub(crate) fn echo_matches(body: &Value, field: &str, expected: u8) -> bool {
    body.get(field).and_then(loose_number) == Some(u64::from(expected))
}
