//! Async Rust client for the Ubiquiti UniFi LED controller.
//!
//! The controller exposes a small bearer-token HTTPS API on port 20443.
//! [`LedClient`] lists devices and groups and switches output and
//! brightness. Every operation re-authenticates once on HTTP 403 and
//! replays the request; failures are logged and surface as `None` / `false`.
//!
//! ```no_run
//! use unifi_led_api::{Brightness, ControllerConfig, LedClient, OutputState};
//!
//! # async fn run() -> Result<(), unifi_led_api::Error> {
//! let config = ControllerConfig::new("192.168.2.2", None, "admin", "secret".to_string().into())?;
//! let client = LedClient::new(config)?;
//! client.connect().await?;
//!
//! if let Some(groups) = client.list_groups().await {
//!     for group in &groups {
//!         client.set_group_output(&group.id.to_string(), OutputState::On).await;
//!         client.set_group_brightness(group, Brightness::MAX).await;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
mod devices;
pub mod error;
mod groups;
pub mod models;
mod session;
pub mod transport;

pub use client::LedClient;
pub use config::{ControllerConfig, DEFAULT_PORT};
pub use error::Error;
pub use models::{Brightness, Device, DeviceRef, DeviceStatus, EntityId, Group, OutputState};
pub use transport::{TlsMode, TransportConfig};
