//! Hub orchestration layer.
//!
//! A pure state machine gluing the decision core to its collaborators: it
//! consumes protocol notifications, classifies and tracks rooms, evaluates
//! secured-room admissions, and produces instructions for the rendering and
//! identity hosts to execute. No I/O happens in this crate; the host owns
//! all transport and rendering.
//!
//! # Components
//!
//! - [`Hub`]: orchestration state machine (rooms, policies, dispatch)
//! - [`HubEvent`]: protocol notifications fed into the machine
//! - [`HubAction`]: instructions produced for the host
//! - [`HubConfig`]: startup configuration snapshot (plugins, policies)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
mod event;
mod hub;
mod state;

pub use action::HubAction;
pub use config::{HubBootstrap, HubConfig, HubConfigError, SecuredRoomConfig};
pub use event::HubEvent;
pub use hub::Hub;
pub use state::RoomView;
