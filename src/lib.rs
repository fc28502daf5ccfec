pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{route_gate_middleware, PlaceholderTextSender, ResendClient, SessionMarker};
pub use config::{Environment, NotifierConfig, PortalToml};
pub use crate::core::{
    account_mail::AccountMailer,
    dispatcher::NotificationDispatcher,
    route_gate::{RouteGate, RouteTable},
};
pub use domain::model::{Applicant, DeliveryOutcome, DispatchReport, GateDecision, TextDelivery};
pub use utils::error::{PortalError, Result};
