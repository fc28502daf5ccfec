pub mod account_mail;
pub mod dispatcher;
pub mod route_gate;
pub mod templates;

pub use crate::domain::model::{
    Applicant, DeliveryOutcome, DispatchReport, GateDecision, TextDelivery,
};
pub use crate::domain::ports::{MailTransport, TextMessageSender};
pub use crate::utils::error::Result;
