// Adapters layer: concrete implementations for external systems (mail API, text channels, HTTP).

pub mod gate_layer;
pub mod resend;
pub mod text;

pub use gate_layer::{route_gate_middleware, SessionMarker};
pub use resend::ResendClient;
pub use text::PlaceholderTextSender;
