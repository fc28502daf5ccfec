// Domain layer: models and ports shared by the gate and the notification side.

pub mod model;
pub mod ports;
