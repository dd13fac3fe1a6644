pub mod gate;

pub use gate::{AuthorizationGate, GateError};
