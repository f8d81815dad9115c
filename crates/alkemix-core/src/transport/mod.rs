//! Play-head state and timeline ↔ backend clock conversion.

mod fsm;

pub use fsm::{Transition, Transport, TransportEvent, TransportState};
