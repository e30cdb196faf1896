//! Application layer wiring the accumulator to the router.
//!
//! This module defines the `CalculatorSession`, the lifecycle hook that owns a
//! session's accumulator and publishes it as the `clear` and `calc` procedures.

pub mod session;
