//! Core calculator domain: the accumulator state machine and the ports it is
//! exposed through.

pub mod accumulator;
pub mod operator;
pub mod ports;
