//! Crate-level behavioural tests and shared test drivers.

pub(crate) mod support;
