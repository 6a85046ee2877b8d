//! End-to-end simulation scenarios.

pub mod address_reuse;
pub mod attack_race;
pub mod honest_flow;
pub mod rbf_flow;
