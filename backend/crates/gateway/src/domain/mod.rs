//! Domain layer: route table, gate decisions, backend seam.

pub mod decision;
pub mod repository;
pub mod route;
