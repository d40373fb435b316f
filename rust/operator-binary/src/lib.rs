//! Kubernetes operator for PostgreSQL clusters
//!
//! The [`naming`] module derives the keys of all objects which make up a cluster.

pub mod controller;
pub mod crd;
pub mod framework;
pub mod naming;
