//! An offline engine for city bus networks.
//!
//! `omnibus` ingests a JSON description of a bus network (stops with
//! coordinates and road distances, buses with ordered stop lists) together
//! with routing and rendering parameters, and precomputes everything a
//! query needs: the [`catalog::Catalog`], the time-weighted
//! [`transit::TransitGraph`], the all-pairs [`transit::paths::PathTable`],
//! and the [`render::Layout`]. The four are frozen into one binary
//! [`artifact::Artifact`] on disk; a later run loads the artifact and
//! answers bus/stop statistics, fastest-route, and map-rendering queries
//! without repeating any of the computation.

pub mod artifact;
pub mod catalog;
pub mod executor;
pub mod render;
pub mod requests;
pub mod shared;
pub mod transit;
