//! Arithmetic-intensity based kernel solution selection.
//!
//! `intensity-select` picks the best-fit precomputed kernel variant for a
//! contraction problem on a given device. Every registered solution reports
//! how close it is to the problem's arithmetic intensity; the library returns
//! the closest one whose problem and hardware predicates both hold.
//!
//! Libraries persist only the indices of their solutions. Loading resolves
//! those indices against a [`solution::SolutionRegistry`] that must already be
//! populated, so solution bodies are stored once and shared by every library
//! that references them.

pub mod library;
pub mod predicates;
pub mod selection;
pub mod solution;
pub mod types;
