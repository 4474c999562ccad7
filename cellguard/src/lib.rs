//! CellGuard - cell tower reference data for IMSI-catcher detection
//!
//! This library acquires OpenCellID tower data for the area around the
//! device, imports the same data from exported files, and decodes the raw
//! text responses some basebands return for diagnostic requests.
//!
//! # Modules
//!
//! - [`coord`] - geodesic bounding box around a position
//! - [`radio`] - fixed-width record decoder for raw radio responses
//! - [`provider`] - OpenCellID query construction and async download
//! - [`import`] - tower import from local CSV files
//! - [`connectivity`] - network availability gate
//! - [`reconcile`] - serving cell check against the stored data
//!
//! The host application supplies the outside world through the traits in
//! [`platform`].

pub mod cell;
pub mod config;
pub mod connectivity;
pub mod coord;
pub mod import;
pub mod logging;
pub mod platform;
pub mod provider;
pub mod radio;
pub mod reconcile;
pub mod task;
pub mod towers;
