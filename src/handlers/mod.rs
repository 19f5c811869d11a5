//! HTTP handlers for the forecast CRUD surface.

pub mod forecast;
