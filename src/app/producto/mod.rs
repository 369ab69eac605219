//! Producto feature: model, service, handlers and views.

pub mod handler;
pub mod model;
pub mod service;
pub mod view;
