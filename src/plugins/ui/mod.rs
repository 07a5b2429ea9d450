//! UI plugins (render-only).

pub mod health_bar;
