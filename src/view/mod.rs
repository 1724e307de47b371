//! # Módulo de la Vista
//! src/view/mod.rs
//!
//! El tier Vista del MVC: renderizado HTML y JSON-LD.

pub mod schema_view;

// Re-exportar para facilitar el uso
pub use schema_view::SchemaView;
