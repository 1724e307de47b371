//! # Módulo HTTP
//!
//! Este módulo implementa la porción de HTTP/1.0 que el servidor necesita,
//! sin librerías de alto nivel. Incluye:
//!
//! - Parsing de requests HTTP/1.0
//! - Construcción de responses HTTP
//! - Manejo de status codes (incluido el histórico `300 Error`)
//! - El contexto de parámetros GET/POST de cada request
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-type: text/html; charset=utf-8\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <p>hola</p>
//! ```

pub mod context;   // Parámetros GET/POST del request
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use context::{ContextError, RequestContext};
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;
