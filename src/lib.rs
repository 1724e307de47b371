//! # Schema Server
//! src/lib.rs
//!
//! Servidor web MVC para construir documentos de datos estructurados
//! (schemas al estilo del vocabulario de schema.org). El navegador navega
//! la jerarquía de tipos, completa propiedades y recibe el documento
//! JSON-LD final.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing HTTP/1.0, responses, status codes y el contexto de
//!   parámetros GET/POST de cada request
//! - `dispatcher`: El controlador: dirige cada path a su vista o a la
//!   señal de stop
//! - `model`: La jerarquía de schemas y sus tipos
//! - `view`: Renderizado HTML y del documento JSON-LD
//! - `server`: El listener TCP, el loop de atención y el canal de control
//!   del ciclo de vida (quit/restart)
//! - `config`: El puerto de escucha
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use schema_server::config::Config;
//! use schema_server::server::{ExitReason, Server};
//!
//! let config = Config::default();
//! let mut server = Server::new(config).expect("jerarquía embebida");
//! match server.run() {
//!     Ok(ExitReason::Quit) => println!("listo"),
//!     Ok(ExitReason::Restart) => println!("me pidieron reiniciar"),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod http;
pub mod model;
pub mod server;
pub mod view;
