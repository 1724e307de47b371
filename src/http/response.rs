//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona una API para construir respuestas HTTP/1.0
//! de forma programática y convertirlas a bytes para enviar al cliente.
//!
//! Toda respuesta nace con los valores por defecto del servicio:
//! status `200 OK` y header `Content-type: text/plain; charset=utf-8`.
//! Las vistas HTML y los assets binarios los sobrescriben según haga falta.
//!
//! ## Formato de una respuesta HTTP/1.0
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-type: text/html; charset=utf-8\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <p>hola</p>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use schema_server::http::Response;
//!
//! let response = Response::html("<h1>Schemas</h1>");
//! let bytes = response.to_bytes();
//! // Ahora puedes enviar `bytes` por el socket
//! ```

use super::StatusCode;
use std::collections::HashMap;

/// Content-type por defecto de todas las respuestas
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Content-type de las vistas HTML
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Representa una respuesta HTTP/1.0 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 300, 400)
    status: StatusCode,

    /// Headers HTTP. Usamos HashMap para evitar duplicados
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (texto UTF-8 o bytes crudos)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// La respuesta arranca con el header por defecto
    /// `Content-type: text/plain; charset=utf-8` y sin body.
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok);
    /// ```
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
        Self {
            status,
            headers,
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe.
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_header("Content-type", "image/png");
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el cuerpo de la respuesta desde un string
    ///
    /// Automáticamente calcula y agrega el header `Content-Length`.
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_body("Hello World");
    /// ```
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self.headers.insert(
            "Content-Length".to_string(),
            self.body.len().to_string()
        );
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para respuestas binarias (los .ico y .png del directorio de assets).
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::{Response, StatusCode};
    ///
    /// let binary_data = vec![0x89, 0x50, 0x4E, 0x47]; // PNG header
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_body_bytes(binary_data);
    /// ```
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self.headers.insert(
            "Content-Length".to_string(),
            self.body.len().to_string()
        );
        self
    }

    /// Crea una respuesta de texto plano exitosa (200 OK)
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::Response;
    ///
    /// let response = Response::text("quit: 2016-05-04 10:02:59");
    /// ```
    pub fn text(body: &str) -> Self {
        Self::new(StatusCode::Ok).with_body(body)
    }

    /// Crea una respuesta HTML exitosa (200 OK)
    ///
    /// Automáticamente establece `Content-type: text/html; charset=utf-8`.
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::Response;
    ///
    /// let response = Response::html("<h1>Schemas</h1>");
    /// ```
    pub fn html(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-type", HTML_CONTENT_TYPE)
            .with_body(body)
    }

    /// Crea la respuesta de error de aplicación del servicio
    ///
    /// Status `300 Error`, texto plano, y el mensaje como body. Es el único
    /// formato de error que ven los clientes: siempre bien formado, nunca
    /// una falla a nivel de transporte.
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error("Schema \"Unicorn\" not found");
    /// assert_eq!(response.status(), StatusCode::Error);
    /// ```
    pub fn error(message: &str) -> Self {
        Self::new(StatusCode::Error).with_body(message)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Genera el formato completo HTTP/1.0:
    /// - Status line: `HTTP/1.0 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        // 1. Status line
        let status_line = format!("HTTP/1.0 {}\r\n", self.status);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers
        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body (si existe)
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
