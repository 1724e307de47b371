//! # Contexto del Request
//! src/http/context.rs
//!
//! Este módulo construye el mapa de parámetros de un request, tomándolos
//! de la query string (GET) o del body (POST). Los dos canales nunca se
//! mezclan:
//!
//! - un GET que declare un body con bytes es inválido
//! - un POST que traiga query string es inválido
//!
//! Cualquier otro problema (pares malformados, body ilegible, declaración
//! de longitud no numérica) se traga en silencio y deja el contexto vacío.
//! `InvalidMethod` es la única falla que se propaga: aborta el request y el
//! cliente recibe el error genérico de la aplicación.

use crate::http::request::{Method, Request};
use std::collections::HashMap;

/// Errores de construcción del contexto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// GET con body declarado, o POST con query string
    InvalidMethod,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextError::InvalidMethod => write!(f, "Invalid method"),
        }
    }
}

impl std::error::Error for ContextError {}

/// Parámetros de un request, inmutables una vez construidos
///
/// Se crea al inicio del manejo del request y se descarta al final.
///
/// # Ejemplo
///
/// ```
/// use schema_server::http::{Request, RequestContext};
///
/// let raw = b"GET /GenerateSchema?path=Person&name=Ada HTTP/1.0\r\n\r\n";
/// let request = Request::parse(raw).unwrap();
/// let ctx = RequestContext::from_request(&request).unwrap();
///
/// assert_eq!(ctx.get("path"), "Person");
/// assert_eq!(ctx.get("missing"), "");
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    params: HashMap<String, String>,
}

impl RequestContext {
    /// Construye el contexto a partir de un request parseado
    ///
    /// # Errores
    ///
    /// `ContextError::InvalidMethod` si el request mezcla los canales de
    /// entrada (ver doc del módulo). Ningún otro error sale de acá.
    pub fn from_request(request: &Request) -> Result<Self, ContextError> {
        let declared_raw = request.header("Content-Length").map(str::trim);
        let declared: Option<usize> = declared_raw.and_then(|v| v.parse().ok());

        let params = match request.method() {
            Method::GET => {
                // Un GET no puede declarar un body con bytes
                if let Some(n) = declared {
                    if n > 0 {
                        return Err(ContextError::InvalidMethod);
                    }
                }
                // Declaración presente pero ilegible: contexto vacío
                match declared_raw {
                    Some(v) if !v.is_empty() && declared.is_none() => HashMap::new(),
                    _ => parse_params(request.query()),
                }
            }
            _ => {
                // Un POST no puede traer query string
                if !request.query().is_empty() {
                    return Err(ContextError::InvalidMethod);
                }
                match declared {
                    Some(n) => {
                        // Leer exactamente los bytes declarados (o los que haya)
                        let take = n.min(request.body().len());
                        match std::str::from_utf8(&request.body()[..take]) {
                            Ok(text) => parse_params(text),
                            Err(_) => HashMap::new(),
                        }
                    }
                    // Sin declaración no hay body que leer
                    None => HashMap::new(),
                }
            }
        };

        Ok(Self { params })
    }

    /// Obtiene el valor de un parámetro
    ///
    /// Retorna string vacío si el parámetro no existe. Nunca falla.
    pub fn get(&self, key: &str) -> &str {
        self.params.get(key).map(|v| v.as_str()).unwrap_or("")
    }

    /// Obtiene **todos** los nombres de parámetro reconocidos
    ///
    /// El orden no está definido.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|k| k.as_str())
    }

    /// Obtiene el mapa completo de parámetros
    ///
    /// La vista de generación lo recorre para armar el documento de salida.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Cantidad de parámetros reconocidos
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Indica si no se reconoció ningún parámetro
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Parsea una query string (o un body de POST) en un mapa de parámetros
///
/// Reglas explícitas:
/// - las entradas se separan por `&`; cada entrada debe tener exactamente
///   un `=`
/// - una entrada malformada descarta el mapa **completo** (la política de
///   "si no se entiende, se ignora")
/// - los valores vacíos (`a=`) se descartan: el parámetro queda ausente
/// - clave repetida: gana la última aparición
///
/// El string vacío es en sí una entrada malformada, así que una query
/// ausente produce un mapa vacío.
pub fn parse_params(raw: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in raw.split('&') {
        let mut parts = pair.split('=');
        let (key, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(k), Some(v), None) => (k, v),
            _ => return HashMap::new(),
        };

        // Ignorar valores vacíos
        if !value.is_empty() {
            params.insert(key.to_string(), value.to_string());
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &[u8]) -> Request {
        Request::parse(raw).unwrap()
    }

    // ==================== parse_params ====================

    #[test]
    fn test_parse_params_round_trip() {
        let params = parse_params("a=1&b=2");
        assert_eq!(params.get("a"), Some(&"1".to_string()));
        assert_eq!(params.get("b"), Some(&"2".to_string()));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_parse_params_empty_value_dropped() {
        let params = parse_params("a=&b=2");
        assert!(!params.contains_key("a"));
        assert_eq!(params.get("b"), Some(&"2".to_string()));
    }

    #[test]
    fn test_parse_params_last_key_wins() {
        let params = parse_params("a=1&a=2");
        assert_eq!(params.get("a"), Some(&"2".to_string()));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_parse_params_malformed_pair_empties_everything() {
        // Un par sin '=' invalida el mapa entero, no solo el par
        assert!(parse_params("a=1&oops").is_empty());
        // Lo mismo un par con dos '='
        assert!(parse_params("a=1&b=2=3").is_empty());
    }

    #[test]
    fn test_parse_params_empty_string() {
        assert!(parse_params("").is_empty());
    }

    // ==================== Canal GET ====================

    #[test]
    fn test_get_context_from_query() {
        let req = request(b"GET /x?a=1&b=2 HTTP/1.0\r\n\r\n");
        let ctx = RequestContext::from_request(&req).unwrap();

        assert_eq!(ctx.get("a"), "1");
        assert_eq!(ctx.get("b"), "2");
        assert_eq!(ctx.get("missing"), "");
    }

    #[test]
    fn test_get_with_declared_body_is_invalid() {
        let req = request(b"GET /x?a=1 HTTP/1.0\r\nContent-Length: 5\r\n\r\nhello");
        let result = RequestContext::from_request(&req);

        assert_eq!(result.unwrap_err(), ContextError::InvalidMethod);
    }

    #[test]
    fn test_get_with_zero_content_length_is_valid() {
        let req = request(b"GET /x?a=1 HTTP/1.0\r\nContent-Length: 0\r\n\r\n");
        let ctx = RequestContext::from_request(&req).unwrap();

        assert_eq!(ctx.get("a"), "1");
    }

    #[test]
    fn test_get_with_blank_content_length_is_valid() {
        let req = request(b"GET /x?a=1 HTTP/1.0\r\nContent-Length:  \r\n\r\n");
        let ctx = RequestContext::from_request(&req).unwrap();

        assert_eq!(ctx.get("a"), "1");
    }

    #[test]
    fn test_get_with_unparseable_content_length_swallows() {
        let req = request(b"GET /x?a=1 HTTP/1.0\r\nContent-Length: nope\r\n\r\n");
        let ctx = RequestContext::from_request(&req).unwrap();

        // La declaración ilegible se traga: contexto vacío, sin error
        assert!(ctx.is_empty());
        assert_eq!(ctx.get("a"), "");
    }

    #[test]
    fn test_empty_value_absent_from_keys() {
        let req = request(b"GET /x?a=&b=2 HTTP/1.0\r\n\r\n");
        let ctx = RequestContext::from_request(&req).unwrap();

        assert_eq!(ctx.get("a"), "");
        assert!(!ctx.keys().any(|k| k == "a"));
        assert!(ctx.keys().any(|k| k == "b"));
    }

    // ==================== Canal POST ====================

    #[test]
    fn test_post_context_from_body() {
        let req = request(b"POST /Person HTTP/1.0\r\nContent-Length: 25\r\n\r\nnext_element=Person&id=d1");
        let ctx = RequestContext::from_request(&req).unwrap();

        assert_eq!(ctx.get("next_element"), "Person");
        assert_eq!(ctx.get("id"), "d1");
    }

    #[test]
    fn test_post_with_query_string_is_invalid() {
        let req = request(b"POST /Person?a=1 HTTP/1.0\r\nContent-Length: 3\r\n\r\na=1");
        let result = RequestContext::from_request(&req);

        assert_eq!(result.unwrap_err(), ContextError::InvalidMethod);
    }

    #[test]
    fn test_post_body_truncated_at_declared_length() {
        // Declara 3 bytes: el resto del body no participa del parsing
        let req = request(b"POST /x HTTP/1.0\r\nContent-Length: 3\r\n\r\na=1&b=2");
        let ctx = RequestContext::from_request(&req).unwrap();

        assert_eq!(ctx.get("a"), "1");
        assert_eq!(ctx.get("b"), "");
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_post_without_content_length_swallows() {
        let req = request(b"POST /x HTTP/1.0\r\n\r\na=1");
        let ctx = RequestContext::from_request(&req).unwrap();

        assert!(ctx.is_empty());
    }

    #[test]
    fn test_post_invalid_utf8_body_swallows() {
        let mut raw = b"POST /x HTTP/1.0\r\nContent-Length: 3\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xFF, 0xFE, 0xFD]);
        let req = Request::parse(&raw).unwrap();
        let ctx = RequestContext::from_request(&req).unwrap();

        assert!(ctx.is_empty());
    }

    #[test]
    fn test_invalid_method_display() {
        assert_eq!(ContextError::InvalidMethod.to_string(), "Invalid method");
    }
}
