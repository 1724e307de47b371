//! # Despacho de Requests
//! src/dispatcher/mod.rs
//!
//! Este módulo dirige cada request a su destino. El orden de evaluación
//! importa y es fijo:
//!
//! 1. `/quit` y `/restart`: publicar la señal de stop y confirmar con un
//!    timestamp
//! 2. paths con `.ico` o `.png`: passthrough binario desde el directorio
//!    de assets
//! 3. `/schema.js`: passthrough de texto
//! 4. el resto es HTML: índice, confirmación de guardado, documento
//!    generado, fragmento AJAX (POST con `next_element`) o el formulario
//!    de propiedades del schema nombrado en el path
//!
//! ## Manejo de errores
//!
//! `dispatch` nunca falla hacia afuera: cualquier error de la aplicación
//! (método inválido, schema desconocido fuera de la rama GET, asset
//! ausente, falla del modelo o la vista) se convierte en la respuesta
//! `300 Error` con el texto del error como body. Un request malo jamás
//! tira el listener.

use crate::http::{ContextError, Request, RequestContext, Response, StatusCode};
use crate::model::{Hierarchy, ModelError};
use crate::server::shutdown::{ExitReason, ShutdownHandle};
use crate::view::SchemaView;
use std::path::{Path, PathBuf};

/// Directorio de assets por defecto, relativo al directorio de trabajo
///
/// El path del request se espeja adentro: `/img/logo.png` se lee de
/// `view/img/logo.png`.
pub const DEFAULT_ASSET_ROOT: &str = "view";

/// Errores que puede producir el despacho de un request
#[derive(Debug)]
pub enum DispatchError {
    /// El contexto rechazó el request (GET con body o POST con query)
    InvalidMethod,

    /// Error del tier Modelo (schema desconocido fuera de la rama GET)
    Model(ModelError),

    /// El asset estático pedido no existe
    AssetNotFound(String),

    /// Otro error de I/O leyendo un asset
    Io(std::io::Error),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::InvalidMethod => write!(f, "Invalid method"),
            DispatchError::Model(e) => write!(f, "{}", e),
            DispatchError::AssetNotFound(path) => write!(f, "Asset \"{}\" not found", path),
            DispatchError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<ContextError> for DispatchError {
    fn from(e: ContextError) -> Self {
        match e {
            ContextError::InvalidMethod => DispatchError::InvalidMethod,
        }
    }
}

impl From<ModelError> for DispatchError {
    fn from(e: ModelError) -> Self {
        DispatchError::Model(e)
    }
}

/// El controlador de flujo: Modelo y Vista a mano, más el handle de stop
pub struct Dispatcher {
    hierarchy: Hierarchy,
    view: SchemaView,
    shutdown: ShutdownHandle,
    asset_root: PathBuf,
}

impl Dispatcher {
    /// Crea el dispatcher con el directorio de assets por defecto
    pub fn new(hierarchy: Hierarchy, view: SchemaView, shutdown: ShutdownHandle) -> Self {
        Self {
            hierarchy,
            view,
            shutdown,
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
        }
    }

    /// Cambia el directorio de assets (los tests usan uno temporal)
    pub fn with_asset_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.asset_root = root.as_ref().to_path_buf();
        self
    }

    /// Atiende un request completo y produce la respuesta
    ///
    /// Nunca falla: ver la sección de errores en la doc del módulo.
    pub fn dispatch(&self, request: &Request) -> Response {
        match self.dispatch_inner(request) {
            Ok(response) => response,
            Err(e) => Response::error(&e.to_string()),
        }
    }

    /// El despacho propiamente dicho, con errores todavía tipados
    fn dispatch_inner(&self, request: &Request) -> Result<Response, DispatchError> {
        // El contexto se construye siempre: su InvalidMethod aborta el
        // request aunque el path ni use parámetros
        let ctx = RequestContext::from_request(request)?;
        let path = request.path();

        // 1. Stop del servidor
        if path == "/quit" || path == "/restart" {
            let reason = if path == "/restart" {
                ExitReason::Restart
            } else {
                ExitReason::Quit
            };
            self.shutdown.request_stop(reason);

            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            return Ok(Response::text(&format!("{}: {}", &path[1..], stamp)));
        }

        // 2. Passthrough binario de iconos
        if path.contains(".ico") || path.contains(".png") {
            let bytes = self.read_asset(path)?;
            return Ok(Response::new(StatusCode::Ok)
                .with_header("Content-type", "image/png")
                .with_body_bytes(bytes));
        }

        // 3. Passthrough de texto del script del constructor
        if path == "/schema.js" {
            let text = self.read_asset(path)?;
            let text = String::from_utf8_lossy(&text);
            return Ok(Response::text(&text));
        }

        // 4. Todo lo demás es HTML
        let html = if path == "/" || path.is_empty() {
            // La jerarquía completa, como el índice de schema.org
            self.view.get_index(&self.hierarchy)
        } else if path == "/SaveSchema" {
            // El schema quedó en Local Storage; solo confirmar
            self.view.get_saved_output()
        } else if path == "/GenerateSchema" {
            // Armar el documento final con lo que el usuario completó
            self.view.generate_schema_output(ctx.get("path"), &ctx)
        } else if !ctx.get("next_element").is_empty() {
            // Llamada AJAX (POST): el siguiente nivel del schema en
            // construcción, dentro del contenedor `id`
            let schema = self.hierarchy.get_schema(ctx.get("next_element"))?;
            self.view.ajax_properties(schema, ctx.get("id"))
        } else {
            // Rama GET por defecto: el path nombra un schema
            let name = path.strip_prefix('/').unwrap_or(path);
            match self.hierarchy.get_schema(name) {
                Ok(schema) => self.view.show_schema_properties(schema),
                Err(ModelError::NotFound(_)) => {
                    return Ok(Response::error(&format!("Schema \"{}\" not found", name)));
                }
                Err(e) => return Err(e.into()),
            }
        };

        Ok(Response::html(&html))
    }

    /// Lee un asset espejando el path del request bajo el asset root
    fn read_asset(&self, request_path: &str) -> Result<Vec<u8>, DispatchError> {
        let relative = request_path.strip_prefix('/').unwrap_or(request_path);
        let file = self.asset_root.join(relative);

        std::fs::read(&file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DispatchError::AssetNotFound(request_path.to_string())
            } else {
                DispatchError::Io(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::sync::mpsc::Receiver;

    fn hierarchy() -> Hierarchy {
        Hierarchy::from_json(
            r#"{"schemas": [
                {"name": "Thing", "properties": [{"name": "name", "expected_types": ["Text"]}]},
                {"name": "Person", "parent": "Thing", "properties": [
                    {"name": "givenName", "expected_types": ["Text"]}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    fn dispatcher() -> (Dispatcher, Receiver<ExitReason>) {
        let (shutdown, rx) = ShutdownHandle::channel();
        (Dispatcher::new(hierarchy(), SchemaView::new(), shutdown), rx)
    }

    fn get(path: &str) -> Request {
        let raw = format!("GET {} HTTP/1.0\r\n\r\n", path);
        Request::parse(raw.as_bytes()).unwrap()
    }

    fn post(path: &str, body: &str) -> Request {
        let raw = format!(
            "POST {} HTTP/1.0\r\nContent-Length: {}\r\n\r\n{}",
            path,
            body.len(),
            body
        );
        Request::parse(raw.as_bytes()).unwrap()
    }

    fn body_str(response: &Response) -> String {
        String::from_utf8(response.body().to_vec()).unwrap()
    }

    // ==================== Quit / Restart ====================

    #[test]
    fn test_quit_publishes_signal_and_stamps_body() {
        let (dispatcher, rx) = dispatcher();
        let response = dispatcher.dispatch(&get("/quit"));

        assert_eq!(response.status(), StatusCode::Ok);
        let re = Regex::new(r"^quit: \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
        assert!(re.is_match(&body_str(&response)), "body: {}", body_str(&response));
        assert_eq!(rx.try_recv().unwrap(), ExitReason::Quit);
    }

    #[test]
    fn test_restart_publishes_restart() {
        let (dispatcher, rx) = dispatcher();
        let response = dispatcher.dispatch(&get("/restart"));

        assert!(body_str(&response).starts_with("restart: "));
        assert_eq!(rx.try_recv().unwrap(), ExitReason::Restart);
    }

    // ==================== Assets ====================

    #[test]
    fn test_png_passthrough_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        std::fs::write(dir.path().join("logo.png"), &bytes).unwrap();

        let (shutdown, _rx) = ShutdownHandle::channel();
        let dispatcher = Dispatcher::new(hierarchy(), SchemaView::new(), shutdown)
            .with_asset_root(dir.path());

        let response = dispatcher.dispatch(&get("/logo.png"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), &bytes[..]);
        assert_eq!(response.headers().get("Content-type"), Some(&"image/png".to_string()));
        assert_eq!(
            response.headers().get("Content-Length"),
            Some(&bytes.len().to_string())
        );
    }

    #[test]
    fn test_missing_asset_is_generic_error() {
        let dir = tempfile::tempdir().unwrap();
        let (shutdown, _rx) = ShutdownHandle::channel();
        let dispatcher = Dispatcher::new(hierarchy(), SchemaView::new(), shutdown)
            .with_asset_root(dir.path());

        let response = dispatcher.dispatch(&get("/favicon.ico"));

        assert_eq!(response.status(), StatusCode::Error);
        assert_eq!(body_str(&response), "Asset \"/favicon.ico\" not found");
    }

    #[test]
    fn test_schema_js_text_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schema.js"), "var x = 1;\n").unwrap();

        let (shutdown, _rx) = ShutdownHandle::channel();
        let dispatcher = Dispatcher::new(hierarchy(), SchemaView::new(), shutdown)
            .with_asset_root(dir.path());

        let response = dispatcher.dispatch(&get("/schema.js"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(body_str(&response), "var x = 1;\n");
        // Headers por defecto, verbatim
        assert_eq!(
            response.headers().get("Content-type"),
            Some(&"text/plain; charset=utf-8".to_string())
        );
    }

    // ==================== Vistas HTML ====================

    #[test]
    fn test_index_on_root_path() {
        let (dispatcher, _rx) = dispatcher();
        let response = dispatcher.dispatch(&get("/"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-type"),
            Some(&"text/html; charset=utf-8".to_string())
        );
        assert!(body_str(&response).contains("Person"));
    }

    #[test]
    fn test_save_schema_is_idempotent() {
        let (dispatcher, _rx) = dispatcher();
        let first = dispatcher.dispatch(&get("/SaveSchema"));
        let second = dispatcher.dispatch(&get("/SaveSchema"));

        assert_eq!(first.body(), second.body());
        assert!(body_str(&first).contains("saved"));
    }

    #[test]
    fn test_generate_schema_uses_path_param() {
        let (dispatcher, _rx) = dispatcher();
        let response = dispatcher.dispatch(&get("/GenerateSchema?path=Person&givenName=Ada"));

        let body = body_str(&response);
        assert!(body.contains("\"@type\": \"Person\""));
        assert!(body.contains("\"givenName\": \"Ada\""));
    }

    #[test]
    fn test_post_next_element_renders_fragment() {
        let (dispatcher, _rx) = dispatcher();
        let response = dispatcher.dispatch(&post("/Thing", "next_element=Person&id=level2"));

        assert_eq!(response.status(), StatusCode::Ok);
        let body = body_str(&response);
        assert!(body.contains("level2_givenName"));
        assert!(!body.contains("<html>"));
    }

    #[test]
    fn test_post_unknown_next_element_is_generic_error() {
        let (dispatcher, _rx) = dispatcher();
        let response = dispatcher.dispatch(&post("/Thing", "next_element=Unicorn&id=d1"));

        // Fuera de la rama GET, el NotFound cae en el handler genérico
        assert_eq!(response.status(), StatusCode::Error);
        assert_eq!(body_str(&response), "Schema \"Unicorn\" not found");
    }

    #[test]
    fn test_get_schema_by_path() {
        let (dispatcher, _rx) = dispatcher();
        let response = dispatcher.dispatch(&get("/Person"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(body_str(&response).contains("givenName"));
    }

    #[test]
    fn test_get_unknown_schema_is_300_with_exact_body() {
        let (dispatcher, _rx) = dispatcher();
        let response = dispatcher.dispatch(&get("/Unicorn"));

        assert_eq!(response.status(), StatusCode::Error);
        assert_eq!(body_str(&response), "Schema \"Unicorn\" not found");
        assert_eq!(
            response.headers().get("Content-type"),
            Some(&"text/plain; charset=utf-8".to_string())
        );
    }

    // ==================== Contexto inválido ====================

    #[test]
    fn test_invalid_method_aborts_request() {
        let (dispatcher, rx) = dispatcher();
        // GET con body declarado: el contexto aborta aunque el path sea /quit
        let raw = b"GET /quit HTTP/1.0\r\nContent-Length: 3\r\n\r\nabc";
        let request = Request::parse(raw).unwrap();

        let response = dispatcher.dispatch(&request);

        assert_eq!(response.status(), StatusCode::Error);
        assert_eq!(body_str(&response), "Invalid method");
        // Y no se publicó ninguna señal de stop
        assert!(rx.try_recv().is_err());
    }
}
