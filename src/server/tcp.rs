//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que atiende múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio
//! thread; el loop de atención corre en el thread que llamó a `run()`.
//!
//! `run()` bloquea hasta que alguien publica una señal de stop por el
//! canal de control (los paths `/quit` y `/restart`, o el handler de
//! señales del sistema) y retorna la [`ExitReason`] publicada. El punto de
//! entrada decide con ella si vuelve a levantar un servidor en el mismo
//! puerto.

use crate::config::Config;
use crate::dispatcher::{Dispatcher, DEFAULT_ASSET_ROOT};
use crate::http::{Request, Response, StatusCode};
use crate::model::{Hierarchy, ModelError};
use crate::server::shutdown::{ExitReason, ShutdownHandle};
use crate::view::SchemaView;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tamaño máximo de request que se acepta leer
const MAX_REQUEST_SIZE: usize = 64 * 1024;

/// Una conexión colgada no debe retener su thread para siempre
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Servidor HTTP del constructor de schemas
pub struct Server {
    config: Config,
    hierarchy: Hierarchy,
    asset_root: PathBuf,
    listener: Option<TcpListener>,
    shutdown: ShutdownHandle,
    control_rx: Receiver<ExitReason>,
}

impl Server {
    /// Crea el servidor con la jerarquía embebida en el binario
    pub fn new(config: Config) -> Result<Self, ModelError> {
        let hierarchy = Hierarchy::bundled()?;
        Ok(Self::with_hierarchy(config, hierarchy))
    }

    /// Crea el servidor con una jerarquía ya construida
    pub fn with_hierarchy(config: Config, hierarchy: Hierarchy) -> Self {
        let (shutdown, control_rx) = ShutdownHandle::channel();

        Self {
            config,
            hierarchy,
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            listener: None,
            shutdown,
            control_rx,
        }
    }

    /// Cambia el directorio de assets (los tests usan uno temporal)
    pub fn asset_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Un handle clonable para pedirle el stop a este servidor
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Hace el bind del listener y retorna la dirección real
    ///
    /// Separado de `run()` para que el que llama (y los tests, que usan
    /// puerto 0) conozcan la dirección antes de bloquearse.
    pub fn bind(&mut self) -> std::io::Result<SocketAddr> {
        let address = self.config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        let addr = listener.local_addr()?;

        // Dirección loopback para despertar el accept() cuando pidan stop
        self.shutdown
            .set_wake_addr(SocketAddr::from(([127, 0, 0, 1], addr.port())));
        self.listener = Some(listener);

        Ok(addr)
    }

    /// Libera el socket del listener para que otro pueda hacer bind
    pub fn close(&mut self) {
        self.listener = None;
    }

    /// Atiende requests hasta que llegue una señal de stop
    ///
    /// Bloquea el thread que llama. Retorna la razón de salida publicada
    /// por `/quit`, `/restart` o el handler de señales.
    pub fn run(&mut self) -> std::io::Result<ExitReason> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = self.listener.as_ref().unwrap();

        println!("[+] Servidor escuchando en {}", listener.local_addr()?);
        println!("[*] Modo concurrente: un thread por conexion\n");

        let dispatcher = Arc::new(
            Dispatcher::new(self.hierarchy.clone(), SchemaView::new(), self.shutdown.clone())
                .with_asset_root(&self.asset_root),
        );

        loop {
            let stream = match listener.accept() {
                Ok((stream, _)) => stream,
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                    continue;
                }
            };

            // ¿Llegó una señal de stop? La conexión que despertó el accept
            // (o la que tuvo la mala suerte de llegar justo) se descarta.
            if let Ok(reason) = self.control_rx.try_recv() {
                drop(stream);
                println!("[*] Señal de stop recibida: {:?}", reason);
                return Ok(reason);
            }

            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                if let Err(e) = Self::handle_connection(stream, dispatcher) {
                    eprintln!("   ❌ Error en la conexión: {}", e);
                }
            });
        }
    }

    /// Atiende una conexión: leer, despachar, responder
    ///
    /// Un error acá solo afecta a esta conexión; el listener sigue.
    fn handle_connection(mut stream: TcpStream, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
        let start = Instant::now();
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let buffer = Self::read_request(&mut stream)?;
        if buffer.is_empty() {
            // El peer conectó y cerró sin mandar nada
            return Ok(());
        }

        let response = match Request::parse(&buffer) {
            Ok(request) => {
                println!("   ✅ {} {}", request.method().as_str(), request.path());
                dispatcher.dispatch(&request)
            }
            Err(e) => {
                println!("   ❌ Parse error: {}", e);
                Response::new(StatusCode::BadRequest).with_body(&format!("Invalid request: {}", e))
            }
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let latency = start.elapsed();
        println!("   ✅ {} ({:.2}ms)\n", response.status(), latency.as_secs_f64() * 1000.0);

        Ok(())
    }

    /// Lee del socket hasta tener un request completo
    ///
    /// Completo = headers terminados y, si hay `Content-Length`, el body
    /// entero. Corta también en EOF o si el request excede el máximo.
    fn read_request(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
        let mut data = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let bytes_read = stream.read(&mut chunk)?;
            if bytes_read == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..bytes_read]);

            if Request::is_complete(&data) || data.len() > MAX_REQUEST_SIZE {
                break;
            }
        }

        Ok(data)
    }
}
