//! # Señal de Apagado del Servidor
//! src/server/shutdown.rs
//!
//! Un listener no puede frenarse a sí mismo desde adentro del request que
//! lo pide: el loop de `accept()` está bloqueado en otro thread. En vez de
//! un thread suelto que llame a un shutdown bloqueante, acá el handler del
//! request *publica* la razón de salida en un canal de control y despierta
//! al `accept()` con una conexión loopback de un solo uso. El loop de
//! atención revisa el canal después de cada accept, así que en la práctica
//! elige entre "atender la próxima conexión" y "me pidieron parar".
//!
//! Publicar nunca bloquea: el thread que pidió el stop sigue libre para
//! escribirle la respuesta a su propio cliente.

use std::net::{SocketAddr, TcpStream};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Razón por la que el loop de atención terminó
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `/quit`: apagar el servidor
    Quit,

    /// `/restart`: apagar y que el punto de entrada vuelva a levantar uno
    Restart,
}

/// Extremo de publicación del canal de control
///
/// Es clonable: cada thread de conexión (y el handler de señales del
/// sistema) puede tener el suyo.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Sender<ExitReason>,

    /// Dirección loopback del listener, para despertar su `accept()`.
    /// Se completa recién cuando el servidor hace bind.
    wake_addr: Arc<Mutex<Option<SocketAddr>>>,
}

impl ShutdownHandle {
    /// Crea el canal de control y su handle de publicación
    pub fn channel() -> (ShutdownHandle, Receiver<ExitReason>) {
        let (tx, rx) = channel();
        let handle = ShutdownHandle {
            tx,
            wake_addr: Arc::new(Mutex::new(None)),
        };
        (handle, rx)
    }

    /// Registra la dirección a la que conectarse para despertar el listener
    pub fn set_wake_addr(&self, addr: SocketAddr) {
        if let Ok(mut slot) = self.wake_addr.lock() {
            *slot = Some(addr);
        }
    }

    /// Publica la razón de salida y despierta el `accept()` bloqueado
    ///
    /// Es fire-and-forget: si el listener ya se fue, no hay nada que hacer.
    pub fn request_stop(&self, reason: ExitReason) {
        let _ = self.tx.send(reason);

        let addr = self.wake_addr.lock().ok().and_then(|slot| *slot);
        if let Some(addr) = addr {
            // La conexión solo sirve para desbloquear accept(); se descarta
            let _ = TcpStream::connect(addr);
        }
    }
}
