//! # Schema Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de schemas.
//!
//! Levanta el servidor y lo vuelve a levantar en el mismo puerto cada vez
//! que `run()` retorna `ExitReason::Restart`. Con `ExitReason::Quit` (por
//! el path `/quit` o una señal del sistema) termina con código 0.

use schema_server::config::Config;
use schema_server::server::{ExitReason, Server, ShutdownHandle};
use std::sync::{Arc, Mutex};

fn main() {
    println!("=================================");
    println!("  Schema Server");
    println!("  Constructor de datos estructurados");
    println!("=================================\n");

    let config = Config::new();

    println!("⚙️  Configuración:");
    println!("   Puerto: {}", config.port);
    println!();

    if let Err(e) = run_controller(config) {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}

/// Loop del punto de entrada: levantar, atender, reiniciar si hace falta
fn run_controller(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // El handle del servidor *actual*, para el handler de señales
    let current: Arc<Mutex<Option<ShutdownHandle>>> = Arc::new(Mutex::new(None));

    #[cfg(unix)]
    spawn_signal_listener(Arc::clone(&current))?;

    loop {
        let mut server = Server::new(config.clone())?;
        if let Ok(mut slot) = current.lock() {
            *slot = Some(server.shutdown_handle());
        }

        let addr = server.bind()?;
        println!("[*] Sirviendo en el puerto {}...", addr.port());

        match server.run()? {
            ExitReason::Restart => {
                // Liberar el socket antes del próximo bind
                server.close();
                println!("[*] Reiniciando el servidor...\n");
            }
            ExitReason::Quit => {
                println!("[*] Servidor detenido");
                return Ok(());
            }
        }
    }
}

/// SIGINT/SIGTERM se tratan como un `/quit`: apagado limpio, código 0
#[cfg(unix)]
fn spawn_signal_listener(
    current: Arc<Mutex<Option<ShutdownHandle>>>,
) -> Result<(), Box<dyn std::error::Error>> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::spawn(move || {
        for _ in signals.forever() {
            let handle = current.lock().ok().and_then(|slot| slot.clone());
            if let Some(handle) = handle {
                handle.request_stop(ExitReason::Quit);
            }
        }
    });

    Ok(())
}
