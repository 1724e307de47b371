//! # Configuración del Servidor
//! src/config.rs
//!
//! La superficie de configuración es mínima a propósito: un único
//! argumento posicional opcional con el puerto de escucha.
//!
//! ## Ejemplos de uso
//!
//! ```bash
//! ./schema_server          # escucha en el puerto 8000
//! ./schema_server 8080     # escucha en el puerto 8080
//! ```

use clap::Parser;

/// Puerto de escucha por defecto
pub const DEFAULT_PORT: u16 = 8000;

/// Configuración del servidor de schemas
#[derive(Debug, Clone, Parser)]
#[command(name = "schema_server")]
#[command(about = "Servidor web para construir documentos de datos estructurados")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(value_name = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind
    ///
    /// Escucha en todas las interfaces, como corresponde a un servidor
    /// de demostración al que se entra por localhost.
    ///
    /// # Ejemplo
    /// ```rust
    /// use schema_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8000");
    /// ```
    pub fn address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Configuración con un puerto explícito (puerto 0 = efímero)
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}
