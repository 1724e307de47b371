//! # Códigos de Estado HTTP
//!
//! Este módulo define los códigos de estado que usa el servidor de schemas.
//! Son pocos a propósito:
//!
//! - **200 OK**: respuesta por defecto de todas las vistas
//! - **300 Error**: código histórico del servicio para *cualquier* error de
//!   aplicación (schema desconocido, método inválido, asset ausente, fallo
//!   del modelo o la vista)
//! - **400 Bad Request**: request HTTP que ni siquiera se pudo parsear
//!
//! 300 no es un código de error estándar (el rango 3xx es de redirección),
//! pero los clientes existentes del servicio dependen de él, así que se
//! mantiene byte a byte en la status line.

/// Representa los códigos de estado HTTP que emite el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 300 Error - Error de aplicación (código no estándar, ver doc del módulo)
    Error = 300,

    /// 400 Bad Request - Request HTTP malformado a nivel de protocolo
    BadRequest = 400,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// Para `Error` el texto es literalmente `"Error"`: la status line
    /// completa debe ser `300 Error`.
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::Error.reason_phrase(), "Error");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Error => "Error",
            StatusCode::BadRequest => "Bad Request",
        }
    }

    /// Verifica si el código indica éxito
    ///
    /// # Ejemplo
    /// ```
    /// use schema_server::http::StatusCode;
    /// assert!(StatusCode::Ok.is_success());
    /// assert!(!StatusCode::Error.is_success());
    /// ```
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl std::fmt::Display for StatusCode {
    /// Formatea el código de estado para la status line
    ///
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::Error.as_u16(), 300);
        assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
        assert_eq!(StatusCode::Error.reason_phrase(), "Error");
        assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    }

    #[test]
    fn test_is_success() {
        assert!(StatusCode::Ok.is_success());
        assert!(!StatusCode::Error.is_success());
        assert!(!StatusCode::BadRequest.is_success());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::Error.to_string(), "300 Error");
        assert_eq!(StatusCode::BadRequest.to_string(), "400 Bad Request");
    }
}
