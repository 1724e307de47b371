//! # Modelo: Jerarquía de Schemas
//! src/model/schema.rs
//!
//! El tier Modelo del servidor. Define los tipos de schema (al estilo del
//! vocabulario de schema.org), sus propiedades y la jerarquía completa.
//!
//! La jerarquía se carga de un documento JSON. El binario trae uno embebido
//! (`data/hierarchy.json`) para que el servidor funcione sin archivos
//! externos; `from_file` permite cargar otro.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Documento JSON embebido con la jerarquía por defecto
const BUNDLED_HIERARCHY: &str = include_str!("../../data/hierarchy.json");

/// Errores del tier Modelo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// El schema pedido no existe en la jerarquía
    NotFound(String),

    /// La jerarquía no se pudo cargar o deserializar
    Load(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Mismo texto que ve el cliente en la rama GET: así la ruta de
            // error genérica produce el mismo body que la específica
            ModelError::NotFound(name) => write!(f, "Schema \"{}\" not found", name),
            ModelError::Load(msg) => write!(f, "Cannot load hierarchy: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

/// Una propiedad de un schema (ej: `givenName` de `Person`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// Nombre de la propiedad
    pub name: String,

    /// Tipos esperados del valor (ej: ["Text"], ["Date"])
    #[serde(default)]
    pub expected_types: Vec<String>,

    /// Descripción corta para mostrar junto al input
    #[serde(default)]
    pub description: String,
}

/// Un tipo de schema con nombre, padre opcional y propiedades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Nombre del schema (ej: "Person")
    pub name: String,

    /// Nombre del schema padre en la jerarquía, si tiene
    #[serde(default)]
    pub parent: Option<String>,

    /// Propiedades propias de este schema
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Forma en disco del documento de jerarquía
#[derive(Debug, Deserialize)]
struct HierarchyDocument {
    schemas: Vec<Schema>,
}

/// La jerarquía completa de schemas
///
/// # Ejemplo
///
/// ```
/// use schema_server::model::Hierarchy;
///
/// let hierarchy = Hierarchy::bundled().unwrap();
/// let person = hierarchy.get_schema("Person").unwrap();
/// assert_eq!(person.name, "Person");
/// ```
#[derive(Debug, Clone)]
pub struct Hierarchy {
    /// Schemas por nombre
    schemas: HashMap<String, Schema>,

    /// Nombres en el orden del documento (para un render estable)
    order: Vec<String>,
}

impl Hierarchy {
    /// Construye la jerarquía desde un documento JSON
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let document: HierarchyDocument = serde_json::from_str(text)
            .map_err(|e| ModelError::Load(e.to_string()))?;

        let mut schemas = HashMap::new();
        let mut order = Vec::new();

        for schema in document.schemas {
            // Nombre repetido: gana la última definición
            if !schemas.contains_key(&schema.name) {
                order.push(schema.name.clone());
            }
            schemas.insert(schema.name.clone(), schema);
        }

        Ok(Self { schemas, order })
    }

    /// Carga la jerarquía desde un archivo JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Load(e.to_string()))?;
        Self::from_json(&text)
    }

    /// Construye la jerarquía embebida en el binario
    pub fn bundled() -> Result<Self, ModelError> {
        Self::from_json(BUNDLED_HIERARCHY)
    }

    /// Busca un schema por nombre
    ///
    /// # Errores
    ///
    /// `ModelError::NotFound` si el nombre no existe en la jerarquía.
    pub fn get_schema(&self, name: &str) -> Result<&Schema, ModelError> {
        self.schemas
            .get(name)
            .ok_or_else(|| ModelError::NotFound(name.to_string()))
    }

    /// Nombres de los schemas raíz (sin padre), en orden de documento
    pub fn roots(&self) -> Vec<&Schema> {
        self.order
            .iter()
            .filter_map(|name| self.schemas.get(name))
            .filter(|s| s.parent.is_none())
            .collect()
    }

    /// Hijos directos de un schema, en orden de documento
    pub fn children_of(&self, name: &str) -> Vec<&Schema> {
        self.order
            .iter()
            .filter_map(|n| self.schemas.get(n))
            .filter(|s| s.parent.as_deref() == Some(name))
            .collect()
    }

    /// Cantidad de schemas en la jerarquía
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Indica si la jerarquía está vacía
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_hierarchy() -> Hierarchy {
        Hierarchy::from_json(
            r#"{
                "schemas": [
                    {"name": "Thing", "properties": [
                        {"name": "name", "expected_types": ["Text"], "description": "The name of the item."}
                    ]},
                    {"name": "Person", "parent": "Thing", "properties": [
                        {"name": "givenName", "expected_types": ["Text"]}
                    ]},
                    {"name": "Place", "parent": "Thing"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_bundled_hierarchy_loads() {
        let hierarchy = Hierarchy::bundled().unwrap();
        assert!(!hierarchy.is_empty());
        // El tipo raíz del vocabulario siempre existe
        assert!(hierarchy.get_schema("Thing").is_ok());
    }

    #[test]
    fn test_get_schema_found() {
        let hierarchy = small_hierarchy();
        let person = hierarchy.get_schema("Person").unwrap();

        assert_eq!(person.name, "Person");
        assert_eq!(person.parent.as_deref(), Some("Thing"));
        assert_eq!(person.properties.len(), 1);
    }

    #[test]
    fn test_get_schema_not_found() {
        let hierarchy = small_hierarchy();
        let err = hierarchy.get_schema("Unicorn").unwrap_err();

        assert_eq!(err, ModelError::NotFound("Unicorn".to_string()));
        // El Display es exactamente el body que ve el cliente
        assert_eq!(err.to_string(), "Schema \"Unicorn\" not found");
    }

    #[test]
    fn test_roots_and_children() {
        let hierarchy = small_hierarchy();

        let roots: Vec<&str> = hierarchy.roots().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(roots, vec!["Thing"]);

        let children: Vec<&str> = hierarchy
            .children_of("Thing")
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(children, vec!["Person", "Place"]);
    }

    #[test]
    fn test_from_json_invalid_document() {
        let result = Hierarchy::from_json("not json");
        assert!(matches!(result, Err(ModelError::Load(_))));
    }

    #[test]
    fn test_duplicate_name_last_definition_wins() {
        let hierarchy = Hierarchy::from_json(
            r#"{"schemas": [
                {"name": "Thing", "properties": [{"name": "old"}]},
                {"name": "Thing", "properties": [{"name": "new"}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(hierarchy.len(), 1);
        assert_eq!(hierarchy.get_schema("Thing").unwrap().properties[0].name, "new");
    }
}
