//! # Vista: Renderizado de Schemas
//! src/view/schema_view.rs
//!
//! El tier Vista del MVC. Genera el HTML que consume el navegador:
//! el índice de la jerarquía, los formularios de propiedades, los
//! fragmentos AJAX y el documento JSON-LD final.
//!
//! Todo se arma con `format!`. La única pieza con estructura de verdad es
//! el documento generado, que se construye con `serde_json` para que el
//! JSON-LD emitido sea siempre bien formado.

use crate::http::RequestContext;
use crate::model::{Hierarchy, Schema};
use serde_json::{Map, Value};

/// Renderizador de las vistas del constructor de schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaView;

impl SchemaView {
    pub fn new() -> Self {
        Self
    }

    /// Página índice: la jerarquía completa como listas anidadas
    ///
    /// Cada schema es un link a su formulario de propiedades.
    pub fn get_index(&self, hierarchy: &Hierarchy) -> String {
        let mut tree = String::new();
        tree.push_str("<ul class=\"hierarchy\">\n");
        for root in hierarchy.roots() {
            self.render_branch(hierarchy, root, &mut tree);
        }
        tree.push_str("</ul>\n");

        page(
            "Schema Hierarchy",
            &format!(
                "<h1>Schema Hierarchy</h1>\n\
                 <p>Pick a type to start building your structured data document.</p>\n{}",
                tree
            ),
        )
    }

    /// Rama del árbol: el schema y, anidados, sus hijos
    fn render_branch(&self, hierarchy: &Hierarchy, schema: &Schema, out: &mut String) {
        out.push_str(&format!(
            "<li><a href=\"/{0}\">{0}</a>",
            schema.name
        ));

        let children = hierarchy.children_of(&schema.name);
        if !children.is_empty() {
            out.push_str("\n<ul>\n");
            for child in children {
                self.render_branch(hierarchy, child, out);
            }
            out.push_str("</ul>\n");
        }
        out.push_str("</li>\n");
    }

    /// Página estática de confirmación de guardado
    ///
    /// El schema quedó en el Local Storage del navegador; acá solo se
    /// confirma. Siempre retorna exactamente el mismo HTML.
    pub fn get_saved_output(&self) -> String {
        page(
            "Schema saved",
            "<h1>Schema saved</h1>\n\
             <p>Your schema was saved in the browser's Local Storage.</p>\n\
             <p><a href=\"/\">Back to the hierarchy</a></p>",
        )
    }

    /// Documento final: el JSON-LD armado con lo que el usuario completó
    ///
    /// `schema_type` viene del parámetro `path` del contexto; el resto de
    /// los parámetros del contexto se vuelcan como propiedades.
    pub fn generate_schema_output(&self, schema_type: &str, ctx: &RequestContext) -> String {
        let mut document = Map::new();
        document.insert("@context".to_string(), Value::from("https://schema.org"));
        document.insert("@type".to_string(), Value::from(schema_type));

        // Propiedades en orden estable para que el output sea reproducible
        let mut names: Vec<&str> = ctx.keys().filter(|k| *k != "path").collect();
        names.sort_unstable();
        for name in names {
            document.insert(name.to_string(), Value::from(ctx.get(name)));
        }

        let json = serde_json::to_string_pretty(&Value::Object(document))
            .unwrap_or_else(|_| "{}".to_string());

        page(
            "Generated schema",
            &format!(
                "<h1>Your schema</h1>\n\
                 <p>Copy the block below into your page, or validate it with the\n\
                 <a href=\"https://search.google.com/structured-data/testing-tool\">Structured Data Testing Tool</a>.</p>\n\
                 <pre>{}</pre>\n\
                 <script type=\"application/ld+json\">\n{}\n</script>",
                escape_html(&json),
                json
            ),
        )
    }

    /// Fragmento AJAX: las propiedades de un schema para insertar en la página
    ///
    /// Los ids de los inputs se namespacean con el id del contenedor que
    /// pidió el fragmento, para poder bajar otro nivel desde ahí.
    pub fn ajax_properties(&self, schema: &Schema, container_id: &str) -> String {
        let mut out = format!(
            "<div class=\"properties\" data-schema=\"{}\" data-container=\"{}\">\n",
            schema.name, container_id
        );
        for property in &schema.properties {
            out.push_str(&property_input(&schema.name, &property.name, &property_label(property), Some(container_id)));
        }
        out.push_str("</div>\n");
        out
    }

    /// Página completa con el formulario de propiedades de un schema
    pub fn show_schema_properties(&self, schema: &Schema) -> String {
        let mut form = format!(
            "<h1>{0}</h1>\n\
             <form id=\"schema_form\" data-schema=\"{0}\">\n\
             <input type=\"hidden\" name=\"path\" value=\"{0}\">\n",
            schema.name
        );
        for property in &schema.properties {
            form.push_str(&property_input(&schema.name, &property.name, &property_label(property), None));
        }
        form.push_str(
            "<button type=\"button\" id=\"save\">Save</button>\n\
             <button type=\"button\" id=\"generate\">Generate</button>\n\
             </form>",
        );

        page(&schema.name, &form)
    }
}

/// Etiqueta de una propiedad: nombre más tipos esperados si los hay
fn property_label(property: &crate::model::Property) -> String {
    if property.expected_types.is_empty() {
        property.name.clone()
    } else {
        format!("{} ({})", property.name, property.expected_types.join(", "))
    }
}

/// Un input de propiedad, con id opcionalmente namespaceado por contenedor
fn property_input(schema: &str, property: &str, label: &str, container: Option<&str>) -> String {
    let id = match container {
        Some(c) => format!("{}_{}", c, property),
        None => format!("{}_{}", schema, property),
    };
    format!(
        "<label for=\"{0}\">{1}</label>\n\
         <input type=\"text\" id=\"{0}\" name=\"{2}\">\n",
        id, label, property
    )
}

/// Envuelve un cuerpo en la página HTML común
fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         <script src=\"/schema.js\"></script>\n\
         </head>\n\
         <body>\n{}\n</body>\n\
         </html>\n",
        title, body
    )
}

/// Escapa lo mínimo para meter texto dentro de un `<pre>`
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
