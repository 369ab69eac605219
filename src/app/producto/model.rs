//! Producto and Categoria data models, plus the submitted form payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Classification entity referenced by a product. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categoria {
    pub id: Option<String>,
    pub nombre: String,
}

impl Categoria {
    pub fn new(id: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            nombre: nombre.into(),
        }
    }
}

/// The catalog entity under management.
///
/// `id` stays `None` until the service persists the record; `create_at`
/// is assigned on first save and never overwritten; `foto` holds the
/// server-generated filename of the uploaded image, when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producto {
    pub id: Option<String>,
    pub nombre: String,
    pub precio: f64,
    pub create_at: Option<DateTime<Utc>>,
    pub categoria: Categoria,
    pub foto: Option<String>,
}

impl Producto {
    pub fn new(nombre: impl Into<String>, precio: f64, categoria: Categoria) -> Self {
        Self {
            id: None,
            nombre: nombre.into(),
            precio,
            create_at: None,
            categoria,
            foto: None,
        }
    }
}

/// Fields submitted from the product form, before they become a `Producto`.
///
/// `precio` arrives as text from the multipart body; parsing happens after
/// validation so an unparsable value reports like any other field error.
#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
pub struct ProductoForm {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "el nombre es obligatorio"))]
    pub nombre: String,
    #[validate(length(min = 1, message = "el precio es obligatorio"))]
    pub precio: String,
    #[validate(length(min = 1, message = "la categoria es obligatoria"))]
    pub categoria_id: String,
}

impl ProductoForm {
    /// Validate the raw fields and parse the price. Returns the list of
    /// human-readable field errors, empty when the form is acceptable.
    pub fn errores(&self) -> Vec<String> {
        let mut errores = Vec::new();
        if let Err(e) = self.validate() {
            for (_, field_errors) in e.field_errors() {
                for fe in field_errors {
                    if let Some(msg) = &fe.message {
                        errores.push(msg.to_string());
                    }
                }
            }
        }
        if !self.precio.is_empty() {
            match self.precio.parse::<f64>() {
                Ok(v) if v >= 0.0 => {}
                _ => errores.push("el precio no es valido".to_string()),
            }
        }
        errores
    }

    /// Parsed price; only meaningful when `errores()` came back empty.
    pub fn precio_parsed(&self) -> f64 {
        self.precio.parse().unwrap_or(0.0)
    }
}
