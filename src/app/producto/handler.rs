//! Route handlers for the producto catalog.
//!
//! Every handler resolves data through the injected [`ProductoService`]
//! and renders a view or a message-carrying redirect. "Not found" is a
//! typed value here; it is translated into a redirect at this boundary
//! and never escapes as an error status on the CRUD routes.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use futures::StreamExt;
use serde::Deserialize;
use tracing::info;

use super::model::{Categoria, Producto, ProductoForm};
use super::service::ProductoService;
use super::view;
use crate::core::error::CoreError;
use crate::core::response::{attachment, redirect_error, redirect_success};
use crate::infrastructure::storage::UploadStore;

const TITULO_LISTADO: &str = "Listado De Productos";

/// Batch size and pacing for the progressive listing.
const LOTE_DATADRIVER: usize = 2;
const RETRASO_DATADRIVER: Duration = Duration::from_secs(1);

/// Rows per chunk on the chunked listing.
const LOTE_CHUNKED: usize = 100;

/// Repeat factor for the extended listings.
const REPETICIONES_LISTADO: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn ProductoService>,
    pub store: UploadStore,
}

/// `?success=` / `?error=` messages carried through redirects.
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

async fn categorias(state: &AppState) -> Result<Vec<Categoria>, CoreError> {
    state.service.find_all_categorias().await
}

/// GET /listar, GET /
///
/// The fetch happens once; its result fans out to the log sink and to
/// the view explicitly.
pub async fn listar(
    State(state): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, CoreError> {
    let productos = state.service.find_all_nombre_upper().await?;
    for p in &productos {
        info!(nombre = %p.nombre, "producto listado");
    }
    let categorias = categorias(&state).await?;
    Ok(Html(view::listar(
        TITULO_LISTADO,
        &productos,
        &categorias,
        flash.success.as_deref(),
        flash.error.as_deref(),
    )))
}

/// GET /ver/:id
pub async fn ver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, CoreError> {
    match state.service.find_by_id(&id).await? {
        Some(producto) => {
            let categorias = categorias(&state).await?;
            Ok(Html(view::ver("Detalle Producto", &producto, &categorias)).into_response())
        }
        None => Ok(redirect_error("no existe el producto").into_response()),
    }
}

/// GET /form
pub async fn crear(State(state): State<AppState>) -> Result<Html<String>, CoreError> {
    let categorias = categorias(&state).await?;
    Ok(Html(view::form(
        "Formulario de Producto",
        "Crear",
        &ProductoForm::default(),
        &categorias,
        &[],
    )))
}

fn form_de(producto: &Producto) -> ProductoForm {
    ProductoForm {
        id: producto.id.clone(),
        nombre: producto.nombre.clone(),
        precio: producto.precio.to_string(),
        categoria_id: producto.categoria.id.clone().unwrap_or_default(),
    }
}

/// GET /form/:id — edit form with the not-found guard.
pub async fn editar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, CoreError> {
    match state.service.find_by_id(&id).await? {
        Some(producto) => {
            info!(nombre = %producto.nombre, "editando producto");
            let categorias = categorias(&state).await?;
            Ok(Html(view::form(
                "Editar Producto",
                "Editar",
                &form_de(&producto),
                &categorias,
                &[],
            ))
            .into_response())
        }
        None => Ok(redirect_error("no existe el producto").into_response()),
    }
}

/// GET /form-v2/:id — legacy edit form without the not-found guard:
/// unknown ids render a blank form instead of redirecting. `/form/:id`
/// is the canonical behavior; this route is kept for compatibility.
pub async fn editar_v2(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, CoreError> {
    let datos = match state.service.find_by_id(&id).await? {
        Some(producto) => {
            info!(nombre = %producto.nombre, "editando producto");
            form_de(&producto)
        }
        None => ProductoForm::default(),
    };
    let categorias = categorias(&state).await?;
    Ok(Html(view::form(
        "Editar Producto",
        "Editar",
        &datos,
        &categorias,
        &[],
    )))
}

/// POST /form — create or update, multipart body with an optional file.
pub async fn guardar(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, CoreError> {
    let mut form = ProductoForm::default();
    let mut archivo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "id" => {
                let valor = field.text().await?;
                if !valor.is_empty() {
                    form.id = Some(valor);
                }
            }
            "nombre" => form.nombre = field.text().await?,
            "precio" => form.precio = field.text().await?,
            "categoria_id" => form.categoria_id = field.text().await?,
            "file" => {
                let nombre_original = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !nombre_original.is_empty() {
                    archivo = Some((nombre_original, bytes.to_vec()));
                }
            }
            _ => {
                field.bytes().await?;
            }
        }
    }

    let errores = form.errores();
    if !errores.is_empty() {
        let categorias = categorias(&state).await?;
        return Ok(Html(view::form(
            "Error en el formulario producto",
            "Guardar",
            &form,
            &categorias,
            &errores,
        ))
        .into_response());
    }

    let categoria = match state.service.find_categoria_by_id(&form.categoria_id).await? {
        Some(c) => c,
        None => return Ok(redirect_error("no existe la categoria").into_response()),
    };

    // Request-scoped carry-over of create_at and foto from the stored
    // record; this replaces the session attribute the form used to lean on.
    let existente = match form.id.as_deref() {
        Some(id) => state.service.find_by_id(id).await?,
        None => None,
    };

    let mut producto = Producto::new(form.nombre.clone(), form.precio_parsed(), categoria);
    producto.id = form.id.clone();
    if let Some(previo) = existente {
        producto.create_at = previo.create_at;
        producto.foto = previo.foto;
    }
    if producto.create_at.is_none() {
        producto.create_at = Some(Utc::now());
    }
    if let Some((nombre_original, _)) = &archivo {
        producto.foto = Some(UploadStore::unique_filename(nombre_original));
    }

    let guardado = state.service.save(producto).await?;
    info!(nombre = %guardado.nombre, id = ?guardado.id, "producto guardado");

    if let Some((_, bytes)) = &archivo {
        if let Some(foto) = &guardado.foto {
            state.store.save(foto, bytes).await?;
        }
    }

    Ok(redirect_success("producto guardado con exito").into_response())
}

/// GET /eliminar/:id
pub async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, CoreError> {
    match state.service.find_by_id(&id).await? {
        Some(producto) => match state.service.delete(&id).await {
            Ok(()) => {
                info!(nombre = %producto.nombre, id = %id, "producto eliminado");
                Ok(redirect_success("producto eliminado con exito").into_response())
            }
            // the record can vanish between lookup and delete
            Err(CoreError::NotFound(_)) => {
                Ok(redirect_error("no existe el producto a eliminar").into_response())
            }
            Err(otro) => Err(otro),
        },
        None => Ok(redirect_error("no existe el producto a eliminar").into_response()),
    }
}

/// GET /uploads/img/:filename — download a stored image as an attachment.
/// Resolution failures propagate as hard error statuses, not redirects.
pub async fn ver_foto(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, CoreError> {
    let contenido = state.store.load(&filename).await?;
    Ok(attachment(&filename, contenido))
}

fn streamed_listado(
    encabezado: String,
    lotes: Vec<(Duration, String)>,
) -> Result<Response, CoreError> {
    let piezas: Vec<(Duration, String)> = std::iter::once((Duration::ZERO, encabezado))
        .chain(lotes)
        .chain(std::iter::once((Duration::ZERO, view::listar_pie())))
        .collect();

    let stream = futures::stream::iter(piezas).then(|(retraso, html)| async move {
        if !retraso.is_zero() {
            tokio::time::sleep(retraso).await;
        }
        Ok::<Bytes, Infallible>(Bytes::from(html))
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from_stream(stream))
        .map_err(|e| CoreError::Internal(e.to_string()))
}

/// GET /listar-datadriver — listing paced with an artificial delay per
/// element, flushed in small batches for progressive page rendering.
pub async fn listar_data_driver(State(state): State<AppState>) -> Result<Response, CoreError> {
    let productos = state.service.find_all_nombre_upper().await?;
    for p in &productos {
        info!(nombre = %p.nombre, "producto listado");
    }
    let categorias = categorias(&state).await?;
    let encabezado = view::listar_encabezado(TITULO_LISTADO, &categorias, None, None);
    // pacing is per element; batches only decide how much accumulates
    // before a chunk is flushed
    let lotes = productos
        .chunks(LOTE_DATADRIVER)
        .map(|lote| {
            (
                RETRASO_DATADRIVER * lote.len() as u32,
                lote.iter().map(view::listar_fila).collect(),
            )
        })
        .collect();
    streamed_listado(encabezado, lotes)
}

/// GET /listar-full — extended listing, fully materialized before the
/// response goes out.
pub async fn listar_full(State(state): State<AppState>) -> Result<Html<String>, CoreError> {
    let productos = state
        .service
        .find_all_nombre_upper_repeat(REPETICIONES_LISTADO)
        .await?;
    let categorias = categorias(&state).await?;
    Ok(Html(view::listar(
        TITULO_LISTADO,
        &productos,
        &categorias,
        None,
        None,
    )))
}

/// GET /listar-chunked — the same extended listing, streamed in chunks.
pub async fn listar_chunked(State(state): State<AppState>) -> Result<Response, CoreError> {
    let productos = state
        .service
        .find_all_nombre_upper_repeat(REPETICIONES_LISTADO)
        .await?;
    let categorias = categorias(&state).await?;
    let encabezado = view::listar_encabezado(TITULO_LISTADO, &categorias, None, None);
    let lotes = productos
        .chunks(LOTE_CHUNKED)
        .map(|lote| {
            (
                Duration::ZERO,
                lote.iter().map(view::listar_fila).collect(),
            )
        })
        .collect();
    streamed_listado(encabezado, lotes)
}
