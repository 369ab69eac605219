//! Server-rendered views: listing, detail and form pages.
//!
//! Pages are assembled as plain strings; the chunked listing endpoints
//! reuse the header/rows/footer pieces so they can stream the same page
//! progressively.

use super::model::{Categoria, Producto, ProductoForm};

/// Minimal HTML escaping for interpolated values.
pub fn escape(valor: &str) -> String {
    let mut out = String::with_capacity(valor.len());
    for c in valor.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn nav_categorias(categorias: &[Categoria]) -> String {
    categorias
        .iter()
        .map(|c| format!("<li>{}</li>", escape(&c.nombre)))
        .collect()
}

/// Shared page frame. Every view carries the category list in a nav bar,
/// so selection widgets always have data to work with.
fn layout(titulo: &str, categorias: &[Categoria], cuerpo: &str) -> String {
    let nav = nav_categorias(categorias);
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{titulo}</title></head>\
         <body><nav><ul class=\"categorias\">{nav}</ul></nav>\
         <h1>{titulo}</h1>{cuerpo}</body></html>",
        titulo = escape(titulo),
    )
}

/// Flash banner rendered from the `?success=` / `?error=` query params.
fn mensajes(success: Option<&str>, error: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(msg) = success {
        out.push_str(&format!(
            "<div class=\"alert alert-success\">{}</div>",
            escape(msg)
        ));
    }
    if let Some(msg) = error {
        out.push_str(&format!(
            "<div class=\"alert alert-danger\">{}</div>",
            escape(msg)
        ));
    }
    out
}

pub fn listar_encabezado(
    titulo: &str,
    categorias: &[Categoria],
    success: Option<&str>,
    error: Option<&str>,
) -> String {
    let nav = nav_categorias(categorias);
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{titulo}</title></head>\
         <body><nav><ul class=\"categorias\">{nav}</ul></nav>\
         <h1>{titulo}</h1>{flash}\
         <p><a href=\"/form\">Crear producto</a></p>\
         <table><thead><tr><th>Nombre</th><th>Precio</th><th>Categoria</th>\
         <th></th><th></th><th></th></tr></thead><tbody>",
        titulo = escape(titulo),
        flash = mensajes(success, error),
    )
}

pub fn listar_fila(producto: &Producto) -> String {
    let id = producto.id.as_deref().unwrap_or_default();
    format!(
        "<tr><td>{nombre}</td><td>{precio:.2}</td><td>{categoria}</td>\
         <td><a href=\"/ver/{id}\">ver</a></td>\
         <td><a href=\"/form/{id}\">editar</a></td>\
         <td><a href=\"/eliminar/{id}\">eliminar</a></td></tr>",
        nombre = escape(&producto.nombre),
        precio = producto.precio,
        categoria = escape(&producto.categoria.nombre),
        id = escape(id),
    )
}

pub fn listar_pie() -> String {
    "</tbody></table></body></html>".to_string()
}

/// Fully materialized listing page.
pub fn listar(
    titulo: &str,
    productos: &[Producto],
    categorias: &[Categoria],
    success: Option<&str>,
    error: Option<&str>,
) -> String {
    let mut pagina = listar_encabezado(titulo, categorias, success, error);
    for p in productos {
        pagina.push_str(&listar_fila(p));
    }
    pagina.push_str(&listar_pie());
    pagina
}

/// Product detail page.
pub fn ver(titulo: &str, producto: &Producto, categorias: &[Categoria]) -> String {
    let foto = producto
        .foto
        .as_deref()
        .map(|f| {
            format!(
                "<p><a href=\"/uploads/img/{0}\">descargar foto</a></p>",
                escape(f)
            )
        })
        .unwrap_or_default();
    let create_at = producto
        .create_at
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    let cuerpo = format!(
        "<dl><dt>Nombre</dt><dd>{nombre}</dd>\
         <dt>Precio</dt><dd>{precio:.2}</dd>\
         <dt>Categoria</dt><dd>{categoria}</dd>\
         <dt>Creado</dt><dd>{create_at}</dd></dl>{foto}\
         <p><a href=\"/listar\">volver</a></p>",
        nombre = escape(&producto.nombre),
        precio = producto.precio,
        categoria = escape(&producto.categoria.nombre),
    );
    layout(titulo, categorias, &cuerpo)
}

/// Product form, blank or pre-filled. `errores` re-renders the page with
/// the validation messages above the fields.
pub fn form(
    titulo: &str,
    boton: &str,
    form_data: &ProductoForm,
    categorias: &[Categoria],
    errores: &[String],
) -> String {
    let avisos: String = errores
        .iter()
        .map(|e| format!("<li class=\"error\">{}</li>", escape(e)))
        .collect();
    let avisos = if avisos.is_empty() {
        String::new()
    } else {
        format!("<ul class=\"errores\">{avisos}</ul>")
    };

    let opciones: String = categorias
        .iter()
        .map(|c| {
            let id = c.id.as_deref().unwrap_or_default();
            let selected = if form_data.categoria_id == id {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{selected}>{}</option>",
                escape(id),
                escape(&c.nombre)
            )
        })
        .collect();

    let id_oculto = form_data
        .id
        .as_deref()
        .map(|id| format!("<input type=\"hidden\" name=\"id\" value=\"{}\">", escape(id)))
        .unwrap_or_default();

    let cuerpo = format!(
        "{avisos}<form action=\"/form\" method=\"post\" enctype=\"multipart/form-data\">\
         {id_oculto}\
         <label>Nombre</label>\
         <input type=\"text\" name=\"nombre\" value=\"{nombre}\">\
         <label>Precio</label>\
         <input type=\"text\" name=\"precio\" value=\"{precio}\">\
         <label>Categoria</label>\
         <select name=\"categoria_id\"><option value=\"\">-- seleccionar --</option>{opciones}</select>\
         <label>Foto</label>\
         <input type=\"file\" name=\"file\">\
         <button type=\"submit\">{boton}</button></form>",
        nombre = escape(&form_data.nombre),
        precio = escape(&form_data.precio),
        boton = escape(boton),
    );
    layout(titulo, categorias, &cuerpo)
}
