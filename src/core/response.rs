//! Response helpers: message-carrying redirects and file downloads.

use axum::{
    http::header,
    response::{IntoResponse, Redirect, Response},
};

/// Target of every post-action redirect.
const LISTADO: &str = "/listar";

/// Encode a human-readable message for the query string, spaces as `+`.
///
/// Messages are plain Spanish words; anything outside the unreserved set
/// is percent-encoded so the URL stays valid.
pub fn encode_mensaje(mensaje: &str) -> String {
    let mut out = String::with_capacity(mensaje.len());
    for b in mensaje.bytes() {
        match b {
            b' ' => out.push('+'),
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

/// Redirect to the listing carrying `?success=...`.
pub fn redirect_success(mensaje: &str) -> Redirect {
    Redirect::to(&format!("{}?success={}", LISTADO, encode_mensaje(mensaje)))
}

/// Redirect to the listing carrying `?error=...`.
pub fn redirect_error(mensaje: &str) -> Redirect {
    Redirect::to(&format!("{}?error={}", LISTADO, encode_mensaje(mensaje)))
}

/// Serve raw bytes as a downloadable attachment.
pub fn attachment(filename: &str, contenido: Vec<u8>) -> Response {
    (
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )],
        contenido,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_plus() {
        assert_eq!(
            encode_mensaje("producto guardado con exito"),
            "producto+guardado+con+exito"
        );
    }

    #[test]
    fn reserved_bytes_are_percent_encoded() {
        assert_eq!(encode_mensaje("a&b=c"), "a%26b%3Dc");
    }

    #[test]
    fn attachment_sets_content_disposition() {
        let resp = attachment("foto.png", vec![1, 2, 3]);
        let cd = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(cd, "attachment; filename=\"foto.png\"");
    }
}
