use serde::Serialize;
use serde_json::Value;

use crate::http::HttpResponse;
use crate::Result;

/// Indented JSON, one space per level.
pub fn render<T: Serialize>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Status line plus body. JSON bodies are re-indented, anything else is printed verbatim.
pub fn render_http(resp: &HttpResponse) -> String {
    let body = match serde_json::from_str::<Value>(&resp.body) {
        Ok(value) => render(&value).unwrap_or_else(|_| resp.body.clone()),
        Err(_) => resp.body.clone(),
    };
    format!("HTTP Status: {}\nResponse Body: {}", resp.status, body)
}
