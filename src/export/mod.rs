use crate::index::BookmarkIndex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use wasm_bindgen::JsCast;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Json => "bookmarks.json",
            ExportFormat::Csv => "bookmarks.csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// A named, download-ready byte sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ExportArtifact {
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug)]
pub(crate) struct ExportError {
    pub message: String,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExportError {}

impl ExportError {
    fn js(ctx: &str, e: wasm_bindgen::JsValue) -> Self {
        Self {
            message: format!("{ctx}: {e:?}"),
        }
    }
}

pub(crate) type ExportResult<T> = Result<T, ExportError>;

#[derive(Clone, Debug, Serialize)]
struct ExportedLink<'a> {
    title: &'a str,
    url: &'a str,
}

/// Category title -> links, in document order.
struct ExportedMapping<'a>(Vec<(&'a str, Vec<ExportedLink<'a>>)>);

impl Serialize for ExportedMapping<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (title, links) in &self.0 {
            map.serialize_entry(title, links)?;
        }
        map.end()
    }
}

/// A repeated title keeps its first position and takes the last
/// category's links.
fn reshape(index: &BookmarkIndex) -> ExportedMapping<'_> {
    let mut out: Vec<(&str, Vec<ExportedLink<'_>>)> = vec![];
    for category in index.categories() {
        let title = category.title.trim();
        let links = category
            .links
            .iter()
            .map(|l| ExportedLink {
                title: l.title.trim(),
                url: &l.url,
            })
            .collect();

        match out.iter_mut().find(|(t, _)| *t == title) {
            Some(slot) => slot.1 = links,
            None => out.push((title, links)),
        }
    }
    ExportedMapping(out)
}

pub(crate) struct ExportEngine;

impl ExportEngine {
    pub fn export(index: &BookmarkIndex, format: ExportFormat) -> ExportArtifact {
        let body = match format {
            ExportFormat::Json => to_json(index),
            ExportFormat::Csv => to_csv(index),
        };
        log::info!(
            "exported {} links as {format} ({} bytes)",
            index.link_count(),
            body.len()
        );
        ExportArtifact {
            filename: format.filename(),
            mime_type: format.mime_type(),
            bytes: body.into_bytes(),
        }
    }
}

fn to_json(index: &BookmarkIndex) -> String {
    // Two-space indentation.
    serde_json::to_string_pretty(&reshape(index)).unwrap_or_else(|e| {
        log::error!("json export failed: {e}");
        "{}".into()
    })
}

/// Every field is wrapped in double quotes. Embedded quotes are NOT
/// escaped, so a value containing `"` yields a malformed row.
fn to_csv(index: &BookmarkIndex) -> String {
    let mut csv = String::from("Category,Title,URL\n");
    for (category, links) in reshape(index).0 {
        for link in links {
            csv.push_str(&format!("\"{}\",\"{}\",\"{}\"\n", category, link.title, link.url));
        }
    }
    csv
}

/// Hand an artifact to the browser as a file download.
pub(crate) fn download(artifact: &ExportArtifact) -> ExportResult<()> {
    let window = web_sys::window().ok_or_else(|| ExportError {
        message: "no window".to_string(),
    })?;
    let document = window.document().ok_or_else(|| ExportError {
        message: "no document".to_string(),
    })?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(artifact.bytes.as_slice()));
    let opts = web_sys::BlobPropertyBag::new();
    opts.set_type(artifact.mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
        .map_err(|e| ExportError::js("blob", e))?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| ExportError::js("object url", e))?;

    let result: ExportResult<()> = (|| {
        let a = document
            .create_element("a")
            .map_err(|e| ExportError::js("anchor", e))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| ExportError {
                message: "anchor cast".to_string(),
            })?;
        a.set_href(&url);
        a.set_download(artifact.filename);

        let body = document.body().ok_or_else(|| ExportError {
            message: "no body".to_string(),
        })?;
        body.append_child(&a)
            .map_err(|e| ExportError::js("append", e))?;
        a.click();
        let _ = body.remove_child(&a);
        Ok(())
    })();

    let _ = web_sys::Url::revoke_object_url(&url);
    result
}
