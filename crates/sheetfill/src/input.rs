//! Named-part resolution: pick the template and payload out of a form.

use crate::config::FillConfig;
use crate::error::FillError;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartBody {
    Binary(Vec<u8>),
    Text(String),
}

impl PartBody {
    pub fn kind(&self) -> PartKind {
        match self {
            PartBody::Binary(_) => PartKind::Binary,
            PartBody::Text(_) => PartKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PartBody::Binary(b) => b.len(),
            PartBody::Text(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartKind {
    Binary,
    Text,
}

/// One fallback strategy: a part name plus the kind it must have.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PartLookup {
    pub name: &'static str,
    pub kind: PartKind,
}

impl PartLookup {
    pub const fn binary(name: &'static str) -> Self {
        Self {
            name,
            kind: PartKind::Binary,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: PartKind::Text,
        }
    }
}

pub const TEMPLATE_LOOKUP: &[PartLookup] =
    &[PartLookup::binary("template"), PartLookup::binary("file")];

pub const PAYLOAD_LOOKUP: &[PartLookup] =
    &[PartLookup::text("payload"), PartLookup::binary("payload")];

/// Ordered set of named parts as handed over by the transport.
///
/// Duplicate name/kind pairs are allowed; lookups take the first one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormParts {
    parts: Vec<(String, PartBody)>,
}

impl FormParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, body: PartBody) {
        self.parts.push((name.into(), body));
    }

    pub fn with_binary(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.push(name, PartBody::Binary(bytes.into()));
        self
    }

    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(name, PartBody::Text(text.into()));
        self
    }

    /// Names of every part received, in arrival order.
    pub fn names(&self) -> Vec<String> {
        self.parts.iter().map(|(n, _)| n.clone()).collect()
    }

    fn find(&self, lookup: &PartLookup) -> Option<usize> {
        self.parts
            .iter()
            .position(|(n, b)| n == lookup.name && b.kind() == lookup.kind)
    }

    /// Remove and return the first part matching `lookup`.
    pub fn take(&mut self, lookup: &PartLookup) -> Option<PartBody> {
        self.find(lookup).map(|idx| self.parts.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Where the payload text came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PayloadSource {
    Text,
    Binary,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedInput {
    pub template: Vec<u8>,
    pub payload: String,
    /// Name of the part the template was taken from.
    pub template_field: &'static str,
    pub payload_source: PayloadSource,
}

fn check_size(field: &str, size: usize, config: &FillConfig) -> Result<(), FillError> {
    if size > config.max_upload_bytes {
        return Err(FillError::UploadTooLarge {
            field: field.to_string(),
            size,
            limit: config.max_upload_bytes,
        });
    }
    Ok(())
}

/// Extract template bytes and payload text. The template is resolved first,
/// so a request missing both reports the template.
pub fn resolve_input(mut parts: FormParts, config: &FillConfig) -> Result<ResolvedInput, FillError> {
    let received = parts.names();

    let mut template = None;
    for lookup in TEMPLATE_LOOKUP {
        if let Some(PartBody::Binary(bytes)) = parts.take(lookup) {
            template = Some((lookup.name, bytes));
            break;
        }
    }
    let (template_field, template) = match template {
        Some((_, bytes)) if bytes.is_empty() => {
            return Err(FillError::MissingTemplate { received });
        }
        Some(found) => found,
        None => return Err(FillError::MissingTemplate { received }),
    };
    check_size(template_field, template.len(), config)?;

    let mut payload = None;
    for lookup in PAYLOAD_LOOKUP {
        match parts.take(lookup) {
            // An empty text field is what browsers send for an untouched input.
            Some(PartBody::Text(text)) if text.is_empty() => continue,
            Some(PartBody::Text(text)) => {
                check_size(lookup.name, text.len(), config)?;
                payload = Some((text, PayloadSource::Text));
                break;
            }
            Some(PartBody::Binary(bytes)) => {
                check_size(lookup.name, bytes.len(), config)?;
                if bytes.is_empty() {
                    break;
                }
                let text = String::from_utf8_lossy(&bytes).into_owned();
                payload = Some((text, PayloadSource::Binary));
                break;
            }
            None => {}
        }
    }
    let Some((payload, payload_source)) = payload else {
        return Err(FillError::MissingPayload { received });
    };

    tracing::debug!(
        template_field,
        template_bytes = template.len(),
        payload_bytes = payload.len(),
        ?payload_source,
        "resolved input parts"
    );

    Ok(ResolvedInput {
        template,
        payload,
        template_field,
        payload_source,
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Parse payload text into a JSON object.
pub fn parse_payload(raw: &str) -> Result<JsonValue, FillError> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let value: JsonValue =
        serde_json::from_str(text).map_err(|err| FillError::invalid_json(&err, raw))?;
    if !value.is_object() {
        return Err(FillError::PayloadNotObject {
            found: json_kind(&value),
        });
    }
    Ok(value)
}
