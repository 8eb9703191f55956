pub mod severity;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use severity::Severity;

/// One entry of the traffic-infraction catalog, as served by the backend.
///
/// Wire names are the backend's Portuguese field names. Decoding never fails
/// on a missing or oddly typed field: strings fall back to empty and numbers
/// to zero.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct InfractionRecord {
    #[serde(rename = "codigo", default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(rename = "descricao", default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(rename = "responsavel", default, deserialize_with = "lenient_string")]
    pub responsible_party: String,
    #[serde(rename = "pontos", default, deserialize_with = "lenient_u32")]
    pub points: u32,
    #[serde(rename = "valor_multa", default, deserialize_with = "lenient_f64")]
    pub fine_amount: f64,
    #[serde(rename = "gravidade", default, deserialize_with = "lenient_string")]
    pub severity: String,
    #[serde(rename = "orgao_autuador", default, deserialize_with = "lenient_string")]
    pub issuing_authority: String,
    #[serde(rename = "artigos_ctb", default, deserialize_with = "lenient_string")]
    pub legal_articles: String,
}

impl InfractionRecord {
    pub fn severity_level(&self) -> Severity {
        Severity::parse(&self.severity)
    }

    pub fn severity_label(&self) -> String {
        self.severity_level().label().to_string()
    }
}

/// Envelope returned by the search endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(rename = "resultados", default, deserialize_with = "null_as_default")]
    pub results: Vec<InfractionRecord>,
    #[serde(default, deserialize_with = "lenient_total")]
    pub total: Option<u64>,
    #[serde(rename = "mensagem", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "sugestao", default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Total matches reported by the server, or the page size when it sent
    /// none.
    pub fn total(&self) -> u64 {
        self.total.unwrap_or(self.results.len() as u64)
    }

    /// The "did you mean" term, if the server offered a usable one.
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Error body sent with non-2xx responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_f64(&Value::deserialize(deserializer)?))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = coerce_f64(&Value::deserialize(deserializer)?);
    if v <= 0.0 {
        return Ok(0);
    }
    Ok(v.min(u32::MAX as f64) as u32)
}

fn lenient_total<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let v = coerce_f64(&value);
    if v <= 0.0 {
        return Ok(Some(0));
    }
    Ok(Some(v.min(u64::MAX as f64) as u64))
}
