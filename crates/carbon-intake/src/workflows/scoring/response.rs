use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Scoring service answer as persisted for the results page.
///
/// Only `ok` and the presence of `data` decide whether an answer is renderable; every value
/// inside `data` is kept as sent and shown literally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmAnalysisResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub ok: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub stored: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub response_id: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub data: Option<FarmAnalysisData>,
}

impl FarmAnalysisResponse {
    /// Parse a raw reply body. `None` when the body is not a JSON object.
    pub fn from_body(body: &Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }
        Self::deserialize(body).ok()
    }

    /// Estimate data, present only for a successful analysis.
    pub fn estimate(&self) -> Option<&FarmAnalysisData> {
        if self.ok {
            self.data.as_ref()
        } else {
            None
        }
    }
}

/// Whether a raw reply body reports success and carries the estimate. The results page accepts
/// exactly the bodies this accepts.
pub fn carries_estimate(body: &Value) -> bool {
    FarmAnalysisResponse::from_body(body).is_some_and(|response| response.estimate().is_some())
}

/// A value of the wrong shape falls back to the default instead of failing the whole answer.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn present<'de, D>(deserializer: D) -> Result<Option<FarmAnalysisData>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(FarmAnalysisData::deserialize(value).unwrap_or_default()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmAnalysisData {
    #[serde(default, deserialize_with = "lenient")]
    pub area_cultivo: AreaCredits,
    #[serde(default, deserialize_with = "lenient")]
    pub area_desmatamento_evitado: AreaCredits,
    #[serde(default, deserialize_with = "lenient")]
    pub potencial_geracao: GenerationPotential,
    #[serde(default, deserialize_with = "lenient")]
    pub valor_estimado: EstimatedValue,
    #[serde(default)]
    pub observacoes: Value,
}

/// Credits attributed to one area class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaCredits {
    #[serde(default)]
    pub hectares: Value,
    #[serde(default)]
    pub creditos_por_ha: Value,
    #[serde(default)]
    pub creditos_total: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationPotential {
    #[serde(default)]
    pub creditos_total: Value,
}

/// Revenue ranges; the range strings look like `R$250.00–R$750.00`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedValue {
    #[serde(default)]
    pub preco_credito: Value,
    #[serde(default)]
    pub cultivo_anual: Value,
    #[serde(default)]
    pub evitado_one_time: Value,
    #[serde(default)]
    pub observacao: Value,
}
