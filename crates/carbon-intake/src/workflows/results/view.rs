use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::currency::{format_brl, format_brl_range};
use crate::workflows::eligibility::{SessionStore, API_RESPONSE_KEY};
use crate::workflows::scoring::{AreaCredits, FarmAnalysisData, FarmAnalysisResponse};

/// Display-ready rendering of a stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultsView {
    /// Nothing renderable was stored for this session.
    Unavailable,
    Ready(AnalysisBreakdown),
}

impl ResultsView {
    /// Read the persisted analysis once and build the view. Reading never mutates the store.
    pub fn load<S>(store: &S) -> Self
    where
        S: SessionStore + ?Sized,
    {
        let raw = match store.get(API_RESPONSE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no stored analysis for session");
                return ResultsView::Unavailable;
            }
            Err(err) => {
                warn!(error = %err, "stored analysis could not be read");
                return ResultsView::Unavailable;
            }
        };

        Self::from_serialized(&raw)
    }

    pub fn from_serialized(raw: &str) -> Self {
        let body = match serde_json::from_str::<Value>(raw) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "stored analysis is not valid JSON");
                return ResultsView::Unavailable;
            }
        };

        match FarmAnalysisResponse::from_body(&body) {
            Some(response) => Self::from_response(&response),
            None => {
                warn!("stored analysis is not a JSON object");
                ResultsView::Unavailable
            }
        }
    }

    pub fn from_response(response: &FarmAnalysisResponse) -> Self {
        match response.estimate() {
            Some(data) => ResultsView::Ready(AnalysisBreakdown::from_data(data)),
            None => ResultsView::Unavailable,
        }
    }

    pub fn breakdown(&self) -> Option<&AnalysisBreakdown> {
        match self {
            ResultsView::Ready(breakdown) => Some(breakdown),
            ResultsView::Unavailable => None,
        }
    }
}

/// One area class as shown on the results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSection {
    pub hectares: String,
    pub credits_per_hectare: String,
    pub credits_total: String,
}

impl AreaSection {
    fn from_credits(credits: &AreaCredits) -> Self {
        Self {
            hectares: match &credits.hectares {
                Value::Null => MISSING.to_string(),
                hectares => format!("{} ha", display_value(hectares)),
            },
            credits_per_hectare: display_value(&credits.creditos_por_ha),
            credits_total: display_value(&credits.creditos_total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueSection {
    pub credit_price: String,
    pub annual_cultivation: String,
    pub avoided_deforestation: String,
    pub note: Option<String>,
}

/// The five result sections, formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisBreakdown {
    pub cultivated: AreaSection,
    pub avoided_deforestation: AreaSection,
    pub total_potential: String,
    pub estimated_value: ValueSection,
    pub observations: String,
}

impl AnalysisBreakdown {
    pub fn from_data(data: &FarmAnalysisData) -> Self {
        let value = &data.valor_estimado;
        Self {
            cultivated: AreaSection::from_credits(&data.area_cultivo),
            avoided_deforestation: AreaSection::from_credits(&data.area_desmatamento_evitado),
            total_potential: display_value(&data.potencial_geracao.creditos_total),
            estimated_value: ValueSection {
                credit_price: credit_price(&value.preco_credito),
                annual_cultivation: currency_range(&value.cultivo_anual),
                avoided_deforestation: currency_range(&value.evitado_one_time),
                note: value
                    .observacao
                    .as_str()
                    .filter(|note| !note.is_empty())
                    .map(str::to_string),
            },
            observations: display_value(&data.observacoes),
        }
    }
}

const MISSING: &str = "-";

/// Literal rendering of an answer value; a missing value renders as `-`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => format_number(float),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

/// `R$ 5.00` for a numeric price; anything else is shown as sent.
fn credit_price(value: &Value) -> String {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(price) => format!("R$ {price:.2}"),
            None => format!("R$ {number}"),
        },
        Value::String(text) if !text.is_empty() => format!("R$ {text}"),
        _ => MISSING.to_string(),
    }
}

fn currency_range(value: &Value) -> String {
    match value {
        Value::String(range) => format_brl_range(Some(range)),
        Value::Number(number) => number
            .as_f64()
            .map(format_brl)
            .unwrap_or_else(|| number.to_string()),
        Value::Null => format_brl_range(None),
        other => other.to_string(),
    }
}

/// Render a number the way the scoring service sent it: integral values without a fraction.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::eligibility::InMemorySessionStore;
    use serde_json::json;

    fn stored_response() -> serde_json::Value {
        json!({
            "ok": true,
            "stored": true,
            "response_id": "resp-42",
            "data": {
                "area_cultivo": { "hectares": 80, "creditos_por_ha": "0.5–1.5", "creditos_total": "40–120" },
                "area_desmatamento_evitado": { "hectares": 40.5, "creditos_por_ha": "150–225", "creditos_total": "6075–9112" },
                "potencial_geracao": { "creditos_total": "6115–9232 tCO2e" },
                "valor_estimado": {
                    "preco_credito": 5,
                    "cultivo_anual": "R$250.00–R$750.00",
                    "evitado_one_time": "R$30000.00-R$67500.00"
                },
                "observacoes": "Estimativa preliminar."
            }
        })
    }

    #[test]
    fn missing_entry_is_unavailable() {
        let store = InMemorySessionStore::new();
        assert_eq!(ResultsView::load(&store), ResultsView::Unavailable);
    }

    #[test]
    fn failed_or_malformed_entries_are_unavailable() {
        let store = InMemorySessionStore::new();
        for raw in [
            json!({ "ok": false, "error": "Erro na API: 503" }).to_string(),
            json!({ "ok": true }).to_string(),
            json!({ "ok": true, "data": null }).to_string(),
            json!(["ok", true]).to_string(),
            "{not json".to_string(),
        ] {
            store.set(API_RESPONSE_KEY, raw).expect("set");
            assert_eq!(ResultsView::load(&store), ResultsView::Unavailable);
        }
    }

    #[test]
    fn full_response_renders_every_section() {
        let store = InMemorySessionStore::new();
        store
            .set(API_RESPONSE_KEY, stored_response().to_string())
            .expect("set");

        let view = ResultsView::load(&store);
        let breakdown = view.breakdown().expect("breakdown available");

        assert_eq!(breakdown.cultivated.hectares, "80 ha");
        assert_eq!(breakdown.cultivated.credits_per_hectare, "0.5–1.5");
        assert_eq!(breakdown.avoided_deforestation.hectares, "40.5 ha");
        assert_eq!(breakdown.total_potential, "6115–9232 tCO2e");
        assert_eq!(breakdown.estimated_value.credit_price, "R$ 5.00");
        assert_eq!(
            breakdown.estimated_value.annual_cultivation,
            "R$250,00–R$750,00"
        );
        assert_eq!(
            breakdown.estimated_value.avoided_deforestation,
            "R$30.000,00–R$67.500,00"
        );
        assert_eq!(breakdown.estimated_value.note, None);
        assert_eq!(breakdown.observations, "Estimativa preliminar.");
    }

    #[test]
    fn partial_data_renders_with_placeholders() {
        let view = ResultsView::from_serialized(
            &json!({ "ok": true, "data": { "observacoes": "faltando" } }).to_string(),
        );
        let breakdown = view.breakdown().expect("renderable with ok and data");

        assert_eq!(breakdown.cultivated.hectares, "-");
        assert_eq!(breakdown.cultivated.credits_total, "-");
        assert_eq!(breakdown.total_potential, "-");
        assert_eq!(breakdown.estimated_value.credit_price, "-");
        assert_eq!(breakdown.estimated_value.annual_cultivation, "-");
        assert_eq!(breakdown.observations, "faltando");
    }

    #[test]
    fn numeric_credit_fields_are_shown_literally() {
        let view = ResultsView::from_serialized(
            &json!({
                "ok": true,
                "data": {
                    "area_cultivo": { "hectares": "80", "creditos_por_ha": 1.5, "creditos_total": 120 },
                    "potencial_geracao": { "creditos_total": 6120 },
                    "valor_estimado": { "preco_credito": "5,00", "cultivo_anual": 600 },
                    "observacoes": "ok"
                }
            })
            .to_string(),
        );
        let breakdown = view.breakdown().expect("renderable");

        assert_eq!(breakdown.cultivated.hectares, "80 ha");
        assert_eq!(breakdown.cultivated.credits_per_hectare, "1.5");
        assert_eq!(breakdown.cultivated.credits_total, "120");
        assert_eq!(breakdown.total_potential, "6120");
        assert_eq!(breakdown.estimated_value.credit_price, "R$ 5,00");
        assert_eq!(breakdown.estimated_value.annual_cultivation, "R$600,00");
    }

    #[test]
    fn reading_does_not_consume_the_entry() {
        let store = InMemorySessionStore::new();
        store
            .set(API_RESPONSE_KEY, stored_response().to_string())
            .expect("set");

        let first = ResultsView::load(&store);
        let second = ResultsView::load(&store);
        assert_eq!(first, second);
        assert!(second.breakdown().is_some());
    }

    #[test]
    fn numbers_render_like_the_wire_value() {
        assert_eq!(format_number(80.0), "80");
        assert_eq!(format_number(80.25), "80.25");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(display_value(&json!(40.5)), "40.5");
        assert_eq!(display_value(&json!(80.0)), "80");
        assert_eq!(display_value(&json!(null)), "-");
    }
}
