use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::workflows::eligibility::domain::FarmIntakeForm;
use crate::workflows::eligibility::normalizer::FarmAnalysisRequest;
use crate::workflows::eligibility::store::{SessionStore, StoreError};
use crate::workflows::scoring::{AnalysisGateway, GatewayError, ProxyReply};

/// Questionnaire for the reference farm: 120 ha, 80 ha cultivated, native area declared.
pub(super) fn sample_form() -> FarmIntakeForm {
    FarmIntakeForm {
        farm_area: "120".to_string(),
        cultivated_area: "80".to_string(),
        soil_type: "Argiloso".to_string(),
        location: "-22.7, -47.6".to_string(),
        city: "Piracicaba".to_string(),
        state: "SP".to_string(),
        native_area: "sim".to_string(),
        planting_method: "Plantio direto".to_string(),
        email: "a@b.com".to_string(),
        phone: "11987654321".to_string(),
    }
}

pub(super) fn analysis_body() -> Value {
    json!({
        "ok": true,
        "stored": true,
        "response_id": "resp-001",
        "data": {
            "area_cultivo": {
                "hectares": 80,
                "creditos_por_ha": "0.5–1.5",
                "creditos_total": "40–120"
            },
            "area_desmatamento_evitado": {
                "hectares": 40,
                "creditos_por_ha": "150–225",
                "creditos_total": "6000–9000"
            },
            "potencial_geracao": { "creditos_total": "6040–9120 tCO2e" },
            "valor_estimado": {
                "preco_credito": 5,
                "cultivo_anual": "R$200.00–R$600.00",
                "evitado_one_time": "R$30000.00–R$45000.00",
                "observacao": "Valores indicativos."
            },
            "observacoes": "Estimativa preliminar."
        }
    })
}

/// Gateway answering every request with a fixed reply and recording what it received.
pub(super) struct ScriptedGateway {
    reply: ProxyReply,
    received: Mutex<Vec<FarmAnalysisRequest>>,
}

impl ScriptedGateway {
    pub(super) fn replying(status: StatusCode, body: Value) -> Self {
        Self {
            reply: ProxyReply::new(status, body),
            received: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn received(&self) -> Vec<FarmAnalysisRequest> {
        self.received.lock().expect("gateway mutex").clone()
    }
}

#[async_trait]
impl AnalysisGateway for ScriptedGateway {
    async fn submit(&self, request: &FarmAnalysisRequest) -> Result<ProxyReply, GatewayError> {
        self.received
            .lock()
            .expect("gateway mutex")
            .push(request.clone());
        Ok(self.reply.clone())
    }
}

/// Gateway that can never reach the proxy endpoint.
pub(super) struct UnreachableGateway;

#[async_trait]
impl AnalysisGateway for UnreachableGateway {
    async fn submit(&self, _request: &FarmAnalysisRequest) -> Result<ProxyReply, GatewayError> {
        Err(GatewayError::Connect("connection refused".to_string()))
    }
}

/// Gateway whose request encoding fails before anything is sent.
pub(super) struct UnencodableGateway;

#[async_trait]
impl AnalysisGateway for UnencodableGateway {
    async fn submit(&self, _request: &FarmAnalysisRequest) -> Result<ProxyReply, GatewayError> {
        let err = serde_json::from_str::<Value>("{").expect_err("truncated json");
        Err(GatewayError::Encode(err))
    }
}

/// Store whose writes always fail.
pub(super) struct ReadOnlyStore;

impl SessionStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}
