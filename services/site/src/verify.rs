use carbon_intake::error::AppError;
use carbon_intake::workflows::eligibility::{
    FarmIntakeForm, InMemorySessionStore, IntakeController, SubmitOutcome,
};
use carbon_intake::workflows::results::{results_text, ResultsView};
use carbon_intake::workflows::scoring::{AnalysisGateway, HttpAnalysisGateway};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_SITE_URL: &str = "http://127.0.0.1:3000";

#[derive(Args, Debug)]
pub(crate) struct VerifyArgs {
    /// Questionnaire as JSON keyed by the form field names (areaFazenda, areaCultivo, ...)
    #[arg(long)]
    pub(crate) form: PathBuf,
    /// Base URL of the running site whose analysis endpoint receives the request
    #[arg(long, default_value = DEFAULT_SITE_URL)]
    pub(crate) site: String,
}

pub(crate) async fn run_verification(args: VerifyArgs) -> Result<(), AppError> {
    let VerifyArgs { form, site } = args;

    let raw = std::fs::read_to_string(&form)?;
    let questionnaire: FarmIntakeForm = serde_json::from_str(&raw)?;
    let gateway = HttpAnalysisGateway::new(&site);
    debug!(endpoint = gateway.endpoint(), "verifying questionnaire");

    print!("{}", verify_questionnaire(&questionnaire, &gateway).await);
    Ok(())
}

/// Run one submission against `gateway` with a throwaway session and describe the outcome.
pub(crate) async fn verify_questionnaire<G>(form: &FarmIntakeForm, gateway: &G) -> String
where
    G: AnalysisGateway + ?Sized,
{
    let store = InMemorySessionStore::new();
    let mut controller = IntakeController::from_form(form);

    match controller.submit(gateway, &store).await {
        SubmitOutcome::Navigate(_) => results_text(&ResultsView::load(&store)),
        SubmitOutcome::Rejected(notification) => {
            let mut report = format!("{}: {}\n", notification.title, notification.description);
            for (field, message) in controller.errors() {
                writeln!(report, "- {}: {}", field.label(), message).expect("field error line");
            }
            report
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_intake::workflows::eligibility::IntakeField;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn questionnaire() -> FarmIntakeForm {
        serde_json::from_value(json!({
            "areaFazenda": "120",
            "areaCultivo": "80",
            "tipoSolo": "Arenoso",
            "localizacao": "Fazenda Boa Vista",
            "cidade": "Rio Verde",
            "estado": "GO",
            "areaNativa": "nao",
            "metodoPlantio": "Convencional",
            "email": "contato@boavista.agr.br",
            "telefone": "6432123456"
        }))
        .expect("questionnaire parses")
    }

    #[tokio::test]
    async fn accepted_questionnaire_prints_breakdown() {
        let site = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analise-fazenda"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "data": {
                    "area_cultivo": { "hectares": 80, "creditos_por_ha": "0.5–1.5", "creditos_total": "40–120" },
                    "area_desmatamento_evitado": { "hectares": 0, "creditos_por_ha": "0", "creditos_total": "0" },
                    "potencial_geracao": { "creditos_total": "40–120 tCO2e" },
                    "valor_estimado": {
                        "preco_credito": 5,
                        "cultivo_anual": "R$200.00–R$600.00",
                        "evitado_one_time": "R$0.00"
                    },
                    "observacoes": "Sem área nativa declarada."
                }
            })))
            .mount(&site)
            .await;

        let report = verify_questionnaire(&questionnaire(), &HttpAnalysisGateway::new(&site.uri())).await;

        assert!(report.contains("- Hectares: 80 ha"));
        assert!(report.contains("- Receita anual (cultivo): R$200,00–R$600,00"));

        let received = site.received_requests().await.expect("recording enabled");
        let sent: serde_json::Value = received[0].body_json().expect("json request");
        assert_eq!(sent["area_nativa"], json!(0.0));
        assert_eq!(sent["estado"], json!("Goiás"));
        assert_eq!(sent["telefone"], json!("6432123456"));
    }

    #[tokio::test]
    async fn unreachable_site_reports_connectivity_hint() {
        let gateway = HttpAnalysisGateway::new("http://127.0.0.1:9");

        let report = verify_questionnaire(&questionnaire(), &gateway).await;

        assert!(report.starts_with("Erro ao processar: Não foi possível conectar ao servidor."));
    }

    #[tokio::test]
    async fn invalid_questionnaire_lists_field_errors() {
        let mut form = questionnaire();
        form.set(IntakeField::CultivatedArea, "200");
        form.set(IntakeField::Email, "");

        let report = verify_questionnaire(&form, &HttpAnalysisGateway::new("http://127.0.0.1:9")).await;

        assert!(report.starts_with("Erro de validação:"));
        assert!(report.contains(&format!("- {}:", IntakeField::CultivatedArea.label())));
        assert!(report.contains("- E-mail do agricultor: Informe seu e-mail"));
    }
}
