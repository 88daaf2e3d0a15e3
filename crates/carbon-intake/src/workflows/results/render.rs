use std::fmt::Write as _;

use super::view::{AnalysisBreakdown, AreaSection, ResultsView};
use crate::markup::{document, escape_html};

const FORM_PATH: &str = "/verificar";

/// Full results page for the site.
pub fn results_page(view: &ResultsView) -> String {
    match view {
        ResultsView::Ready(breakdown) => {
            document("Resultado da análise", &breakdown_html(breakdown))
        }
        ResultsView::Unavailable => document("Erro ao processar dados", &unavailable_html()),
    }
}

fn unavailable_html() -> String {
    let mut html = String::new();
    html.push_str("<section class=\"result-error\">\n");
    html.push_str("<h1>Erro ao processar dados</h1>\n");
    html.push_str(
        "<p>Não foi possível carregar os resultados. Por favor, tente novamente.</p>\n",
    );
    writeln!(
        html,
        "<p><a href=\"{FORM_PATH}\">Voltar para o formulário</a></p>"
    )
    .expect("back link");
    html.push_str("</section>\n");
    html
}

fn area_html(html: &mut String, title: &str, subtitle: &str, section: &AreaSection, units: (&str, &str)) {
    writeln!(html, "<section>\n<h2>{}</h2>", escape_html(title)).expect("area heading");
    writeln!(html, "<p>{}</p>", escape_html(subtitle)).expect("area subtitle");
    html.push_str("<dl>\n");
    writeln!(
        html,
        "<dt>Hectares</dt><dd>{}</dd>",
        escape_html(&section.hectares)
    )
    .expect("hectares row");
    writeln!(
        html,
        "<dt>Créditos por ha</dt><dd>{} <small>{}</small></dd>",
        escape_html(&section.credits_per_hectare),
        units.0
    )
    .expect("credits per ha row");
    writeln!(
        html,
        "<dt>Total</dt><dd>{} <small>{}</small></dd>",
        escape_html(&section.credits_total),
        units.1
    )
    .expect("credits total row");
    html.push_str("</dl>\n</section>\n");
}

fn breakdown_html(breakdown: &AnalysisBreakdown) -> String {
    let mut html = String::new();
    html.push_str("<header>\n<h1>Análise Concluída com Sucesso!</h1>\n");
    html.push_str("<p>Sua propriedade foi analisada e aqui estão os resultados estimados de geração de créditos de carbono.</p>\n</header>\n");

    area_html(
        &mut html,
        "Área de Cultivo",
        "Créditos de carbono por sequestro no solo",
        &breakdown.cultivated,
        ("tCO2e/ha/ano", "tCO2e/ano"),
    );
    area_html(
        &mut html,
        "Área de Desmatamento Evitado",
        "Créditos por preservação de estoque de carbono",
        &breakdown.avoided_deforestation,
        ("tCO2e/ha", "tCO2e"),
    );

    html.push_str("<section>\n<h2>Potencial Total de Geração</h2>\n");
    writeln!(
        html,
        "<p class=\"highlight\">{}</p>",
        escape_html(&breakdown.total_potential)
    )
    .expect("total potential");
    html.push_str("<p>Somatório: cultivo (anual) + desmatamento evitado (estoque)</p>\n</section>\n");

    let value = &breakdown.estimated_value;
    html.push_str("<section>\n<h2>Valor Estimado</h2>\n");
    writeln!(
        html,
        "<p>Preço médio por crédito: {}</p>",
        escape_html(&value.credit_price)
    )
    .expect("credit price");
    writeln!(
        html,
        "<h3>Receita Potencial Anual (Cultivo):</h3>\n<p class=\"highlight\">{}</p>\n<p><small>Fluxo recorrente (anual)</small></p>",
        escape_html(&value.annual_cultivation)
    )
    .expect("annual revenue");
    writeln!(
        html,
        "<h3>Receita por Desmatamento Evitado:</h3>\n<p class=\"highlight\">{}</p>\n<p><small>Venda tipicamente única ou por período de credenciamento</small></p>",
        escape_html(&value.avoided_deforestation)
    )
    .expect("avoided revenue");
    if let Some(note) = &value.note {
        writeln!(html, "<p><small>{}</small></p>", escape_html(note)).expect("value note");
    }
    html.push_str("</section>\n");

    html.push_str("<section>\n<h2>Observações e Recomendações</h2>\n");
    for paragraph in breakdown
        .observations
        .split('\n')
        .filter(|line| !line.trim().is_empty())
    {
        writeln!(html, "<p>{}</p>", escape_html(paragraph.trim())).expect("observation paragraph");
    }
    html.push_str("</section>\n");

    writeln!(
        html,
        "<nav>\n<a href=\"/\">Início</a>\n<a href=\"{FORM_PATH}\">Fazer nova análise</a>\n</nav>"
    )
    .expect("result links");
    html
}

/// Plain-text rendering for the command line.
pub fn results_text(view: &ResultsView) -> String {
    let Some(breakdown) = view.breakdown() else {
        return "Erro ao processar dados: não foi possível carregar os resultados.\n".to_string();
    };

    let mut text = String::new();
    writeln!(text, "Análise concluída").expect("text heading");
    for (title, section) in [
        ("Área de cultivo", &breakdown.cultivated),
        ("Área de desmatamento evitado", &breakdown.avoided_deforestation),
    ] {
        writeln!(text, "\n{title}").expect("text section title");
        writeln!(text, "- Hectares: {}", section.hectares).expect("text hectares");
        writeln!(text, "- Créditos por ha: {}", section.credits_per_hectare)
            .expect("text credits per ha");
        writeln!(text, "- Total: {}", section.credits_total).expect("text credits total");
    }

    let value = &breakdown.estimated_value;
    writeln!(text, "\nPotencial total de geração: {}", breakdown.total_potential)
        .expect("text potential");
    writeln!(text, "\nValor estimado (preço médio {})", value.credit_price)
        .expect("text credit price");
    writeln!(text, "- Receita anual (cultivo): {}", value.annual_cultivation)
        .expect("text annual revenue");
    writeln!(
        text,
        "- Receita por desmatamento evitado: {}",
        value.avoided_deforestation
    )
    .expect("text avoided revenue");
    if let Some(note) = &value.note {
        writeln!(text, "- {note}").expect("text note");
    }
    writeln!(text, "\nObservações\n{}", breakdown.observations).expect("text observations");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::results::view::ValueSection;

    fn breakdown() -> AnalysisBreakdown {
        AnalysisBreakdown {
            cultivated: AreaSection {
                hectares: "80 ha".to_string(),
                credits_per_hectare: "0.5–1.5".to_string(),
                credits_total: "40–120".to_string(),
            },
            avoided_deforestation: AreaSection {
                hectares: "40 ha".to_string(),
                credits_per_hectare: "150–225".to_string(),
                credits_total: "6000–9000".to_string(),
            },
            total_potential: "6040–9120 tCO2e".to_string(),
            estimated_value: ValueSection {
                credit_price: "R$ 5.00".to_string(),
                annual_cultivation: "R$200,00–R$600,00".to_string(),
                avoided_deforestation: "R$30.000,00–R$45.000,00".to_string(),
                note: Some("Valores <indicativos>".to_string()),
            },
            observations: "Linha um\n\nLinha dois".to_string(),
        }
    }

    #[test]
    fn unavailable_page_links_back_to_form() {
        let html = results_page(&ResultsView::Unavailable);
        assert!(html.contains("Erro ao processar dados"));
        assert!(html.contains("href=\"/verificar\""));
        assert!(!html.contains("Área de Cultivo"));
    }

    #[test]
    fn ready_page_renders_sections_and_escapes_text() {
        let html = results_page(&ResultsView::Ready(breakdown()));
        assert!(html.contains("<dd>80 ha</dd>"));
        assert!(html.contains("R$30.000,00–R$45.000,00"));
        assert!(html.contains("Valores &lt;indicativos&gt;"));
        assert!(html.contains("<p>Linha um</p>"));
        assert!(html.contains("<p>Linha dois</p>"));
        assert_eq!(html.matches("<section>").count(), 5);
    }

    #[test]
    fn text_rendering_lists_every_section() {
        let text = results_text(&ResultsView::Ready(breakdown()));
        assert!(text.contains("- Hectares: 80 ha"));
        assert!(text.contains("Potencial total de geração: 6040–9120 tCO2e"));
        assert!(text.contains("- Receita anual (cultivo): R$200,00–R$600,00"));
        assert!(text.ends_with("Linha um\n\nLinha dois\n"));

        let missing = results_text(&ResultsView::Unavailable);
        assert!(missing.starts_with("Erro ao processar dados"));
    }
}
