use carbon_intake::markup::{document, escape_html};
use carbon_intake::workflows::eligibility::{
    IntakeController, IntakeField, NotificationVariant, BRAZILIAN_STATES, CULTIVATED_AREA_HINT,
    NATIVE_AREA_NO, NATIVE_AREA_YES, SOIL_TYPES,
};
use std::fmt::Write as _;

pub(crate) const FORM_PATH: &str = "/verificar";

pub(crate) fn landing_page() -> String {
    let mut body = String::new();
    body.push_str("<section class=\"hero\">\n");
    body.push_str("<h1>Transforme sua fazenda em fonte de créditos de carbono</h1>\n");
    body.push_str(
        "<p>Descubra em poucos minutos se sua propriedade é elegível ao financiamento.</p>\n",
    );
    writeln!(
        body,
        "<p><a class=\"cta\" href=\"{FORM_PATH}\">Verificar elegibilidade</a></p>"
    )
    .expect("landing call to action");
    body.push_str("</section>\n");
    document("Créditos de carbono para o agro", &body)
}

/// Intake form for the controller's current state.
pub(crate) fn intake_page(controller: &IntakeController) -> String {
    let mut body = String::new();
    body.push_str("<h1>Verifique sua elegibilidade</h1>\n");

    if let Some(notification) = controller.notification() {
        let class = match notification.variant {
            NotificationVariant::Default => "notice",
            NotificationVariant::Destructive => "notice notice-destructive",
        };
        writeln!(
            body,
            "<div class=\"{class}\" role=\"alert\"><strong>{}</strong> <span>{}</span></div>",
            escape_html(&notification.title),
            escape_html(&notification.description)
        )
        .expect("notification banner");
    }

    writeln!(
        body,
        "<form method=\"post\" action=\"{FORM_PATH}\" data-phase=\"{}\" novalidate>",
        controller.phase().label()
    )
    .expect("form open");
    for field in IntakeField::ALL {
        field_html(&mut body, controller, field);
    }

    let ready = controller.can_submit();
    writeln!(
        body,
        "<button type=\"submit\" data-ready=\"{ready}\">Verificar elegibilidade</button>"
    )
    .expect("submit button");
    body.push_str("</form>\n");

    document("Verificar elegibilidade", &body)
}

fn field_html(body: &mut String, controller: &IntakeController, field: IntakeField) {
    let name = field.wire_name();
    let value = controller.form().value(field);
    let error = controller.visible_error(field);

    writeln!(body, "<div class=\"field\">").expect("field wrapper");
    writeln!(
        body,
        "<label for=\"{name}\">{}</label>",
        escape_html(field.label())
    )
    .expect("field label");

    match field {
        IntakeField::FarmArea | IntakeField::CultivatedArea => {
            writeln!(
                body,
                "<input id=\"{name}\" name=\"{name}\" type=\"number\" step=\"any\" min=\"0\" value=\"{}\">",
                escape_html(value)
            )
            .expect("area input");
        }
        IntakeField::SoilType => {
            let options: Vec<(&str, &str)> = SOIL_TYPES.iter().map(|soil| (*soil, *soil)).collect();
            select_html(body, name, value, "Selecione o tipo de solo", &options);
        }
        IntakeField::State => {
            let options: Vec<(&str, &str)> = BRAZILIAN_STATES
                .iter()
                .map(|(code, state)| (*code, *state))
                .collect();
            select_html(body, name, value, "Selecione o estado", &options);
        }
        IntakeField::NativeArea => {
            for (option, label) in [(NATIVE_AREA_YES, "Sim"), (NATIVE_AREA_NO, "Não")] {
                let checked = if value == option { " checked" } else { "" };
                writeln!(
                    body,
                    "<label><input type=\"radio\" name=\"{name}\" value=\"{option}\"{checked}> {label}</label>"
                )
                .expect("native area radio");
            }
        }
        IntakeField::PlantingMethod => {
            writeln!(
                body,
                "<textarea id=\"{name}\" name=\"{name}\" rows=\"3\">{}</textarea>",
                escape_html(value)
            )
            .expect("planting method textarea");
        }
        IntakeField::Email => {
            writeln!(
                body,
                "<input id=\"{name}\" name=\"{name}\" type=\"email\" value=\"{}\">",
                escape_html(value)
            )
            .expect("email input");
        }
        IntakeField::Phone => {
            writeln!(
                body,
                "<input id=\"{name}\" name=\"{name}\" type=\"tel\" placeholder=\"(11) 98765-4321\" value=\"{}\">",
                escape_html(value)
            )
            .expect("phone input");
        }
        IntakeField::Location | IntakeField::City => {
            writeln!(
                body,
                "<input id=\"{name}\" name=\"{name}\" type=\"text\" value=\"{}\">",
                escape_html(value)
            )
            .expect("text input");
        }
    }

    if field == IntakeField::CultivatedArea && controller.shows_cultivated_area_hint() {
        writeln!(
            body,
            "<p class=\"hint\">{}</p>",
            escape_html(CULTIVATED_AREA_HINT)
        )
        .expect("cultivated area hint");
    }
    if let Some(message) = error {
        writeln!(
            body,
            "<p class=\"field-error\" id=\"{name}-erro\">{}</p>",
            escape_html(message)
        )
        .expect("field error");
    }
    body.push_str("</div>\n");
}

fn select_html(body: &mut String, name: &str, value: &str, prompt: &str, options: &[(&str, &str)]) {
    writeln!(body, "<select id=\"{name}\" name=\"{name}\">").expect("select open");
    writeln!(body, "<option value=\"\">{}</option>", escape_html(prompt)).expect("select prompt");
    for (option, label) in options {
        let selected = if value == *option { " selected" } else { "" };
        writeln!(
            body,
            "<option value=\"{}\"{selected}>{}</option>",
            escape_html(option),
            escape_html(label)
        )
        .expect("select option");
    }
    body.push_str("</select>\n");
}
