use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::domain::{
    is_soil_type, is_state_code, parse_hectares, FarmIntakeForm, IntakeField, NATIVE_AREA_NO,
    NATIVE_AREA_YES,
};
use super::phone::digits_only;

/// Minimum cultivated area financed, in hectares.
pub const MINIMUM_CULTIVATED_HECTARES: f64 = 30.0;

pub const MSG_FARM_AREA: &str = "A área da fazenda deve ser maior que 0";
pub const MSG_CULTIVATED_MINIMUM: &str = "Aceitamos apenas área de cultivo a partir de 30 ha.";
pub const MSG_CULTIVATED_EXCEEDS_FARM: &str =
    "A área de cultivo não pode ser maior que a área total da fazenda.";
pub const MSG_SOIL_TYPE: &str = "Selecione o tipo de solo";
pub const MSG_LOCATION: &str = "Informe a localização ou coordenadas";
pub const MSG_CITY: &str = "Informe a cidade";
pub const MSG_STATE: &str = "Selecione o estado";
pub const MSG_NATIVE_AREA: &str = "Selecione se possui área nativa";
pub const MSG_PLANTING_METHOD: &str = "Descreva o método de plantio";
pub const MSG_EMAIL_MISSING: &str = "Informe seu e-mail";
pub const MSG_EMAIL_INVALID: &str = "E-mail inválido";
pub const MSG_PHONE_MISSING: &str = "Informe seu telefone";
pub const MSG_PHONE_INVALID: &str = "Telefone inválido (deve ter 10 ou 11 dígitos)";

/// Hint shown under the cultivated area while the entry is below the financing threshold.
pub const CULTIVATED_AREA_HINT: &str =
    "No momento financiamos produtores com 30 ha ou mais em área de cultivo.";

/// Field-scoped error messages keyed by field.
pub type ValidationErrors = BTreeMap<IntakeField, String>;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

/// Validate one field against the current form snapshot.
///
/// `value` is the field's candidate value; `form` supplies the other fields, which matters only
/// for the cultivated area (compared against the snapshot's farm area, whether or not that value
/// is itself valid).
pub fn validate_field(
    field: IntakeField,
    value: &str,
    form: &FarmIntakeForm,
) -> Option<&'static str> {
    match field {
        IntakeField::FarmArea => match parse_hectares(value) {
            Some(area) if area > 0.0 => None,
            _ => Some(MSG_FARM_AREA),
        },
        IntakeField::CultivatedArea => {
            let cultivated = match parse_hectares(value) {
                Some(area) if area >= MINIMUM_CULTIVATED_HECTARES => area,
                _ => return Some(MSG_CULTIVATED_MINIMUM),
            };
            match parse_hectares(&form.farm_area) {
                Some(farm) if cultivated > farm => Some(MSG_CULTIVATED_EXCEEDS_FARM),
                _ => None,
            }
        }
        IntakeField::SoilType => (!is_soil_type(value)).then_some(MSG_SOIL_TYPE),
        IntakeField::Location => value.trim().is_empty().then_some(MSG_LOCATION),
        IntakeField::City => value.trim().is_empty().then_some(MSG_CITY),
        IntakeField::State => (!is_state_code(value)).then_some(MSG_STATE),
        IntakeField::NativeArea => {
            (value != NATIVE_AREA_YES && value != NATIVE_AREA_NO).then_some(MSG_NATIVE_AREA)
        }
        IntakeField::PlantingMethod => value.trim().is_empty().then_some(MSG_PLANTING_METHOD),
        IntakeField::Email => {
            if value.trim().is_empty() {
                Some(MSG_EMAIL_MISSING)
            } else if !email_pattern().is_match(value) {
                Some(MSG_EMAIL_INVALID)
            } else {
                None
            }
        }
        IntakeField::Phone => {
            if value.trim().is_empty() {
                return Some(MSG_PHONE_MISSING);
            }
            let digits = digits_only(value).len();
            (!(10..=11).contains(&digits)).then_some(MSG_PHONE_INVALID)
        }
    }
}

/// Run every field validation against the form.
pub fn validate_form(form: &FarmIntakeForm) -> ValidationErrors {
    IntakeField::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(field, form.value(field), form).map(|msg| (field, msg.to_string()))
        })
        .collect()
}

/// Whole-form validity. Both the submit guard and the submit-button state go through here.
pub fn is_form_valid(form: &FarmIntakeForm) -> bool {
    IntakeField::ALL
        .into_iter()
        .all(|field| validate_field(field, form.value(field), form).is_none())
}

/// A form that passed whole-form validation. Only obtainable through [`ValidatedIntake::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedIntake {
    form: FarmIntakeForm,
    farm_area: f64,
    cultivated_area: f64,
}

impl ValidatedIntake {
    pub fn new(form: FarmIntakeForm) -> Result<Self, ValidationErrors> {
        let errors = validate_form(&form);
        let (true, Some(farm_area), Some(cultivated_area)) = (
            errors.is_empty(),
            parse_hectares(&form.farm_area),
            parse_hectares(&form.cultivated_area),
        ) else {
            return Err(errors);
        };

        Ok(Self {
            form,
            farm_area,
            cultivated_area,
        })
    }

    pub fn form(&self) -> &FarmIntakeForm {
        &self.form
    }

    pub fn farm_area(&self) -> f64 {
        self.farm_area
    }

    pub fn cultivated_area(&self) -> f64 {
        self.cultivated_area
    }

    pub fn into_form(self) -> FarmIntakeForm {
        self.form
    }
}

/// Whether the below-threshold hint should accompany the cultivated area input.
pub fn shows_cultivated_area_hint(form: &FarmIntakeForm) -> bool {
    !form.cultivated_area.is_empty()
        && parse_hectares(&form.cultivated_area)
            .is_some_and(|area| area < MINIMUM_CULTIVATED_HECTARES)
}
