use serde::{Deserialize, Serialize};

use super::domain::{state_name, NATIVE_AREA_YES};
use super::phone::digits_only;
use super::validation::ValidatedIntake;

/// Request body expected by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmAnalysisRequest {
    pub area_total: f64,
    pub area_cultivo: f64,
    pub tipo_solo: String,
    pub cidade: String,
    pub estado: String,
    pub area_nativa: f64,
    pub metodo_plantio: String,
    pub email: String,
    pub telefone: String,
}

impl FarmAnalysisRequest {
    /// Build the scoring payload from a validated questionnaire.
    ///
    /// Native area is the farm area minus the cultivated area when the farmer declared native
    /// vegetation. Validation rejects a cultivated area above the farm area, so the difference is
    /// never negative for a validated form.
    pub fn from_intake(intake: &ValidatedIntake) -> Self {
        let form = intake.form();
        let area_nativa = if form.native_area == NATIVE_AREA_YES {
            intake.farm_area() - intake.cultivated_area()
        } else {
            0.0
        };

        Self {
            area_total: intake.farm_area(),
            area_cultivo: intake.cultivated_area(),
            tipo_solo: form.soil_type.clone(),
            cidade: form.city.clone(),
            estado: state_name(&form.state)
                .map(str::to_string)
                .unwrap_or_else(|| form.state.clone()),
            area_nativa,
            metodo_plantio: form.planting_method.clone(),
            email: form.email.clone(),
            telefone: digits_only(&form.phone),
        }
    }
}

impl From<&ValidatedIntake> for FarmAnalysisRequest {
    fn from(intake: &ValidatedIntake) -> Self {
        Self::from_intake(intake)
    }
}
