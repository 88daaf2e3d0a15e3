use std::fmt;

use serde::{Deserialize, Serialize};

/// Soil classifications offered by the questionnaire.
pub const SOIL_TYPES: [&str; 7] = [
    "Argiloso",
    "Arenoso",
    "Siltoso",
    "Latossolo",
    "Cambissolo",
    "Neossolo",
    "Não sei / Outro",
];

/// Brazilian federative units accepted by the questionnaire, with the full name the scoring
/// service expects.
pub const BRAZILIAN_STATES: [(&str, &str); 27] = [
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

/// Radio values for the native vegetation question.
pub const NATIVE_AREA_YES: &str = "sim";
pub const NATIVE_AREA_NO: &str = "nao";

pub fn is_soil_type(value: &str) -> bool {
    SOIL_TYPES.contains(&value)
}

pub fn is_state_code(value: &str) -> bool {
    BRAZILIAN_STATES.iter().any(|(code, _)| *code == value)
}

/// Full Portuguese name for a two-letter state code.
pub fn state_name(code: &str) -> Option<&'static str> {
    BRAZILIAN_STATES
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, name)| *name)
}

/// Questionnaire fields, in the order they appear on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntakeField {
    #[serde(rename = "areaFazenda")]
    FarmArea,
    #[serde(rename = "areaCultivo")]
    CultivatedArea,
    #[serde(rename = "tipoSolo")]
    SoilType,
    #[serde(rename = "localizacao")]
    Location,
    #[serde(rename = "cidade")]
    City,
    #[serde(rename = "estado")]
    State,
    #[serde(rename = "areaNativa")]
    NativeArea,
    #[serde(rename = "metodoPlantio")]
    PlantingMethod,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "telefone")]
    Phone,
}

impl IntakeField {
    pub const ALL: [IntakeField; 10] = [
        IntakeField::FarmArea,
        IntakeField::CultivatedArea,
        IntakeField::SoilType,
        IntakeField::Location,
        IntakeField::City,
        IntakeField::State,
        IntakeField::NativeArea,
        IntakeField::PlantingMethod,
        IntakeField::Email,
        IntakeField::Phone,
    ];

    /// Name used by form posts, element ids, and stored snapshots.
    pub const fn wire_name(self) -> &'static str {
        match self {
            IntakeField::FarmArea => "areaFazenda",
            IntakeField::CultivatedArea => "areaCultivo",
            IntakeField::SoilType => "tipoSolo",
            IntakeField::Location => "localizacao",
            IntakeField::City => "cidade",
            IntakeField::State => "estado",
            IntakeField::NativeArea => "areaNativa",
            IntakeField::PlantingMethod => "metodoPlantio",
            IntakeField::Email => "email",
            IntakeField::Phone => "telefone",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }

    pub const fn label(self) -> &'static str {
        match self {
            IntakeField::FarmArea => "Área da fazenda (ha)",
            IntakeField::CultivatedArea => "Área de cultivo (ha)",
            IntakeField::SoilType => "Tipo de solo",
            IntakeField::Location => "Localização (coordenadas ou endereço)",
            IntakeField::City => "Cidade",
            IntakeField::State => "Estado (UF)",
            IntakeField::NativeArea => "Possui área nativa?",
            IntakeField::PlantingMethod => "Método de plantio",
            IntakeField::Email => "E-mail do agricultor",
            IntakeField::Phone => "Telefone do agricultor",
        }
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Raw questionnaire state as typed by the visitor. Every value is kept as entered; parsing
/// happens in validation and normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmIntakeForm {
    #[serde(rename = "areaFazenda", default)]
    pub farm_area: String,
    #[serde(rename = "areaCultivo", default)]
    pub cultivated_area: String,
    #[serde(rename = "tipoSolo", default)]
    pub soil_type: String,
    #[serde(rename = "localizacao", default)]
    pub location: String,
    #[serde(rename = "cidade", default)]
    pub city: String,
    #[serde(rename = "estado", default)]
    pub state: String,
    #[serde(rename = "areaNativa", default)]
    pub native_area: String,
    #[serde(rename = "metodoPlantio", default)]
    pub planting_method: String,
    #[serde(rename = "email", default)]
    pub email: String,
    #[serde(rename = "telefone", default)]
    pub phone: String,
}

impl FarmIntakeForm {
    pub fn value(&self, field: IntakeField) -> &str {
        match field {
            IntakeField::FarmArea => &self.farm_area,
            IntakeField::CultivatedArea => &self.cultivated_area,
            IntakeField::SoilType => &self.soil_type,
            IntakeField::Location => &self.location,
            IntakeField::City => &self.city,
            IntakeField::State => &self.state,
            IntakeField::NativeArea => &self.native_area,
            IntakeField::PlantingMethod => &self.planting_method,
            IntakeField::Email => &self.email,
            IntakeField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: IntakeField, value: impl Into<String>) {
        let slot = match field {
            IntakeField::FarmArea => &mut self.farm_area,
            IntakeField::CultivatedArea => &mut self.cultivated_area,
            IntakeField::SoilType => &mut self.soil_type,
            IntakeField::Location => &mut self.location,
            IntakeField::City => &mut self.city,
            IntakeField::State => &mut self.state,
            IntakeField::NativeArea => &mut self.native_area,
            IntakeField::PlantingMethod => &mut self.planting_method,
            IntakeField::Email => &mut self.email,
            IntakeField::Phone => &mut self.phone,
        };
        *slot = value.into();
    }
}

/// Parse a numeric questionnaire entry. Surrounding whitespace is ignored; NaN and infinities
/// are treated as unparseable.
pub fn parse_hectares(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
