//! Typed clinical input for the tabular melanoma classifier.
//!
//! The training pipeline one-hot encoded three categorical fields (sex,
//! lesion localization, confirmation method) next to a numeric age column.
//! Each enum value here knows the canonical schema column it maps to, so the
//! indicator key is derived from the type rather than assembled from strings
//! at call time. Display-form parsing accepts the localized strings the
//! dashboard presents ("extremidade inferior", "Histopatologia") as well as
//! the canonical ASCII keys.

use crate::core::errors::{DermError, DermResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Oldest age the clinical form accepts.
pub const MAX_AGE: f32 = 120.0;

/// Patient sex as recorded in the clinical dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    /// Every value, in schema column order.
    pub const ALL: [Sex; 3] = [Sex::Female, Sex::Male, Sex::Unknown];

    /// The indicator column this value sets to 1.
    pub fn column(&self) -> &'static str {
        match self {
            Sex::Male => "sex_male",
            Sex::Female => "sex_female",
            Sex::Unknown => "sex_unknown",
        }
    }
}

impl FromStr for Sex {
    type Err = DermError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "male" | "masculino" => Ok(Sex::Male),
            "female" | "feminino" => Ok(Sex::Female),
            "unknown" | "desconhecido" => Ok(Sex::Unknown),
            other => Err(DermError::validation(format!("unrecognized sex value '{other}'"))),
        }
    }
}

/// Anatomical site of the lesion; the fixed 15-value enumeration the model
/// was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Localization {
    Abdomen,
    Acral,
    Back,
    Chest,
    Ear,
    Face,
    Foot,
    Genital,
    Hand,
    LowerExtremity,
    Neck,
    Scalp,
    Trunk,
    Unknown,
    UpperExtremity,
}

impl Localization {
    /// Every value, in schema column order.
    pub const ALL: [Localization; 15] = [
        Localization::Abdomen,
        Localization::Acral,
        Localization::Back,
        Localization::Chest,
        Localization::Ear,
        Localization::Face,
        Localization::Foot,
        Localization::Genital,
        Localization::Hand,
        Localization::LowerExtremity,
        Localization::Neck,
        Localization::Scalp,
        Localization::Trunk,
        Localization::Unknown,
        Localization::UpperExtremity,
    ];

    /// The canonical ASCII key for this site (`lower_extremity`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            Localization::Abdomen => "abdomen",
            Localization::Acral => "acral",
            Localization::Back => "back",
            Localization::Chest => "chest",
            Localization::Ear => "ear",
            Localization::Face => "face",
            Localization::Foot => "foot",
            Localization::Genital => "genital",
            Localization::Hand => "hand",
            Localization::LowerExtremity => "lower_extremity",
            Localization::Neck => "neck",
            Localization::Scalp => "scalp",
            Localization::Trunk => "trunk",
            Localization::Unknown => "unknown",
            Localization::UpperExtremity => "upper_extremity",
        }
    }

    /// The indicator column this value sets to 1.
    pub fn column(&self) -> &'static str {
        match self {
            Localization::Abdomen => "localization_abdomen",
            Localization::Acral => "localization_acral",
            Localization::Back => "localization_back",
            Localization::Chest => "localization_chest",
            Localization::Ear => "localization_ear",
            Localization::Face => "localization_face",
            Localization::Foot => "localization_foot",
            Localization::Genital => "localization_genital",
            Localization::Hand => "localization_hand",
            Localization::LowerExtremity => "localization_lower_extremity",
            Localization::Neck => "localization_neck",
            Localization::Scalp => "localization_scalp",
            Localization::Trunk => "localization_trunk",
            Localization::Unknown => "localization_unknown",
            Localization::UpperExtremity => "localization_upper_extremity",
        }
    }
}

impl FromStr for Localization {
    type Err = DermError;

    /// Parses a localization from its canonical key, a spaced display form
    /// ("lower extremity"), or the localized display strings the dashboard
    /// shows ("extremidade inferior").
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "abdomen" | "abdômen" => Ok(Localization::Abdomen),
            "acral" | "acrál" => Ok(Localization::Acral),
            "back" | "costas" => Ok(Localization::Back),
            "chest" | "tórax" | "torax" => Ok(Localization::Chest),
            "ear" | "orelha" => Ok(Localization::Ear),
            "face" | "rosto" => Ok(Localization::Face),
            "foot" | "pé" | "pe" => Ok(Localization::Foot),
            "genital" => Ok(Localization::Genital),
            "hand" | "mão" | "mao" => Ok(Localization::Hand),
            "lower_extremity" | "extremidade_inferior" => Ok(Localization::LowerExtremity),
            "neck" | "pescoço" | "pescoco" => Ok(Localization::Neck),
            "scalp" | "couro_cabeludo" => Ok(Localization::Scalp),
            "trunk" | "tronco" => Ok(Localization::Trunk),
            "unknown" | "desconhecida" => Ok(Localization::Unknown),
            "upper_extremity" | "extremidade_superior" => Ok(Localization::UpperExtremity),
            other => Err(DermError::validation(format!(
                "unrecognized lesion localization '{other}'"
            ))),
        }
    }
}

/// How the initial diagnosis was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationMethod {
    Histopathology,
    FollowUp,
    Consensus,
    Confocal,
}

impl ConfirmationMethod {
    /// Every value, in schema column order.
    pub const ALL: [ConfirmationMethod; 4] = [
        ConfirmationMethod::Confocal,
        ConfirmationMethod::Consensus,
        ConfirmationMethod::FollowUp,
        ConfirmationMethod::Histopathology,
    ];

    /// The indicator column this value sets to 1.
    ///
    /// Column names keep the dataset's abbreviated spelling (`dx_type_histo`)
    /// rather than the display spelling, matching the trained schema.
    pub fn column(&self) -> &'static str {
        match self {
            ConfirmationMethod::Histopathology => "dx_type_histo",
            ConfirmationMethod::FollowUp => "dx_type_follow_up",
            ConfirmationMethod::Consensus => "dx_type_consensus",
            ConfirmationMethod::Confocal => "dx_type_confocal",
        }
    }
}

impl FromStr for ConfirmationMethod {
    type Err = DermError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "histo" | "histopathology" | "histopatologia" => Ok(ConfirmationMethod::Histopathology),
            "follow_up" | "acompanhamento" => Ok(ConfirmationMethod::FollowUp),
            "consensus" | "consenso" => Ok(ConfirmationMethod::Consensus),
            "confocal" => Ok(ConfirmationMethod::Confocal),
            other => Err(DermError::validation(format!(
                "unrecognized confirmation method '{other}'"
            ))),
        }
    }
}

/// One clinical observation, constructed per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    /// Patient age in years.
    pub age: f32,
    /// Patient sex.
    pub sex: Sex,
    /// Anatomical site of the lesion.
    pub localization: Localization,
    /// How the initial diagnosis was confirmed.
    pub confirmation: ConfirmationMethod,
}

impl ClinicalRecord {
    /// Checks the numeric fields; categorical fields are valid by type.
    pub fn validate(&self) -> DermResult<()> {
        if !self.age.is_finite() {
            return Err(DermError::validation("age must be a finite number"));
        }
        if self.age < 0.0 {
            return Err(DermError::validation(format!(
                "age must be non-negative, got {}",
                self.age
            )));
        }
        if self.age > MAX_AGE {
            return Err(DermError::validation(format!(
                "age must be at most {MAX_AGE}, got {}",
                self.age
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localization_parses_display_forms() {
        assert_eq!(
            "lower extremity".parse::<Localization>().unwrap(),
            Localization::LowerExtremity
        );
        assert_eq!(
            "extremidade inferior".parse::<Localization>().unwrap(),
            Localization::LowerExtremity
        );
        assert_eq!(
            "couro cabeludo".parse::<Localization>().unwrap(),
            Localization::Scalp
        );
        assert!("elbow".parse::<Localization>().is_err());
    }

    #[test]
    fn confirmation_method_parses_display_forms() {
        assert_eq!(
            "Histopatologia".parse::<ConfirmationMethod>().unwrap(),
            ConfirmationMethod::Histopathology
        );
        assert_eq!(
            "follow-up".parse::<ConfirmationMethod>().unwrap(),
            ConfirmationMethod::FollowUp
        );
        assert_eq!(
            ConfirmationMethod::Histopathology.column(),
            "dx_type_histo"
        );
    }

    #[test]
    fn sex_parses_both_languages() {
        assert_eq!("Masculino".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(Sex::Unknown.column(), "sex_unknown");
    }

    #[test]
    fn record_validation_bounds_age() {
        let mut record = ClinicalRecord {
            age: 55.0,
            sex: Sex::Male,
            localization: Localization::LowerExtremity,
            confirmation: ConfirmationMethod::FollowUp,
        };
        assert!(record.validate().is_ok());

        record.age = -1.0;
        assert!(record.validate().is_err());

        record.age = f32::NAN;
        assert!(record.validate().is_err());

        record.age = 200.0;
        assert!(record.validate().is_err());
    }
}
