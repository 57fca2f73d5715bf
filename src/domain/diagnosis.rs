//! Typed diagnostic results for both inference paths.
//!
//! The tabular path yields a binary melanoma diagnosis derived from a single
//! probability; the image path yields a distribution over the seven lesion
//! types of the HAM10000 taxonomy, with the arg-max class reported as the
//! prediction.

use crate::core::errors::{DermError, DermResult};
use serde::{Deserialize, Serialize};

/// Decision threshold separating Melanoma from Non-Melanoma.
pub const MELANOMA_THRESHOLD: f32 = 0.5;

/// Binary outcome of the tabular melanoma classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    Melanoma,
    NonMelanoma,
}

impl Diagnosis {
    /// Derives the label from a melanoma probability; `Melanoma` iff the
    /// probability reaches [`MELANOMA_THRESHOLD`].
    pub fn from_probability(probability: f32) -> Self {
        if probability >= MELANOMA_THRESHOLD {
            Diagnosis::Melanoma
        } else {
            Diagnosis::NonMelanoma
        }
    }

    /// The label string the serving contract promises to callers.
    pub fn wire_label(&self) -> &'static str {
        match self {
            Diagnosis::Melanoma => "Melanoma",
            Diagnosis::NonMelanoma => "Não-Melanoma",
        }
    }
}

/// Result of one tabular prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    /// Thresholded label, consistent with `probability` by construction.
    pub diagnosis: Diagnosis,
    /// Probability of the positive (melanoma) class, in [0, 1].
    pub probability: f32,
}

impl DiagnosticResult {
    /// Builds a result from a melanoma probability, deriving the label.
    pub fn from_probability(probability: f32) -> Self {
        Self {
            diagnosis: Diagnosis::from_probability(probability),
            probability,
        }
    }
}

/// The seven lesion types, in the index order the CNN classifier emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LesionClass {
    /// Actinic keratoses and intraepithelial carcinoma.
    Akiec,
    /// Basal cell carcinoma.
    Bcc,
    /// Benign keratosis-like lesions.
    Bkl,
    /// Dermatofibroma.
    Df,
    /// Melanoma.
    Mel,
    /// Melanocytic nevus.
    Nv,
    /// Vascular lesion.
    Vasc,
}

impl LesionClass {
    /// Every class, in model output-vector order.
    pub const ALL: [LesionClass; 7] = [
        LesionClass::Akiec,
        LesionClass::Bcc,
        LesionClass::Bkl,
        LesionClass::Df,
        LesionClass::Mel,
        LesionClass::Nv,
        LesionClass::Vasc,
    ];

    /// Maps an output-vector position to its class.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The short dataset code (`akiec`, `bcc`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            LesionClass::Akiec => "akiec",
            LesionClass::Bcc => "bcc",
            LesionClass::Bkl => "bkl",
            LesionClass::Df => "df",
            LesionClass::Mel => "mel",
            LesionClass::Nv => "nv",
            LesionClass::Vasc => "vasc",
        }
    }

    /// Long-form clinical name, as presented to clinicians.
    pub fn full_name(&self) -> &'static str {
        match self {
            LesionClass::Akiec => "Ceratose Actínica",
            LesionClass::Bcc => "Carcinoma Basocelular",
            LesionClass::Bkl => "Ceratose Benigna",
            LesionClass::Df => "Dermatofibroma",
            LesionClass::Mel => "Melanoma",
            LesionClass::Nv => "Nevo Melanocítico",
            LesionClass::Vasc => "Lesão Vascular",
        }
    }
}

/// Probability distribution over the seven lesion classes.
///
/// Entries stay in model output order; probabilities are reported exactly as
/// the model produced them, without renormalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDistribution {
    entries: Vec<(LesionClass, f32)>,
    predicted: usize,
}

impl ClassDistribution {
    /// Builds a distribution from a model output vector.
    ///
    /// The vector must have exactly one entry per lesion class. The
    /// prediction is the arg-max position; ties break toward the lowest
    /// index.
    pub fn from_probabilities(probabilities: &[f32]) -> DermResult<Self> {
        if probabilities.len() != LesionClass::ALL.len() {
            return Err(DermError::unexpected_output(
                format!("{} class probabilities", LesionClass::ALL.len()),
                format!("{} values", probabilities.len()),
            ));
        }

        let mut predicted = 0;
        for (index, &p) in probabilities.iter().enumerate() {
            if p > probabilities[predicted] {
                predicted = index;
            }
        }

        let entries = LesionClass::ALL
            .iter()
            .zip(probabilities)
            .map(|(&class, &p)| (class, p))
            .collect();

        Ok(Self { entries, predicted })
    }

    /// All class probabilities, in model output order.
    pub fn probabilities(&self) -> &[(LesionClass, f32)] {
        &self.entries
    }

    /// Probability of one class.
    pub fn probability_of(&self, class: LesionClass) -> f32 {
        self.entries
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    /// The arg-max class with its confidence.
    pub fn predicted(&self) -> (LesionClass, f32) {
        self.entries[self.predicted]
    }

    /// Classes ordered by descending probability; equal probabilities keep
    /// model output order.
    pub fn ranked(&self) -> Vec<(LesionClass, f32)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnosis_threshold_is_inclusive() {
        assert_eq!(Diagnosis::from_probability(0.5), Diagnosis::Melanoma);
        assert_eq!(Diagnosis::from_probability(0.499_999), Diagnosis::NonMelanoma);
        assert_eq!(Diagnosis::from_probability(1.0), Diagnosis::Melanoma);
        assert_eq!(Diagnosis::from_probability(0.0), Diagnosis::NonMelanoma);
    }

    #[test]
    fn wire_labels_match_serving_contract() {
        assert_eq!(Diagnosis::Melanoma.wire_label(), "Melanoma");
        assert_eq!(Diagnosis::NonMelanoma.wire_label(), "Não-Melanoma");
    }

    #[test]
    fn distribution_reports_argmax() {
        let distribution =
            ClassDistribution::from_probabilities(&[0.05, 0.05, 0.05, 0.05, 0.6, 0.1, 0.1])
                .unwrap();
        let (class, confidence) = distribution.predicted();
        assert_eq!(class, LesionClass::Mel);
        assert!((confidence - 0.6).abs() < f32::EPSILON);
        assert_eq!(distribution.probabilities().len(), 7);
    }

    #[test]
    fn argmax_ties_break_toward_lowest_index() {
        let distribution =
            ClassDistribution::from_probabilities(&[0.2, 0.2, 0.1, 0.1, 0.2, 0.1, 0.1]).unwrap();
        assert_eq!(distribution.predicted().0, LesionClass::Akiec);
    }

    #[test]
    fn distribution_rejects_wrong_width() {
        assert!(ClassDistribution::from_probabilities(&[0.5, 0.5]).is_err());
    }

    #[test]
    fn ranking_is_descending() {
        let distribution =
            ClassDistribution::from_probabilities(&[0.05, 0.05, 0.05, 0.05, 0.6, 0.1, 0.1])
                .unwrap();
        let ranked = distribution.ranked();
        assert_eq!(ranked[0].0, LesionClass::Mel);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn class_index_table_is_fixed() {
        assert_eq!(LesionClass::from_index(0), Some(LesionClass::Akiec));
        assert_eq!(LesionClass::from_index(6), Some(LesionClass::Vasc));
        assert_eq!(LesionClass::from_index(7), None);
        assert_eq!(LesionClass::Nv.full_name(), "Nevo Melanocítico");
    }
}
