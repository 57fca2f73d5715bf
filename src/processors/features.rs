//! Clinical-record feature encoding against the trained column schema.
//!
//! Feature vectors are produced here and nowhere else. Column order comes
//! from the schema, never from the record, so a vector can only be built by
//! reordering into the schema, which is what keeps serving aligned with
//! training.

use crate::core::errors::{DermError, DermResult};
use crate::domain::record::ClinicalRecord;
use crate::domain::schema::ColumnSchema;
use ndarray::{Array1, Array2, Axis};
use std::collections::HashMap;

/// Name of the single numeric column.
pub const AGE_COLUMN: &str = "age";

/// What to do when a derived column key is absent from the schema.
///
/// The trained enumerations are fixed, so a missing key means the schema
/// artifact and the serving code have drifted apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaDriftPolicy {
    /// Leave the indicator at 0 and continue; drift is tolerated silently.
    #[default]
    Ignore,
    /// Fail the call with a validation error naming the missing column.
    Reject,
}

/// A schema-aligned numeric feature vector.
///
/// Length and column order exactly match the [`ColumnSchema`] it was encoded
/// against. The constructor is private to this module.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    /// The encoded values, in schema column order.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the vector holds no features.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The vector as a single-row `[1, features]` model input tensor.
    pub fn to_tensor(&self) -> Array2<f32> {
        Array1::from_vec(self.values.clone()).insert_axis(Axis(0))
    }
}

/// Encodes clinical records into schema-aligned feature vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder {
    policy: SchemaDriftPolicy,
}

impl FeatureEncoder {
    /// Creates an encoder with the given drift policy.
    pub fn new(policy: SchemaDriftPolicy) -> Self {
        Self { policy }
    }

    /// The configured drift policy.
    pub fn policy(&self) -> SchemaDriftPolicy {
        self.policy
    }

    /// Encodes a record into a vector aligned to `schema`.
    ///
    /// Every indicator starts at 0; the numeric `age` column and exactly one
    /// indicator each for sex, confirmation method, and localization are then
    /// set. Pure function of its inputs.
    pub fn encode(
        &self,
        record: &ClinicalRecord,
        schema: &ColumnSchema,
    ) -> DermResult<FeatureVector> {
        record.validate()?;

        let mut values = vec![0.0f32; schema.len()];
        self.set(&mut values, schema, AGE_COLUMN, record.age)?;
        self.set(&mut values, schema, record.sex.column(), 1.0)?;
        self.set(&mut values, schema, record.confirmation.column(), 1.0)?;
        self.set(&mut values, schema, record.localization.column(), 1.0)?;

        Ok(FeatureVector { values })
    }

    /// Reorders a raw name→value feature map into schema order.
    ///
    /// The key set must be exactly the schema's columns: a reordering, never
    /// a superset or subset. Indicator columns must be exactly 0 or 1; the
    /// `age` column must be a plausible age.
    pub fn align(
        &self,
        features: &HashMap<String, f64>,
        schema: &ColumnSchema,
    ) -> DermResult<FeatureVector> {
        for key in features.keys() {
            if !schema.contains(key) {
                return Err(DermError::validation(format!(
                    "unknown feature column '{key}'"
                )));
            }
        }

        let mut values = vec![0.0f32; schema.len()];
        for (index, column) in schema.iter().enumerate() {
            let &value = features.get(column).ok_or_else(|| {
                DermError::validation(format!("missing feature column '{column}'"))
            })?;
            if column == AGE_COLUMN {
                let age = value as f32;
                if !age.is_finite() || age < 0.0 || age > crate::domain::record::MAX_AGE {
                    return Err(DermError::validation(format!(
                        "age out of range: {value}"
                    )));
                }
                values[index] = age;
            } else {
                if value != 0.0 && value != 1.0 {
                    return Err(DermError::validation(format!(
                        "indicator column '{column}' must be 0 or 1, got {value}"
                    )));
                }
                values[index] = value as f32;
            }
        }

        Ok(FeatureVector { values })
    }

    fn set(
        &self,
        values: &mut [f32],
        schema: &ColumnSchema,
        column: &str,
        value: f32,
    ) -> DermResult<()> {
        match schema.position(column) {
            Some(index) => {
                values[index] = value;
                Ok(())
            }
            None => match self.policy {
                SchemaDriftPolicy::Ignore => {
                    tracing::debug!(column, "column absent from schema, indicator left at 0");
                    Ok(())
                }
                SchemaDriftPolicy::Reject => Err(DermError::validation(format!(
                    "column '{column}' is not part of the trained schema"
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{ConfirmationMethod, Localization, Sex};

    fn full_schema() -> ColumnSchema {
        let mut columns = vec![AGE_COLUMN.to_string()];
        columns.extend(ConfirmationMethod::ALL.iter().map(|m| m.column().to_string()));
        columns.extend(Sex::ALL.iter().map(|s| s.column().to_string()));
        columns.extend(Localization::ALL.iter().map(|l| l.column().to_string()));
        ColumnSchema::from_columns(columns).unwrap()
    }

    fn sample_record() -> ClinicalRecord {
        ClinicalRecord {
            age: 55.0,
            sex: Sex::Male,
            localization: Localization::LowerExtremity,
            confirmation: ConfirmationMethod::FollowUp,
        }
    }

    #[test]
    fn encode_sets_age_and_exactly_three_indicators() {
        let schema = full_schema();
        let encoder = FeatureEncoder::default();
        let vector = encoder.encode(&sample_record(), &schema).unwrap();

        assert_eq!(vector.len(), schema.len());
        let age_index = schema.position(AGE_COLUMN).unwrap();
        assert_eq!(vector.as_slice()[age_index], 55.0);

        let indicator_sum: f32 = vector
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != age_index)
            .map(|(_, v)| *v)
            .sum();
        assert_eq!(indicator_sum, 3.0);

        for column in ["sex_male", "dx_type_follow_up", "localization_lower_extremity"] {
            let index = schema.position(column).unwrap();
            assert_eq!(vector.as_slice()[index], 1.0, "expected {column} set");
        }
    }

    #[test]
    fn toggling_sex_flips_exactly_one_indicator_pair() {
        let schema = full_schema();
        let encoder = FeatureEncoder::default();

        let male = encoder.encode(&sample_record(), &schema).unwrap();
        let mut record = sample_record();
        record.sex = Sex::Female;
        let female = encoder.encode(&record, &schema).unwrap();

        let differing: Vec<usize> = male
            .as_slice()
            .iter()
            .zip(female.as_slice())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();

        assert_eq!(
            differing,
            vec![
                schema.position("sex_female").unwrap(),
                schema.position("sex_male").unwrap(),
            ]
        );
    }

    #[test]
    fn encode_is_deterministic() {
        let schema = full_schema();
        let encoder = FeatureEncoder::default();
        let first = encoder.encode(&sample_record(), &schema).unwrap();
        let second = encoder.encode(&sample_record(), &schema).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn drift_policy_controls_missing_columns() {
        // Schema missing every localization column.
        let mut columns = vec![AGE_COLUMN.to_string()];
        columns.extend(ConfirmationMethod::ALL.iter().map(|m| m.column().to_string()));
        columns.extend(Sex::ALL.iter().map(|s| s.column().to_string()));
        let schema = ColumnSchema::from_columns(columns).unwrap();

        let tolerant = FeatureEncoder::new(SchemaDriftPolicy::Ignore);
        let vector = tolerant.encode(&sample_record(), &schema).unwrap();
        let indicator_sum: f32 = vector.as_slice()[1..].iter().sum();
        assert_eq!(indicator_sum, 2.0);

        let strict = FeatureEncoder::new(SchemaDriftPolicy::Reject);
        assert!(strict.encode(&sample_record(), &schema).is_err());
    }

    #[test]
    fn encode_rejects_invalid_age_before_touching_schema() {
        let schema = full_schema();
        let encoder = FeatureEncoder::default();
        let mut record = sample_record();
        record.age = -3.0;
        assert!(matches!(
            encoder.encode(&record, &schema),
            Err(DermError::Validation { .. })
        ));
    }

    #[test]
    fn align_reorders_into_schema_order() {
        let schema = ColumnSchema::from_columns(["age", "sex_female", "sex_male"]).unwrap();
        let encoder = FeatureEncoder::default();

        let mut features = HashMap::new();
        features.insert("sex_male".to_string(), 1.0);
        features.insert("age".to_string(), 42.0);
        features.insert("sex_female".to_string(), 0.0);

        let vector = encoder.align(&features, &schema).unwrap();
        assert_eq!(vector.as_slice(), &[42.0, 0.0, 1.0]);
    }

    #[test]
    fn align_rejects_subset_and_superset() {
        let schema = ColumnSchema::from_columns(["age", "sex_female", "sex_male"]).unwrap();
        let encoder = FeatureEncoder::default();

        let mut missing = HashMap::new();
        missing.insert("age".to_string(), 42.0);
        assert!(encoder.align(&missing, &schema).is_err());

        let mut extra = HashMap::new();
        extra.insert("age".to_string(), 42.0);
        extra.insert("sex_female".to_string(), 0.0);
        extra.insert("sex_male".to_string(), 1.0);
        extra.insert("shoe_size".to_string(), 43.0);
        assert!(encoder.align(&extra, &schema).is_err());
    }

    #[test]
    fn align_rejects_non_binary_indicators() {
        let schema = ColumnSchema::from_columns(["age", "sex_female", "sex_male"]).unwrap();
        let encoder = FeatureEncoder::default();

        let mut features = HashMap::new();
        features.insert("age".to_string(), 42.0);
        features.insert("sex_female".to_string(), 0.3);
        features.insert("sex_male".to_string(), 0.7);
        assert!(encoder.align(&features, &schema).is_err());
    }

    #[test]
    fn vector_tensor_is_single_row() {
        let schema = full_schema();
        let encoder = FeatureEncoder::default();
        let vector = encoder.encode(&sample_record(), &schema).unwrap();
        let tensor = vector.to_tensor();
        assert_eq!(tensor.shape(), &[1, schema.len()]);
    }
}
