use crate::store::StoreError;

/// assessment id 定长补零，保证字典序与数值序一致
pub fn biomechanics_key(assessment_id: i64) -> Result<String, StoreError> {
    if assessment_id <= 0 {
        return Err(StoreError::Validation(format!(
            "assessmentId must be positive, got {assessment_id}"
        )));
    }
    Ok(format!("{:020}", assessment_id))
}

pub fn drill_key(drill_id: &str) -> Result<String, StoreError> {
    validate_key_segment("drill id", drill_id)?;
    Ok(drill_id.to_string())
}

pub fn drill_category_index_key(category: &str, drill_id: &str) -> Result<String, StoreError> {
    validate_key_segment("drill category", category)?;
    validate_key_segment("drill id", drill_id)?;
    Ok(format!("{}:{}", category.to_ascii_lowercase(), drill_id))
}

pub fn drill_category_prefix(category: &str) -> Result<String, StoreError> {
    validate_key_segment("drill category", category)?;
    Ok(format!("{}:", category.to_ascii_lowercase()))
}

fn validate_key_segment(label: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{label} must not be empty")));
    }
    if value.contains(':') {
        return Err(StoreError::Validation(format!(
            "{label} must not contain ':'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biomechanics_keys_sort_numerically() {
        let a = biomechanics_key(9).unwrap();
        let b = biomechanics_key(10).unwrap();
        assert!(a < b);
    }

    #[test]
    fn non_positive_assessment_rejected() {
        assert!(matches!(
            biomechanics_key(0),
            Err(StoreError::Validation(_))
        ));
        assert!(biomechanics_key(-3).is_err());
    }

    #[test]
    fn category_index_is_case_insensitive() {
        assert_eq!(
            drill_category_index_key("Pitching", "stride-drive").unwrap(),
            "pitching:stride-drive"
        );
        assert_eq!(drill_category_prefix("PITCHING").unwrap(), "pitching:");
    }

    #[test]
    fn separator_in_segment_rejected() {
        assert!(drill_key("a:b").is_err());
        assert!(drill_key("  ").is_err());
    }
}
