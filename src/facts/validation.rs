use super::raw::{FactKey, RawFacts};

/// Validate the schema of a fact set.
/// Returns all validation errors at once (not just the first).
///
/// `prefix` is prepended to each field name, e.g. `"defaults"` yields
/// `defaults.contrast_ratio: ...`.
pub fn validate_facts(facts: &RawFacts, prefix: &str) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let field = |key: FactKey| {
        if prefix.is_empty() {
            key.name().to_string()
        } else {
            format!("{}.{}", prefix, key.name())
        }
    };

    for key in FactKey::ALL {
        let Some(value) = facts.get(key) else {
            continue;
        };

        if !value.is_finite() {
            errors.push(format!("{}: must be a finite number", field(key)));
            continue;
        }
        if value < 0.0 {
            errors.push(format!("{}: must be non-negative (got {})", field(key), value));
            continue;
        }

        match key {
            FactKey::ContrastRatio if !(1.0..=21.0).contains(&value) => {
                errors.push(format!(
                    "{}: must be between 1 and 21 (got {})",
                    field(key),
                    value
                ));
            }
            FactKey::ScrollDepth | FactKey::CtaClickRate if value > 100.0 => {
                errors.push(format!(
                    "{}: is a percentage, must be at most 100 (got {})",
                    field(key),
                    value
                ));
            }
            FactKey::HasLoadingAnimation if value != 0.0 && value != 1.0 => {
                errors.push(format!("{}: must be 0 or 1 (got {})", field(key), value));
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_facts(&RawFacts::defaults(), "").is_ok());
    }

    #[test]
    fn test_empty_facts_are_valid() {
        assert!(validate_facts(&RawFacts::default(), "").is_ok());
    }

    #[test]
    fn test_negative_value() {
        let mut facts = RawFacts::default();
        facts.set(FactKey::CtaWidth, -5.0);
        let errors = validate_facts(&facts, "").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("cta_width"));
    }

    #[test]
    fn test_contrast_out_of_range() {
        let mut facts = RawFacts::default();
        facts.set(FactKey::ContrastRatio, 0.5);
        let errors = validate_facts(&facts, "defaults").unwrap_err();
        assert!(errors[0].contains("defaults.contrast_ratio"));
    }

    #[test]
    fn test_percentage_and_flag() {
        let mut facts = RawFacts::default();
        facts.set(FactKey::ScrollDepth, 140.0);
        facts.set(FactKey::HasLoadingAnimation, 2.0);
        let errors = validate_facts(&facts, "").unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut facts = RawFacts::default();
        facts.set(FactKey::CtaPositionY, f64::NAN);
        facts.set(FactKey::TimeToCta, -1.0);
        facts.set(FactKey::ContrastRatio, 30.0);
        let errors = validate_facts(&facts, "").unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
