use super::domain::{EmploymentType, InterviewType, SalaryRange};
use super::error::PipelineError;

pub(crate) fn required(value: &str, field: &str) -> Result<String, PipelineError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn salary_range(min: i64, max: i64) -> Result<SalaryRange, PipelineError> {
    if min < 0 {
        return Err(PipelineError::Validation(
            "salary_min must not be negative".to_string(),
        ));
    }
    if min > max {
        return Err(PipelineError::Validation(format!(
            "salary_min ({min}) must not exceed salary_max ({max})"
        )));
    }
    Ok(SalaryRange { min, max })
}

pub(crate) fn employment_type(raw: &str) -> Result<EmploymentType, PipelineError> {
    EmploymentType::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = EmploymentType::ALLOWED
            .iter()
            .map(|kind| kind.label())
            .collect();
        PipelineError::Validation(format!(
            "employment type '{}' must be one of {}",
            raw.trim(),
            allowed.join(", ")
        ))
    })
}

/// In-person interviews need somewhere to go; remote ones may carry a link or nothing.
pub(crate) fn interview_location(
    kind: InterviewType,
    location: Option<String>,
) -> Result<Option<String>, PipelineError> {
    let location = location
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    if kind == InterviewType::InPerson && location.is_none() {
        return Err(PipelineError::Validation(
            "location is required for in-person interviews".to_string(),
        ));
    }
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_range_enforces_ordering_and_sign() {
        assert_eq!(
            salary_range(50_000, 80_000).expect("valid range"),
            SalaryRange {
                min: 50_000,
                max: 80_000
            }
        );
        assert!(salary_range(0, 0).is_ok());
        assert!(matches!(
            salary_range(90_000, 80_000),
            Err(PipelineError::Validation(_))
        ));
        assert!(matches!(
            salary_range(-1, 10),
            Err(PipelineError::Validation(_))
        ));
    }

    #[test]
    fn interview_location_required_only_in_person() {
        assert!(matches!(
            interview_location(InterviewType::InPerson, Some("  ".to_string())),
            Err(PipelineError::Validation(_))
        ));
        assert_eq!(
            interview_location(InterviewType::Video, None).expect("remote ok"),
            None
        );
        assert_eq!(
            interview_location(InterviewType::InPerson, Some(" Shop 4 ".to_string()))
                .expect("in person ok"),
            Some("Shop 4".to_string())
        );
    }

    #[test]
    fn employment_type_error_lists_allowed_values() {
        match employment_type("gig") {
            Err(PipelineError::Validation(message)) => {
                assert!(message.contains("apprenticeship"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
