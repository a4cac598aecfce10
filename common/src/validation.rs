use validator::{Validate, ValidationErrors};

/// Joins every field message into one `; `-separated line, sorted by field name
/// so output is stable.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(m) => m.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Runs `validate()` and flattens any failure into a single message.
pub fn check<T: Validate>(value: &T) -> Result<(), String> {
    value.validate().map_err(|e| format_validation_errors(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, message = "Course name is required"))]
        course_name: String,
        #[validate(range(min = 1, max = 120))]
        minutes: i64,
    }

    #[test]
    fn joins_messages_and_names_fields_without_one() {
        let form = Form {
            course_name: String::new(),
            minutes: 0,
        };
        let msg = check(&form).unwrap_err();
        assert_eq!(msg, "Course name is required; minutes is invalid");
    }

    #[test]
    fn valid_input_passes() {
        let form = Form {
            course_name: "Databases".into(),
            minutes: 10,
        };
        assert!(check(&form).is_ok());
    }
}
