//! Label form

use atm_common::db::{Choice, Label, LabelStatus};

use crate::form::{required_choice, required_int, required_text, FormData, FormErrors};
use crate::pages;

#[derive(Debug, Clone)]
pub struct LabelInput {
    pub name: String,
    pub address: String,
    pub country: String,
    pub status: LabelStatus,
    pub styles: String,
    pub founding_year: i64,
}

pub fn validate(form: &FormData) -> Result<LabelInput, FormErrors> {
    let mut errors = FormErrors::new();
    let name = required_text(form, &mut errors, "name", Some(40));
    let address = required_text(form, &mut errors, "address", Some(128));
    let country = required_text(form, &mut errors, "country", Some(30));
    let status = required_choice(form, &mut errors, "status", LabelStatus::parse);
    let styles = required_text(form, &mut errors, "styles", Some(128));
    let founding_year = required_int(form, &mut errors, "founding_year");

    match (status, founding_year) {
        (Some(status), Some(founding_year)) if errors.is_empty() => Ok(LabelInput {
            name,
            address,
            country,
            status,
            styles,
            founding_year,
        }),
        _ => Err(errors),
    }
}

pub fn initial(label: &Label) -> FormData {
    FormData::new()
        .with("name", &label.name)
        .with("address", &label.address)
        .with("country", &label.country)
        .with("status", label.status.code())
        .with("styles", &label.styles)
        .with("founding_year", label.founding_year)
}

pub fn fields(form: &FormData, errors: &FormErrors) -> Vec<String> {
    vec![
        pages::input("Name", "name", "text", form, errors),
        pages::input("Address", "address", "text", form, errors),
        pages::input("Country", "country", "text", form, errors),
        pages::select("Status", "status", &LabelStatus::options(), form, errors),
        pages::input("Styles", "styles", "text", form, errors),
        pages::input("Founding year", "founding_year", "number", form, errors),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_label() {
        let form = FormData::new()
            .with("name", "Nuclear Blast")
            .with("address", "Donzdorf")
            .with("country", "Germany")
            .with("status", "active")
            .with("styles", "metal")
            .with("founding_year", 1987);
        let input = validate(&form).unwrap();
        assert_eq!(input.status, LabelStatus::Active);
        assert_eq!(input.founding_year, 1987);
    }

    #[test]
    fn test_founding_year_must_be_integer() {
        let form = FormData::new()
            .with("name", "Nuclear Blast")
            .with("address", "Donzdorf")
            .with("country", "Germany")
            .with("status", "1")
            .with("styles", "metal")
            .with("founding_year", "late eighties");
        let errors = validate(&form).unwrap_err();
        assert!(errors.has("founding_year"));
    }
}
