//! Musician-to-band membership form

use atm_common::db::Membership;

use super::{id_options, ids, RelatedChoices};
use crate::form::{optional_int, required_id, required_int, required_text, FormData, FormErrors};
use crate::pages;

/// Musicians and bands a membership may link
#[derive(Debug, Clone, Default)]
pub struct MembershipChoices {
    pub musicians: RelatedChoices,
    pub bands: RelatedChoices,
}

#[derive(Debug, Clone)]
pub struct MembershipInput {
    pub musician_id: i64,
    pub band_id: i64,
    pub year_from: i64,
    pub year_to: Option<i64>,
    pub role: String,
}

pub fn validate(
    form: &FormData,
    choices: &MembershipChoices,
) -> Result<MembershipInput, FormErrors> {
    let mut errors = FormErrors::new();
    let musician_id = required_id(form, &mut errors, "musician", &ids(&choices.musicians));
    let band_id = required_id(form, &mut errors, "band", &ids(&choices.bands));
    let year_from = required_int(form, &mut errors, "year_from");
    let year_to = optional_int(form, &mut errors, "year_to");
    let role = required_text(form, &mut errors, "role", Some(50));

    match (musician_id, band_id, year_from) {
        (Some(musician_id), Some(band_id), Some(year_from)) if errors.is_empty() => {
            Ok(MembershipInput {
                musician_id,
                band_id,
                year_from,
                year_to,
                role,
            })
        }
        _ => Err(errors),
    }
}

pub fn initial(membership: &Membership) -> FormData {
    let mut form = FormData::new()
        .with("musician", membership.musician_id)
        .with("band", membership.band_id)
        .with("role", &membership.role);
    if let Some(year_from) = membership.year_from {
        form.push("year_from", year_from.to_string());
    }
    if let Some(year_to) = membership.year_to {
        form.push("year_to", year_to.to_string());
    }
    form
}

pub fn fields(form: &FormData, errors: &FormErrors, choices: &MembershipChoices) -> Vec<String> {
    vec![
        pages::select(
            "Musician",
            "musician",
            &id_options(&choices.musicians),
            form,
            errors,
        ),
        pages::select("Band", "band", &id_options(&choices.bands), form, errors),
        pages::input("Year from", "year_from", "number", form, errors),
        pages::input("Year to", "year_to", "number", form, errors),
        pages::input("Role", "role", "text", form, errors),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_to_optional() {
        let choices = MembershipChoices {
            musicians: vec![(2, "Ihsahn, Vegard Sverre Tveitan".into())],
            bands: vec![(1, "Emperor, Norway".into())],
        };
        let form = FormData::new()
            .with("musician", 2)
            .with("band", 1)
            .with("year_from", 1991)
            .with("role", "vocals, guitars");
        let input = validate(&form, &choices).unwrap();
        assert_eq!(input.year_to, None);
        assert_eq!(input.year_from, 1991);
    }
}
