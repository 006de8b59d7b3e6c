//! Musician form

use atm_common::db::Musician;

use crate::form::{optional_date, optional_text, required_text, FormData, FormErrors};
use crate::pages;

#[derive(Debug, Clone)]
pub struct MusicianInput {
    pub name: String,
    pub full_name: String,
    pub born: Option<chrono::NaiveDate>,
    pub died: Option<chrono::NaiveDate>,
    pub place_of_birth: String,
    pub bio: Option<String>,
}

pub fn validate(form: &FormData) -> Result<MusicianInput, FormErrors> {
    let mut errors = FormErrors::new();
    let name = required_text(form, &mut errors, "name", Some(30));
    let full_name = required_text(form, &mut errors, "full_name", Some(50));
    let born = optional_date(form, &mut errors, "born");
    let died = optional_date(form, &mut errors, "died");
    let place_of_birth = required_text(form, &mut errors, "place_of_birth", Some(50));
    let bio = optional_text(form, "bio");

    if errors.is_empty() {
        Ok(MusicianInput {
            name,
            full_name,
            born,
            died,
            place_of_birth,
            bio,
        })
    } else {
        Err(errors)
    }
}

pub fn initial(musician: &Musician) -> FormData {
    let mut form = FormData::new()
        .with("name", &musician.name)
        .with("full_name", &musician.full_name)
        .with("place_of_birth", &musician.place_of_birth);
    if let Some(born) = musician.born {
        form.push("born", born.to_string());
    }
    if let Some(died) = musician.died {
        form.push("died", died.to_string());
    }
    if let Some(bio) = &musician.bio {
        form.push("bio", bio.clone());
    }
    form
}

pub fn fields(form: &FormData, errors: &FormErrors) -> Vec<String> {
    vec![
        pages::input("Name", "name", "text", form, errors),
        pages::input("Full name/Real name:", "full_name", "text", form, errors),
        pages::input("Born", "born", "date", form, errors),
        pages::input("Died", "died", "date", form, errors),
        pages::input("Place of birth", "place_of_birth", "text", form, errors),
        pages::textarea("Bio", "bio", form, errors),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_are_optional() {
        let form = FormData::new()
            .with("name", "Fenriz")
            .with("full_name", "Gylve Fenris Nagell")
            .with("place_of_birth", "Kolbotn");
        let input = validate(&form).unwrap();
        assert!(input.born.is_none());
        assert!(input.bio.is_none());
    }

    #[test]
    fn test_bad_date_rejected() {
        let form = FormData::new()
            .with("name", "Fenriz")
            .with("full_name", "Gylve Fenris Nagell")
            .with("born", "28/11/1971")
            .with("place_of_birth", "Kolbotn");
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.field("born"), ["Enter a valid date.".to_string()]);
    }
}
