//! Band form

use atm_common::db::{Band, BandStatus, Choice};

use super::{id_options, ids, RelatedChoices};
use crate::form::{
    optional_int, optional_text, required_choice, required_id, required_ids, required_int,
    required_text, FormData, FormErrors,
};
use crate::pages;

/// Genres and labels a band may reference, loaded per request
#[derive(Debug, Clone, Default)]
pub struct BandChoices {
    pub genres: RelatedChoices,
    pub labels: RelatedChoices,
}

#[derive(Debug, Clone)]
pub struct BandInput {
    pub name: String,
    pub country_of_origin: String,
    pub location: String,
    pub status: BandStatus,
    pub formed_in: i64,
    pub ended_in: Option<i64>,
    pub genre_ids: Vec<i64>,
    pub lyrical_themes: String,
    pub current_label_id: i64,
    pub bio: Option<String>,
}

pub fn validate(form: &FormData, choices: &BandChoices) -> Result<BandInput, FormErrors> {
    let mut errors = FormErrors::new();
    let name = required_text(form, &mut errors, "name", Some(50));
    let country_of_origin = required_text(form, &mut errors, "country_of_origin", Some(50));
    let location = required_text(form, &mut errors, "location", Some(50));
    let status = required_choice(form, &mut errors, "status", BandStatus::parse);
    let formed_in = required_int(form, &mut errors, "formed_in");
    let ended_in = optional_int(form, &mut errors, "ended_in");
    let genre_ids = required_ids(form, &mut errors, "genre", &ids(&choices.genres));
    let lyrical_themes = required_text(form, &mut errors, "lyrical_themes", Some(60));
    let current_label_id = required_id(form, &mut errors, "current_label", &ids(&choices.labels));
    let bio = optional_text(form, "bio");

    match (status, formed_in, current_label_id) {
        (Some(status), Some(formed_in), Some(current_label_id)) if errors.is_empty() => {
            Ok(BandInput {
                name,
                country_of_origin,
                location,
                status,
                formed_in,
                ended_in,
                genre_ids,
                lyrical_themes,
                current_label_id,
                bio,
            })
        }
        _ => Err(errors),
    }
}

pub fn initial(band: &Band, genre_ids: &[i64]) -> FormData {
    let mut form = FormData::new()
        .with("name", &band.name)
        .with("country_of_origin", &band.country_of_origin)
        .with("location", &band.location)
        .with("status", band.status.code())
        .with("formed_in", band.formed_in)
        .with("lyrical_themes", &band.lyrical_themes)
        .with("current_label", band.current_label_id);
    if let Some(ended_in) = band.ended_in {
        form.push("ended_in", ended_in.to_string());
    }
    if let Some(bio) = &band.bio {
        form.push("bio", bio.clone());
    }
    for id in genre_ids {
        form.push("genre", id.to_string());
    }
    form
}

pub fn fields(form: &FormData, errors: &FormErrors, choices: &BandChoices) -> Vec<String> {
    vec![
        pages::input("Name", "name", "text", form, errors),
        pages::input("Country of origin", "country_of_origin", "text", form, errors),
        pages::input("Location", "location", "text", form, errors),
        pages::select("Status", "status", &BandStatus::options(), form, errors),
        pages::input("Formed in", "formed_in", "number", form, errors),
        pages::input("Ended in", "ended_in", "number", form, errors),
        pages::checkboxes("Genre", "genre", &id_options(&choices.genres), form, errors),
        pages::input("Lyrical themes", "lyrical_themes", "text", form, errors),
        pages::select(
            "Current label",
            "current_label",
            &id_options(&choices.labels),
            form,
            errors,
        ),
        pages::textarea("Bio", "bio", form, errors),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> BandChoices {
        BandChoices {
            genres: vec![(1, "black metal".into()), (2, "doom".into())],
            labels: vec![(7, "Peaceville".into())],
        }
    }

    fn form_with_label(label: &str) -> FormData {
        FormData::new()
            .with("name", "Darkthrone")
            .with("country_of_origin", "Norway")
            .with("location", "Kolbotn")
            .with("status", "1")
            .with("formed_in", 1986)
            .with("genre", 1)
            .with("genre", 2)
            .with("lyrical_themes", "darkness")
            .with("current_label", label)
    }

    fn valid_form() -> FormData {
        form_with_label("7")
    }

    #[test]
    fn test_valid_band() {
        let input = validate(&valid_form(), &choices()).unwrap();
        assert_eq!(input.genre_ids, vec![1, 2]);
        assert_eq!(input.current_label_id, 7);
        assert_eq!(input.ended_in, None);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let errors = validate(&form_with_label("8"), &choices()).unwrap_err();
        assert!(errors.has("current_label"));
    }

    #[test]
    fn test_genre_required() {
        let mut form = FormData::new();
        for (key, value) in [
            ("name", "Darkthrone"),
            ("country_of_origin", "Norway"),
            ("location", "Kolbotn"),
            ("status", "1"),
            ("formed_in", "1986"),
            ("lyrical_themes", "darkness"),
            ("current_label", "7"),
        ] {
            form.push(key, value);
        }
        let errors = validate(&form, &choices()).unwrap_err();
        assert_eq!(errors.field("genre"), ["This field is required.".to_string()]);
    }

    #[test]
    fn test_fields_check_selected_genres() {
        let form = valid_form();
        let html = fields(&form, &FormErrors::new(), &choices()).join("");
        assert!(html.contains(r#"value="2" checked"#));
    }
}
