//! Genre form

use atm_common::db::Genre;

use crate::form::{required_text, FormData, FormErrors};
use crate::pages;

pub const NAME_MAX: usize = 30;

#[derive(Debug, Clone)]
pub struct GenreInput {
    pub name: String,
}

pub fn validate(form: &FormData) -> Result<GenreInput, FormErrors> {
    let mut errors = FormErrors::new();
    let name = required_text(form, &mut errors, "name", Some(NAME_MAX));

    if errors.is_empty() {
        Ok(GenreInput { name })
    } else {
        Err(errors)
    }
}

pub fn initial(genre: &Genre) -> FormData {
    FormData::new().with("name", &genre.name)
}

pub fn fields(form: &FormData, errors: &FormErrors) -> Vec<String> {
    vec![pages::input("Name", "name", "text", form, errors)]
}
