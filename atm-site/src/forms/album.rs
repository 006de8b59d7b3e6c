//! Album form

use atm_common::db::{Album, AlbumType, Choice, MediaFormat};
use chrono::NaiveDate;

use super::{id_options, ids, RelatedChoices};
use crate::form::{
    optional_date, required_choice, required_id, required_ids, required_text, FormData,
    FormErrors,
};
use crate::pages;

/// Bands, genres and labels an album may reference
#[derive(Debug, Clone, Default)]
pub struct AlbumChoices {
    pub bands: RelatedChoices,
    pub genres: RelatedChoices,
    pub labels: RelatedChoices,
}

#[derive(Debug, Clone)]
pub struct AlbumInput {
    pub title: String,
    pub band_id: i64,
    pub genre_ids: Vec<i64>,
    pub album_type: AlbumType,
    pub release_date: Option<NaiveDate>,
    pub catalog_id: String,
    pub label_id: i64,
    pub format: MediaFormat,
}

pub fn validate(form: &FormData, choices: &AlbumChoices) -> Result<AlbumInput, FormErrors> {
    let mut errors = FormErrors::new();
    let title = required_text(form, &mut errors, "title", Some(50));
    let band_id = required_id(form, &mut errors, "band", &ids(&choices.bands));
    let genre_ids = required_ids(form, &mut errors, "genre", &ids(&choices.genres));
    let album_type = required_choice(form, &mut errors, "type", AlbumType::parse);
    let release_date = optional_date(form, &mut errors, "release_date");
    let catalog_id = required_text(form, &mut errors, "catalog_id", Some(16));
    let label_id = required_id(form, &mut errors, "label", &ids(&choices.labels));
    let format = required_choice(form, &mut errors, "format", MediaFormat::parse);

    match (band_id, album_type, label_id, format) {
        (Some(band_id), Some(album_type), Some(label_id), Some(format)) if errors.is_empty() => {
            Ok(AlbumInput {
                title,
                band_id,
                genre_ids,
                album_type,
                release_date,
                catalog_id,
                label_id,
                format,
            })
        }
        _ => Err(errors),
    }
}

pub fn initial(album: &Album, genre_ids: &[i64]) -> FormData {
    let mut form = FormData::new()
        .with("title", &album.title)
        .with("band", album.band_id)
        .with("type", album.album_type.code())
        .with("catalog_id", &album.catalog_id)
        .with("label", album.label_id)
        .with("format", album.format.code());
    if let Some(date) = album.release_date {
        form.push("release_date", date.to_string());
    }
    for id in genre_ids {
        form.push("genre", id.to_string());
    }
    form
}

pub fn fields(form: &FormData, errors: &FormErrors, choices: &AlbumChoices) -> Vec<String> {
    vec![
        pages::input("Title", "title", "text", form, errors),
        pages::select("Band", "band", &id_options(&choices.bands), form, errors),
        pages::checkboxes("Genre", "genre", &id_options(&choices.genres), form, errors),
        pages::select("Type", "type", &AlbumType::options(), form, errors),
        pages::input("Release date", "release_date", "date", form, errors),
        pages::input("Catalog id", "catalog_id", "text", form, errors),
        pages::select("Label", "label", &id_options(&choices.labels), form, errors),
        pages::select("Format", "format", &MediaFormat::options(), form, errors),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> AlbumChoices {
        AlbumChoices {
            bands: vec![(3, "Emperor, Norway".into())],
            genres: vec![(1, "black metal".into())],
            labels: vec![(5, "Candlelight".into())],
        }
    }

    #[test]
    fn test_valid_album() {
        let form = FormData::new()
            .with("title", "Anthems to the Welkin at Dusk")
            .with("band", 3)
            .with("genre", 1)
            .with("type", "Full-length")
            .with("release_date", "1997-07-07")
            .with("catalog_id", "CANDLE023")
            .with("label", 5)
            .with("format", 1);
        let input = validate(&form, &choices()).unwrap();
        assert_eq!(input.album_type, AlbumType::FullLength);
        assert_eq!(input.format, MediaFormat::Cd);
        assert_eq!(input.release_date, NaiveDate::from_ymd_opt(1997, 7, 7));
    }

    #[test]
    fn test_catalog_id_length() {
        let form = FormData::new()
            .with("title", "Anthems")
            .with("band", 3)
            .with("genre", 1)
            .with("type", 1)
            .with("catalog_id", "CANDLE-023-REISSUE-2")
            .with("label", 5)
            .with("format", 1);
        let errors = validate(&form, &choices()).unwrap_err();
        assert!(errors.has("catalog_id"));
    }
}
