//! Review form

use atm_common::db::Review;

use crate::form::{required_id, required_rating, required_text, FormData, FormErrors};
use crate::pages;

#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub subject: String,
    /// Rating in tenths
    pub rating: i64,
    pub description: String,
}

pub fn validate(form: &FormData) -> Result<ReviewInput, FormErrors> {
    let mut errors = FormErrors::new();
    let subject = required_text(form, &mut errors, "subject", None);
    let rating = required_rating(form, &mut errors, "rating");
    let description = required_text(form, &mut errors, "description", None);

    match rating {
        Some(rating) if errors.is_empty() => Ok(ReviewInput {
            subject,
            rating,
            description,
        }),
        _ => Err(errors),
    }
}

/// Review plus the album and band it is about, as posted to the API
#[derive(Debug, Clone)]
pub struct ReviewTargetInput {
    pub review: ReviewInput,
    pub album_id: i64,
    pub band_id: i64,
}

pub fn validate_with_targets(
    form: &FormData,
    album_ids: &[i64],
    band_ids: &[i64],
) -> Result<ReviewTargetInput, FormErrors> {
    let (review, mut errors) = match validate(form) {
        Ok(review) => (Some(review), FormErrors::new()),
        Err(errors) => (None, errors),
    };
    let album_id = required_id(form, &mut errors, "album", album_ids);
    let band_id = required_id(form, &mut errors, "band", band_ids);

    match (review, album_id, band_id) {
        (Some(review), Some(album_id), Some(band_id)) if errors.is_empty() => {
            Ok(ReviewTargetInput {
                review,
                album_id,
                band_id,
            })
        }
        _ => Err(errors),
    }
}

pub fn initial(review: &Review) -> FormData {
    FormData::new()
        .with("subject", &review.subject)
        .with("rating", review.rating)
        .with("description", &review.description)
}

pub fn fields(form: &FormData, errors: &FormErrors) -> Vec<String> {
    vec![
        pages::input("Subject", "subject", "text", form, errors),
        pages::input("Rating", "rating", "text", form, errors),
        pages::textarea("Description", "description", form, errors),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_in_tenths() {
        let form = FormData::new()
            .with("subject", "Timeless")
            .with("rating", "9.5")
            .with("description", "Essential listening.");
        assert_eq!(validate(&form).unwrap().rating, 95);
    }

    #[test]
    fn test_rating_two_decimals_rejected() {
        let form = FormData::new()
            .with("subject", "Timeless")
            .with("rating", "9.25")
            .with("description", "Essential listening.");
        let errors = validate(&form).unwrap_err();
        assert!(errors.has("rating"));
    }

    #[test]
    fn test_targets_checked() {
        let form = FormData::new()
            .with("subject", "Timeless")
            .with("rating", "9")
            .with("description", "Essential listening.")
            .with("album", 4)
            .with("band", 1);
        let errors = validate_with_targets(&form, &[1, 2], &[1]).unwrap_err();
        assert!(errors.has("album"));
        assert!(!errors.has("band"));

        let input = validate_with_targets(&form, &[4], &[1]).unwrap();
        assert_eq!(input.album_id, 4);
        assert_eq!(input.review.rating, 90);
    }
}
