//! Entity forms
//!
//! Each form module validates submitted [`FormData`](crate::form::FormData)
//! into a typed input, builds the initial values for an update page and
//! renders its fields. The JSON API reuses the same validation.

pub mod accounts;
pub mod album;
pub mod band;
pub mod genre;
pub mod label;
pub mod membership;
pub mod musician;
pub mod review;

/// Related rows offered in a drop-down or checkbox list: (id, display name)
pub type RelatedChoices = Vec<(i64, String)>;

/// Convert related choices to widget options
pub fn id_options(choices: &[(i64, String)]) -> Vec<(String, String)> {
    choices
        .iter()
        .map(|(id, name)| (id.to_string(), name.clone()))
        .collect()
}

/// Ids offered by a choice list
pub fn ids(choices: &[(i64, String)]) -> Vec<i64> {
    choices.iter().map(|(id, _)| *id).collect()
}
