//! JSON records returned by the API
//!
//! Related rows are flattened to their display names: a band's label becomes
//! the label name, genre sets become lists of genre names.

use atm_common::db::{
    AlbumType, Band, BandStatus, Label, LabelStatus, MediaFormat, Musician, Rating,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::db::albums::AlbumSummary;
use crate::db::memberships::MembershipSummary;
use crate::db::reviews::ReviewSummary;

#[derive(Debug, Clone, Serialize)]
pub struct LabelRecord {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub country: String,
    pub status: LabelStatus,
    pub styles: String,
    pub founding_year: i64,
}

impl From<Label> for LabelRecord {
    fn from(label: Label) -> Self {
        Self {
            id: label.id,
            name: label.name,
            address: label.address,
            country: label.country,
            status: label.status,
            styles: label.styles,
            founding_year: label.founding_year,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MusicianRecord {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub born: Option<NaiveDate>,
    pub died: Option<NaiveDate>,
    pub place_of_birth: String,
    pub bio: Option<String>,
}

impl From<Musician> for MusicianRecord {
    fn from(musician: Musician) -> Self {
        Self {
            id: musician.id,
            name: musician.name,
            full_name: musician.full_name,
            born: musician.born,
            died: musician.died,
            place_of_birth: musician.place_of_birth,
            bio: musician.bio,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BandRecord {
    pub id: i64,
    pub name: String,
    pub country_of_origin: String,
    pub location: String,
    pub status: BandStatus,
    pub formed_in: i64,
    pub ended_in: Option<i64>,
    pub genre: Vec<String>,
    pub lyrical_themes: String,
    pub bio: Option<String>,
    pub current_label: String,
}

impl BandRecord {
    pub fn new(band: Band, genre: Vec<String>, current_label: String) -> Self {
        Self {
            id: band.id,
            name: band.name,
            country_of_origin: band.country_of_origin,
            location: band.location,
            status: band.status,
            formed_in: band.formed_in,
            ended_in: band.ended_in,
            genre,
            lyrical_themes: band.lyrical_themes,
            bio: band.bio,
            current_label,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumRecord {
    pub id: i64,
    pub title: String,
    pub genre: Vec<String>,
    #[serde(rename = "type")]
    pub album_type: AlbumType,
    pub release_date: Option<NaiveDate>,
    pub catalog_id: String,
    pub format: MediaFormat,
    pub band: String,
    pub label: String,
}

impl AlbumRecord {
    pub fn new(album: AlbumSummary, genre: Vec<String>) -> Self {
        Self {
            id: album.id,
            title: album.title,
            genre,
            album_type: album.album_type,
            release_date: album.release_date,
            catalog_id: album.catalog_id,
            format: album.format,
            band: album.band_name,
            label: album.label_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewRecord {
    pub id: i64,
    pub subject: String,
    pub rating: Rating,
    pub description: String,
    pub album: String,
    pub band: String,
    pub user: String,
}

impl From<ReviewSummary> for ReviewRecord {
    fn from(review: ReviewSummary) -> Self {
        Self {
            id: review.id,
            subject: review.subject,
            rating: review.rating,
            description: review.description,
            album: review.album_title,
            band: review.band_name,
            user: review.username,
        }
    }
}

/// Musician-to-band record; `nickname` is the stage name
#[derive(Debug, Clone, Serialize)]
pub struct MembershipRecord {
    pub id: i64,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    pub role: String,
    pub band: String,
    pub real_name: String,
    pub nickname: String,
}

impl From<MembershipSummary> for MembershipRecord {
    fn from(membership: MembershipSummary) -> Self {
        Self {
            id: membership.id,
            year_from: membership.year_from,
            year_to: membership.year_to,
            role: membership.role,
            band: membership.band_name,
            real_name: membership.musician_full_name,
            nickname: membership.musician_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_band_record_flattens_relations() {
        let now = Utc::now();
        let band = Band {
            id: 3,
            name: "Emperor".into(),
            country_of_origin: "Norway".into(),
            location: "Notodden".into(),
            status: BandStatus::SplitUp,
            formed_in: 1991,
            ended_in: Some(2001),
            lyrical_themes: "fantasy".into(),
            current_label_id: 9,
            bio: None,
            added_by: None,
            added: now,
            modified: now,
        };
        let record = BandRecord::new(band, vec!["black metal".into()], "Candlelight".into());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], json!("split-up"));
        assert_eq!(value["genre"], json!(["black metal"]));
        assert_eq!(value["current_label"], json!("Candlelight"));
    }

    #[test]
    fn test_album_type_serialized_as_type() {
        let album = AlbumSummary {
            id: 1,
            title: "Anthems".into(),
            band_id: 3,
            band_name: "Emperor".into(),
            label_id: 9,
            label_name: "Candlelight".into(),
            album_type: AlbumType::FullLength,
            release_date: NaiveDate::from_ymd_opt(1997, 3, 17),
            catalog_id: "CANDLE023".into(),
            format: MediaFormat::Cd,
            added: Utc::now(),
        };
        let value = serde_json::to_value(AlbumRecord::new(album, vec![])).unwrap();
        assert_eq!(value["type"], json!("Full-length"));
        assert_eq!(value["release_date"], json!("1997-03-17"));
        assert_eq!(value["band"], json!("Emperor"));
    }

    #[test]
    fn test_membership_names() {
        let record = MembershipRecord::from(MembershipSummary {
            id: 4,
            musician_id: 2,
            musician_name: "Ihsahn".into(),
            musician_full_name: "Vegard Sverre Tveitan".into(),
            band_id: 3,
            band_name: "Emperor".into(),
            year_from: Some(1991),
            year_to: None,
            role: "vocals".into(),
        });
        assert_eq!(record.nickname, "Ihsahn");
        assert_eq!(record.real_name, "Vegard Sverre Tveitan");
    }
}
