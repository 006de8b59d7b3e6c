//! Database models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Integer-coded choice enumeration
///
/// Stored as its code, displayed and serialized as its label. `parse` accepts
/// either form so HTML forms (codes) and API clients (labels) share one path.
pub trait Choice: Copy + Sized + 'static {
    fn all() -> &'static [Self];

    fn code(self) -> i32;

    fn label(self) -> &'static str;

    fn from_code(code: i32) -> Option<Self> {
        Self::all().iter().copied().find(|choice| choice.code() == code)
    }

    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(code) = input.parse::<i32>() {
            return Self::from_code(code);
        }
        Self::all()
            .iter()
            .copied()
            .find(|choice| choice.label().eq_ignore_ascii_case(input))
    }

    /// (code, label) pairs for drop-downs
    fn options() -> Vec<(String, String)> {
        Self::all()
            .iter()
            .map(|choice| (choice.code().to_string(), choice.label().to_string()))
            .collect()
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident = $code:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
        #[repr(i32)]
        pub enum $name {
            $($variant = $code,)+
        }

        impl Choice for $name {
            fn all() -> &'static [Self] {
                &[$($name::$variant,)+]
            }

            fn code(self) -> i32 {
                self as i32
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

choice_enum! {
    /// Band status
    pub enum BandStatus {
        Active = 1 => "active",
        OnHold = 2 => "on hold",
        SplitUp = 3 => "split-up",
        Unknown = 4 => "unknown",
        ChangedName = 5 => "changed name",
        Disputed = 6 => "disputed",
    }
}

choice_enum! {
    /// Label status
    pub enum LabelStatus {
        Active = 1 => "active",
        Closed = 2 => "closed",
        Unknown = 3 => "unknown",
    }
}

choice_enum! {
    /// Release type of an album
    pub enum AlbumType {
        FullLength = 1 => "Full-length",
        Ep = 2 => "EP/Mini-albums",
        Compilation = 3 => "Compilation",
        Single = 4 => "Single",
        Mixtape = 5 => "Mixtape",
        DjMix = 6 => "DJ Mix",
        Bootleg = 7 => "Bootleg/Unauthorized",
        Live = 8 => "Live album",
        Video = 9 => "Video",
        Soundtrack = 10 => "Soundtrack",
        Promo = 11 => "Promo",
    }
}

choice_enum! {
    /// Physical or digital media an album was released on
    pub enum MediaFormat {
        Cd = 1 => "CD",
        Vinyl = 2 => "vinyl",
        Cassette = 3 => "cassette",
        CdDvd = 4 => "CD/DVD",
        Digibook = 5 => "digibook",
        Digital = 6 => "digital",
        AllFormats = 7 => "all formats",
    }
}

/// Review rating in tenths of a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct Rating(pub i64);

impl Rating {
    pub fn tenths(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip)]
    pub password_salt: String,
    pub is_admin: bool,
    pub joined: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub country: String,
    pub status: LabelStatus,
    pub styles: String,
    pub founding_year: i64,
    pub added_by: Option<i64>,
    pub added: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Musician {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub born: Option<NaiveDate>,
    pub died: Option<NaiveDate>,
    pub place_of_birth: String,
    pub bio: Option<String>,
    pub added_by: Option<i64>,
    pub added: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Band {
    pub id: i64,
    pub name: String,
    pub country_of_origin: String,
    pub location: String,
    pub status: BandStatus,
    pub formed_in: i64,
    pub ended_in: Option<i64>,
    pub lyrical_themes: String,
    pub current_label_id: i64,
    pub bio: Option<String>,
    pub added_by: Option<i64>,
    pub added: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub band_id: i64,
    pub album_type: AlbumType,
    pub release_date: Option<NaiveDate>,
    pub catalog_id: String,
    pub label_id: i64,
    pub format: MediaFormat,
    pub added_by: Option<i64>,
    pub added: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub subject: String,
    pub rating: Rating,
    pub description: String,
    pub album_id: i64,
    pub band_id: i64,
    pub user_id: i64,
    pub added: DateTime<Utc>,
}

/// One tenure of a musician in a band
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Membership {
    pub id: i64,
    pub musician_id: i64,
    pub band_id: i64,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    pub role: String,
}
