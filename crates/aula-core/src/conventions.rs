//! Folder conventions for the local file store.
//!
//! Every asset purpose maps to exactly one folder segment under the local
//! store root, together with the categories it accepts, its size limit and
//! the shape of the reference written back to the owning entity.
//!
//! Bare-filename references already in storage are resolved through this
//! table, so a folder change re-points every one of them. Bump
//! [`CONVENTION_VERSION`] whenever a folder segment changes.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::AssetCategory;
use crate::urls::without_query;

pub const CONVENTION_VERSION: u32 = 1;

const MB: usize = 1024 * 1024;

/// Logical role of an asset within the intranet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetPurpose {
    /// User profile photo
    Profile,
    Avatars,
    Courses,
    Grades,
    /// College logo (configuration asset)
    Logos,
    /// Login screen background (configuration asset)
    Backgrounds,
    Documents,
    General,
}

/// One row of the convention table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurposeConvention {
    pub purpose: AssetPurpose,
    /// Folder segment under the local store root, without slashes
    pub folder: &'static str,
    pub accepts: &'static [AssetCategory],
    pub max_size_bytes: usize,
    /// Local references are written as `folder/filename` instead of a bare filename.
    ///
    /// Set for logos and backgrounds, whose legacy rows were stored in that
    /// shape. Both accept only images, which go to the CDN, so through
    /// `AssetService` the flag only shapes uploads handed to the router
    /// directly. Keep it in step with the stored data.
    pub qualified_reference: bool,
}

const IMAGES: &[AssetCategory] = &[AssetCategory::Image];
const DOCUMENTS: &[AssetCategory] = &[AssetCategory::Document];
const ANY: &[AssetCategory] = &[
    AssetCategory::Image,
    AssetCategory::Document,
    AssetCategory::Video,
];

static PROFILE: PurposeConvention = PurposeConvention {
    purpose: AssetPurpose::Profile,
    folder: "profile",
    accepts: IMAGES,
    max_size_bytes: 2 * MB,
    qualified_reference: false,
};

static AVATARS: PurposeConvention = PurposeConvention {
    purpose: AssetPurpose::Avatars,
    folder: "avatars",
    accepts: IMAGES,
    max_size_bytes: 2 * MB,
    qualified_reference: false,
};

static COURSES: PurposeConvention = PurposeConvention {
    purpose: AssetPurpose::Courses,
    folder: "courses",
    accepts: IMAGES,
    max_size_bytes: 5 * MB,
    qualified_reference: false,
};

static GRADES: PurposeConvention = PurposeConvention {
    purpose: AssetPurpose::Grades,
    folder: "grades",
    accepts: IMAGES,
    max_size_bytes: 5 * MB,
    qualified_reference: false,
};

static LOGOS: PurposeConvention = PurposeConvention {
    purpose: AssetPurpose::Logos,
    folder: "logos",
    accepts: IMAGES,
    max_size_bytes: 2 * MB,
    qualified_reference: true,
};

static BACKGROUNDS: PurposeConvention = PurposeConvention {
    purpose: AssetPurpose::Backgrounds,
    folder: "backgrounds",
    accepts: IMAGES,
    max_size_bytes: 10 * MB,
    qualified_reference: true,
};

static DOCUMENTS_FOLDER: PurposeConvention = PurposeConvention {
    purpose: AssetPurpose::Documents,
    folder: "documents",
    accepts: DOCUMENTS,
    max_size_bytes: 10 * MB,
    qualified_reference: false,
};

static GENERAL: PurposeConvention = PurposeConvention {
    purpose: AssetPurpose::General,
    folder: "general",
    accepts: ANY,
    max_size_bytes: 10 * MB,
    qualified_reference: false,
};

/// Placeholder filenames that stand for "no real asset".
pub const SENTINEL_FILENAMES: &[&str] = &[
    "default-avatar.png",
    "default-profile.png",
    "default-logo.png",
    "default-background.jpg",
    "default.png",
    "default.jpg",
    "avatar.png",
    "user.png",
    "no-image.png",
];

impl AssetPurpose {
    pub const ALL: [AssetPurpose; 8] = [
        AssetPurpose::Profile,
        AssetPurpose::Avatars,
        AssetPurpose::Courses,
        AssetPurpose::Grades,
        AssetPurpose::Logos,
        AssetPurpose::Backgrounds,
        AssetPurpose::Documents,
        AssetPurpose::General,
    ];

    pub fn convention(self) -> &'static PurposeConvention {
        match self {
            AssetPurpose::Profile => &PROFILE,
            AssetPurpose::Avatars => &AVATARS,
            AssetPurpose::Courses => &COURSES,
            AssetPurpose::Grades => &GRADES,
            AssetPurpose::Logos => &LOGOS,
            AssetPurpose::Backgrounds => &BACKGROUNDS,
            AssetPurpose::Documents => &DOCUMENTS_FOLDER,
            AssetPurpose::General => &GENERAL,
        }
    }

    pub fn folder(self) -> &'static str {
        self.convention().folder
    }

    pub fn accepts(self, category: AssetCategory) -> bool {
        self.convention().accepts.contains(&category)
    }

    pub fn max_size_bytes(self) -> usize {
        self.convention().max_size_bytes
    }

    /// Purpose whose folder segment is `segment`, if any.
    pub fn from_folder(segment: &str) -> Option<AssetPurpose> {
        Self::ALL
            .into_iter()
            .find(|purpose| purpose.folder().eq_ignore_ascii_case(segment))
    }

    pub fn as_str(&self) -> &'static str {
        self.folder()
    }
}

impl Display for AssetPurpose {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetPurpose {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "profile" | "profile-photo" => Ok(AssetPurpose::Profile),
            "avatar" | "avatars" => Ok(AssetPurpose::Avatars),
            "course" | "courses" => Ok(AssetPurpose::Courses),
            "grade" | "grades" => Ok(AssetPurpose::Grades),
            "logo" | "logos" | "college-logo" => Ok(AssetPurpose::Logos),
            "background" | "backgrounds" | "login-background" => Ok(AssetPurpose::Backgrounds),
            "document" | "documents" => Ok(AssetPurpose::Documents),
            "general" | "generic" => Ok(AssetPurpose::General),
            _ => Err(anyhow::anyhow!("Invalid asset purpose: {}", s)),
        }
    }
}

/// Whether `reference` points at a placeholder rather than a real asset.
///
/// Matches on the last path segment, ignoring query string, fragment and case,
/// so URL and folder-qualified forms of a sentinel are recognized too.
pub fn is_sentinel(reference: &str) -> bool {
    let filename = without_query(reference.trim())
        .rsplit('/')
        .next()
        .unwrap_or_default();

    !filename.is_empty()
        && SENTINEL_FILENAMES
            .iter()
            .any(|sentinel| sentinel.eq_ignore_ascii_case(filename))
}
