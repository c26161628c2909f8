use crate::classifier::{classify, mime_essence};
use aula_core::{AssetCategory, AssetFile, AssetPurpose, UploadLimits, ValidationError};

/// Content types expected for a known extension, `None` for unknown extensions.
fn expected_content_types(extension: &str) -> Option<&'static [&'static str]> {
    let expected: &'static [&'static str] = match extension {
        // Images
        "jpg" | "jpeg" => &["image/jpeg", "image/pjpeg"],
        "png" => &["image/png"],
        "gif" => &["image/gif"],
        "webp" => &["image/webp"],
        "svg" => &["image/svg+xml"],
        "bmp" => &["image/bmp"],
        "ico" => &["image/x-icon", "image/vnd.microsoft.icon"],
        // Videos
        "mp4" => &["video/mp4"],
        "webm" => &["video/webm"],
        "mov" => &["video/quicktime"],
        // Documents
        "pdf" => &["application/pdf"],
        "doc" => &["application/msword"],
        "docx" => &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
        "xls" => &["application/vnd.ms-excel"],
        "xlsx" => &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
        "ppt" => &["application/vnd.ms-powerpoint"],
        "pptx" => &["application/vnd.openxmlformats-officedocument.presentationml.presentation"],
        "txt" => &["text/plain"],
        "csv" => &["text/csv", "text/plain", "application/vnd.ms-excel"],
        "rtf" => &["application/rtf", "text/rtf"],
        "zip" => &["application/zip", "application/x-zip-compressed"],
        "rar" => &["application/vnd.rar", "application/x-rar-compressed"],
        _ => return None,
    };
    Some(expected)
}

/// Upload validator
///
/// The single validation step every upload surface goes through before the
/// router: emptiness, per-purpose category and size limits, filename sanity
/// and extension/content-type agreement.
#[derive(Debug, Clone, Default)]
pub struct UploadValidator {
    limits: UploadLimits,
}

impl UploadValidator {
    pub fn new(limits: UploadLimits) -> Self {
        Self { limits }
    }

    /// Effective size limit for a category uploaded for `purpose`
    pub fn max_size(&self, purpose: AssetPurpose, category: AssetCategory) -> usize {
        let purpose_limit = purpose.max_size_bytes();
        match self.limits.ceiling_for(category) {
            Some(ceiling) => purpose_limit.min(ceiling),
            None => purpose_limit,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize, max: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > max {
            return Err(ValidationError::FileTooLarge { size, max });
        }

        Ok(())
    }

    /// Validate the original filename
    pub fn validate_filename(&self, filename: &str) -> Result<(), ValidationError> {
        let trimmed = filename.trim();
        if trimmed.is_empty()
            || trimmed.contains(['/', '\\'])
            || trimmed == ".."
            || trimmed.chars().any(char::is_control)
        {
            return Err(ValidationError::InvalidFilename(filename.to_string()));
        }
        Ok(())
    }

    /// Validate that Content-Type matches the file extension
    ///
    /// Files without an extension, or with one not listed here, skip the check.
    pub fn validate_extension_content_type_match(
        &self,
        file: &AssetFile,
    ) -> Result<(), ValidationError> {
        let Some(extension) = file.extension() else {
            return Ok(());
        };

        let Some(expected) = expected_content_types(&extension) else {
            tracing::debug!(
                extension = %extension,
                content_type = %file.content_type,
                "Unknown extension, skipping Content-Type/extension cross-validation"
            );
            return Ok(());
        };

        let essence = mime_essence(&file.content_type);
        if !expected.contains(&essence.as_str()) {
            return Err(ValidationError::ContentTypeMismatch {
                content_type: file.content_type.clone(),
                extension,
                expected: expected.join(", "),
            });
        }

        Ok(())
    }

    /// Validate all aspects of a file for `purpose`, returning its category.
    ///
    /// Unsupported content types are returned as `AssetCategory::Unsupported`
    /// rather than an error, so the caller can report them with the
    /// category-specific message.
    pub fn validate(
        &self,
        file: &AssetFile,
        purpose: AssetPurpose,
    ) -> Result<AssetCategory, ValidationError> {
        let category = classify(&file.content_type);
        if !category.is_supported() {
            return Ok(category);
        }

        if file.size() == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if !purpose.accepts(category) {
            return Err(ValidationError::CategoryNotAllowed { category, purpose });
        }

        self.validate_file_size(file.size(), self.max_size(purpose, category))?;
        self.validate_filename(&file.filename)?;
        self.validate_extension_content_type_match(file)?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: usize = 1024 * 1024;

    fn file(name: &str, content_type: &str, size: usize) -> AssetFile {
        AssetFile::new(name, content_type, vec![0u8; size])
    }

    #[test]
    fn test_validate_ok() {
        let validator = UploadValidator::default();
        assert_eq!(
            validator
                .validate(&file("foto.png", "image/png", MB), AssetPurpose::Profile)
                .unwrap(),
            AssetCategory::Image
        );
        assert_eq!(
            validator
                .validate(
                    &file("acta.pdf", "application/pdf", 500 * 1024),
                    AssetPurpose::Documents
                )
                .unwrap(),
            AssetCategory::Document
        );
    }

    #[test]
    fn test_validate_empty_file() {
        let validator = UploadValidator::default();
        assert_eq!(
            validator.validate(&file("foto.png", "image/png", 0), AssetPurpose::Profile),
            Err(ValidationError::EmptyFile)
        );
    }

    #[test]
    fn test_validate_purpose_size_limit() {
        let validator = UploadValidator::default();
        assert_eq!(
            validator.validate(&file("foto.png", "image/png", 3 * MB), AssetPurpose::Avatars),
            Err(ValidationError::FileTooLarge {
                size: 3 * MB,
                max: 2 * MB
            })
        );
        // Backgrounds allow more
        assert!(validator
            .validate(&file("fondo.png", "image/png", 3 * MB), AssetPurpose::Backgrounds)
            .is_ok());
    }

    #[test]
    fn test_configured_ceiling_wins_when_lower() {
        let validator = UploadValidator::new(UploadLimits {
            max_image_size_bytes: MB,
            ..UploadLimits::default()
        });
        assert_eq!(validator.max_size(AssetPurpose::Backgrounds, AssetCategory::Image), MB);
        assert_eq!(validator.max_size(AssetPurpose::Avatars, AssetCategory::Image), MB);
        assert_eq!(
            validator.max_size(AssetPurpose::Documents, AssetCategory::Document),
            10 * MB
        );
    }

    #[test]
    fn test_validate_category_not_allowed() {
        let validator = UploadValidator::default();
        assert_eq!(
            validator.validate(&file("acta.pdf", "application/pdf", 10), AssetPurpose::Logos),
            Err(ValidationError::CategoryNotAllowed {
                category: AssetCategory::Document,
                purpose: AssetPurpose::Logos
            })
        );
        assert!(matches!(
            validator.validate(&file("foto.png", "image/png", 10), AssetPurpose::Documents),
            Err(ValidationError::CategoryNotAllowed { .. })
        ));
    }

    #[test]
    fn test_unsupported_is_reported_as_category() {
        let validator = UploadValidator::default();
        assert_eq!(
            validator
                .validate(
                    &file("setup.exe", "application/x-msdownload", 0),
                    AssetPurpose::General
                )
                .unwrap(),
            AssetCategory::Unsupported
        );
    }

    #[test]
    fn test_validate_filename() {
        let validator = UploadValidator::default();
        assert!(validator.validate_filename("foto.png").is_ok());
        assert!(validator.validate_filename("../foto.png").is_err());
        assert!(validator.validate_filename("C:\\fotos\\foto.png").is_err());
        assert!(validator.validate_filename("   ").is_err());
    }

    #[test]
    fn test_validate_extension_content_type_match() {
        let validator = UploadValidator::default();
        assert!(validator
            .validate_extension_content_type_match(&file("foto.JPG", "image/jpeg", 1))
            .is_ok());
        assert!(validator
            .validate_extension_content_type_match(&file("foto.jpg", "IMAGE/JPEG; q=1", 1))
            .is_ok());
        assert!(matches!(
            validator.validate_extension_content_type_match(&file("foto.jpg", "image/png", 1)),
            Err(ValidationError::ContentTypeMismatch { .. })
        ));
        assert!(matches!(
            validator.validate(&file("informe.pdf", "image/png", 1), AssetPurpose::Profile),
            Err(ValidationError::ContentTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_extension_skips_cross_check() {
        let validator = UploadValidator::default();
        assert!(validator
            .validate_extension_content_type_match(&file("foto.heic", "image/heic", 1))
            .is_ok());
        assert!(validator
            .validate_extension_content_type_match(&file("foto", "image/png", 1))
            .is_ok());
    }
}
