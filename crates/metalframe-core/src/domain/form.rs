use super::{ImageUpload, LocalizedText};
use crate::error::{FormField, ValidationError};

/// Raw values of the admin post form.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title_en: String,
    pub title_uk: String,
    pub description_en: String,
    pub description_uk: String,
    pub image: Option<ImageUpload>,
}

/// Form contents that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub image: Option<ImageUpload>,
}

impl PostForm {
    /// Check required fields. An image is required only when creating.
    ///
    /// Fields are checked in form order (image, title, description) and the
    /// first failure is reported.
    pub fn validate(self, creating: bool) -> Result<ValidatedPost, ValidationError> {
        let image = self.image.filter(|image| !image.is_empty());
        if creating && image.is_none() {
            return Err(ValidationError::new(FormField::Image));
        }

        let (title_en, title_uk) = (self.title_en.trim(), self.title_uk.trim());
        if title_en.is_empty() || title_uk.is_empty() {
            return Err(ValidationError::new(FormField::Title));
        }

        let (description_en, description_uk) =
            (self.description_en.trim(), self.description_uk.trim());
        if description_en.is_empty() || description_uk.is_empty() {
            return Err(ValidationError::new(FormField::Description));
        }

        Ok(ValidatedPost {
            title: LocalizedText::translations(title_en, title_uk),
            description: LocalizedText::translations(description_en, description_uk),
            image,
        })
    }
}
