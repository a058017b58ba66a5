//! Caller-side checks. Anything rejected here never reaches the backend.

use crate::error::ValidationError;
use crate::models::{ImageUpload, NewProperty, PropertyUpdate};

/// Largest accepted listing image (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image types and the extension each is stored under
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "jpg"),
    ("jpeg", "jpg"),
    ("png", "png"),
    ("webp", "webp"),
];

pub fn validate_new_property(property: &NewProperty) -> Result<(), ValidationError> {
    require_text("title", &property.title)?;
    require_text("address", &property.address)?;
    require_amount("price", property.price)
}

pub fn validate_property_update(update: &PropertyUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }
    if let Some(title) = &update.title {
        require_text("title", title)?;
    }
    if let Some(address) = &update.address {
        require_text("address", address)?;
    }
    if let Some(price) = update.price {
        require_amount("price", price)?;
    }
    Ok(())
}

/// Check type and size of an upload, returning the file extension to store it under
pub fn validate_image(upload: &ImageUpload) -> Result<&'static str, ValidationError> {
    let extension = image_extension(upload).ok_or_else(|| ValidationError::UnsupportedFileType {
        file_name: upload.file_name.clone(),
        content_type: upload.content_type.clone(),
    })?;

    if upload.bytes.is_empty() {
        return Err(ValidationError::EmptyFile {
            file_name: upload.file_name.clone(),
        });
    }
    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::FileTooLarge {
            file_name: upload.file_name.clone(),
            size: upload.bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    Ok(extension)
}

fn image_extension(upload: &ImageUpload) -> Option<&'static str> {
    let content_type = upload.content_type.trim().to_ascii_lowercase();
    if !content_type.is_empty() && content_type != "application/octet-stream" {
        return IMAGE_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext);
    }

    // No usable content type: go by the file name
    let ext = upload.file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, stored)| *stored)
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn require_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DealAnalysisInput;
    use crate::models::DealType;

    fn listing() -> NewProperty {
        NewProperty {
            title: "Lakeview Duplex".to_string(),
            address: "12 Elm St".to_string(),
            price: 250_000.0,
            deal_type: DealType::Brrrr,
            ..Default::default()
        }
    }

    fn upload(name: &str, content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0u8; size],
        }
    }

    #[test]
    fn test_valid_listing_passes() {
        assert_eq!(validate_new_property(&listing()), Ok(()));
    }

    #[test]
    fn test_listing_requires_title_and_address() {
        let mut p = listing();
        p.title = "  ".to_string();
        assert_eq!(
            validate_new_property(&p),
            Err(ValidationError::MissingField("title"))
        );

        let mut p = listing();
        p.address.clear();
        assert_eq!(
            validate_new_property(&p),
            Err(ValidationError::MissingField("address"))
        );
    }

    #[test]
    fn test_listing_price_must_be_non_negative() {
        let mut p = listing();
        p.price = -1.0;
        assert!(matches!(
            validate_new_property(&p),
            Err(ValidationError::NegativeAmount { field: "price", .. })
        ));

        p.price = f64::NAN;
        assert_eq!(
            validate_new_property(&p),
            Err(ValidationError::NotFinite("price"))
        );

        p.price = 0.0;
        assert_eq!(validate_new_property(&p), Ok(()));
    }

    #[test]
    fn test_update_rules() {
        assert_eq!(
            validate_property_update(&PropertyUpdate::default()),
            Err(ValidationError::EmptyUpdate)
        );
        let update = PropertyUpdate {
            description: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(validate_property_update(&update), Ok(()));
        let update = PropertyUpdate {
            price: Some(-5.0),
            ..Default::default()
        };
        assert!(validate_property_update(&update).is_err());
    }

    #[test]
    fn test_analysis_input_rejects_negatives() {
        let input = DealAnalysisInput::new(100.0, -1.0, 0.0, 0.0);
        assert!(matches!(
            input.validate(),
            Err(ValidationError::NegativeAmount { field: "rehab cost", .. })
        ));
        assert!(DealAnalysisInput::default().validate().is_ok());
    }

    #[test]
    fn test_accepted_image_types() {
        assert_eq!(validate_image(&upload("a.jpeg", "image/jpeg", 10)), Ok("jpg"));
        assert_eq!(validate_image(&upload("a.png", "image/png", 10)), Ok("png"));
        assert_eq!(validate_image(&upload("a.webp", "image/webp", 10)), Ok("webp"));
        assert_eq!(validate_image(&upload("a.JPG", "", 10)), Ok("jpg"));
    }

    #[test]
    fn test_rejected_image_types() {
        assert!(matches!(
            validate_image(&upload("a.gif", "image/gif", 10)),
            Err(ValidationError::UnsupportedFileType { .. })
        ));
        assert!(matches!(
            validate_image(&upload("notes", "", 10)),
            Err(ValidationError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn test_image_size_limit() {
        assert!(validate_image(&upload("big.png", "image/png", MAX_IMAGE_BYTES)).is_ok());
        assert_eq!(
            validate_image(&upload("big.png", "image/png", MAX_IMAGE_BYTES + 1)),
            Err(ValidationError::FileTooLarge {
                file_name: "big.png".to_string(),
                size: MAX_IMAGE_BYTES + 1,
                max: MAX_IMAGE_BYTES,
            })
        );
        assert!(matches!(
            validate_image(&upload("empty.png", "image/png", 0)),
            Err(ValidationError::EmptyFile { .. })
        ));
    }
}
