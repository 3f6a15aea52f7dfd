//! Product domain types and payload validation.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rmt_core::{ProductId, Slug, SlugError};

/// Category used when a product has none.
pub const UNCATEGORIZED: &str = "Other";

/// A catalog product (domain type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub category: String,
    pub short_description: String,
    pub description: String,
    pub image_url: String,
    pub gallery_urls: Vec<String>,
    pub key_features: Vec<String>,
    pub specifications: Vec<Specification>,
    pub is_featured: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub application_name: String,
}

impl Product {
    /// Category to group under on the listing page.
    #[must_use]
    pub fn display_category(&self) -> &str {
        let category = self.category.trim();
        if category.is_empty() {
            UNCATEGORIZED
        } else {
            category
        }
    }
}

/// One row of a product's specification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    /// Older clients send this as `spec`.
    #[serde(alias = "spec")]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl Specification {
    /// Parse a `Label: Value` line as typed into the admin form.
    ///
    /// Only the first colon separates label from value. A line without a colon
    /// becomes a label with an empty value. Blank lines yield `None`.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (label, value) = line.split_once(':').unwrap_or((line, ""));
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Some(Self {
            label: label.to_owned(),
            value: value.trim().to_owned(),
        })
    }

    /// Render back to the `Label: Value` form used in the admin textarea.
    #[must_use]
    pub fn to_line(&self) -> String {
        if self.value.is_empty() {
            self.label.clone()
        } else {
            format!("{}: {}", self.label, self.value)
        }
    }
}

/// Errors from validating product payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),
}

/// Incoming product payload for create requests.
///
/// Only `name`, `slug` and `category` are required; everything else falls
/// back to an empty/zero default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub short_description: String,
    pub description: String,
    pub image_url: String,
    pub gallery_urls: Vec<String>,
    pub key_features: Vec<String>,
    pub specifications: Vec<Specification>,
    pub is_featured: bool,
    pub order: i32,
}

impl ProductDraft {
    /// Validate into a [`NewProduct`] ready for insertion.
    ///
    /// # Errors
    ///
    /// Returns `ProductValidationError` if a required field is blank or the
    /// slug is malformed.
    pub fn validate(self) -> Result<NewProduct, ProductValidationError> {
        let name = required("name", &self.name)?;
        let slug = Slug::parse(&required("slug", &self.slug)?)?;
        let category = required("category", &self.category)?;

        Ok(NewProduct {
            name,
            slug,
            category,
            short_description: self.short_description.trim().to_owned(),
            description: self.description.trim().to_owned(),
            image_url: self.image_url.trim().to_owned(),
            gallery_urls: clean_list(self.gallery_urls),
            key_features: clean_list(self.key_features),
            specifications: clean_specifications(self.specifications),
            is_featured: self.is_featured,
            order: self.order,
        })
    }
}

/// A validated product waiting to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub slug: Slug,
    pub category: String,
    pub short_description: String,
    pub description: String,
    pub image_url: String,
    pub gallery_urls: Vec<String>,
    pub key_features: Vec<String>,
    pub specifications: Vec<Specification>,
    pub is_featured: bool,
    pub order: i32,
}

/// Partial update: every submitted field overwrites, omitted fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub gallery_urls: Option<Vec<String>>,
    pub key_features: Option<Vec<String>>,
    pub specifications: Option<Vec<Specification>>,
    pub is_featured: Option<bool>,
    pub order: Option<i32>,
}

impl ProductUpdate {
    /// Validate the submitted fields.
    ///
    /// # Errors
    ///
    /// Returns `ProductValidationError` if a submitted required field is blank
    /// or a submitted slug is malformed.
    pub fn validate(self) -> Result<ProductChanges, ProductValidationError> {
        let name = self.name.as_deref().map(|v| required("name", v)).transpose()?;
        let slug = match self.slug.as_deref() {
            Some(v) => Some(Slug::parse(&required("slug", v)?)?),
            None => None,
        };
        let category = self
            .category
            .as_deref()
            .map(|v| required("category", v))
            .transpose()?;

        Ok(ProductChanges {
            name,
            slug,
            category,
            short_description: self.short_description.map(|v| v.trim().to_owned()),
            description: self.description.map(|v| v.trim().to_owned()),
            image_url: self.image_url.map(|v| v.trim().to_owned()),
            gallery_urls: self.gallery_urls.map(clean_list),
            key_features: self.key_features.map(clean_list),
            specifications: self.specifications.map(clean_specifications),
            is_featured: self.is_featured,
            order: self.order,
        })
    }
}

/// A validated [`ProductUpdate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub slug: Option<Slug>,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub gallery_urls: Option<Vec<String>>,
    pub key_features: Option<Vec<String>>,
    pub specifications: Option<Vec<Specification>>,
    pub is_featured: Option<bool>,
    pub order: Option<i32>,
}

impl ProductChanges {
    /// Overwrite the fields of `product` that were submitted.
    ///
    /// Identity and timestamps are left alone; the repository stamps
    /// `updated_at`.
    pub fn apply(self, product: &mut Product) {
        if let Some(v) = self.name {
            product.name = v;
        }
        if let Some(v) = self.slug {
            product.slug = v;
        }
        if let Some(v) = self.category {
            product.category = v;
        }
        if let Some(v) = self.short_description {
            product.short_description = v;
        }
        if let Some(v) = self.description {
            product.description = v;
        }
        if let Some(v) = self.image_url {
            product.image_url = v;
        }
        if let Some(v) = self.gallery_urls {
            product.gallery_urls = v;
        }
        if let Some(v) = self.key_features {
            product.key_features = v;
        }
        if let Some(v) = self.specifications {
            product.specifications = v;
        }
        if let Some(v) = self.is_featured {
            product.is_featured = v;
        }
        if let Some(v) = self.order {
            product.order = v;
        }
    }
}

/// Next `updated_at` value: `now` at database precision, bumped past
/// `previous` when the clock has not moved (or moved backwards).
#[must_use]
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = now.trunc_subsecs(6);
    let floor = previous.trunc_subsecs(6) + Duration::microseconds(1);
    now.max(floor)
}

/// Split a textarea into trimmed, non-empty lines.
#[must_use]
pub fn lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn required(field: &'static str, value: &str) -> Result<String, ProductValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProductValidationError::MissingField(field));
    }
    Ok(value.to_owned())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trim every row and drop rows without a label.
fn clean_specifications(specs: Vec<Specification>) -> Vec<Specification> {
    specs
        .into_iter()
        .map(|spec| Specification {
            label: spec.label.trim().to_owned(),
            value: spec.value.trim().to_owned(),
        })
        .filter(|spec| !spec.label.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        let ts = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Product {
            id: ProductId::generate(),
            name: "Bridge Saw".to_owned(),
            slug: Slug::parse("bridge-saw").unwrap(),
            category: "Saws".to_owned(),
            short_description: "Cuts slabs".to_owned(),
            description: "A long description".to_owned(),
            image_url: "/uploads/a.jpg".to_owned(),
            gallery_urls: vec![],
            key_features: vec!["Fast".to_owned()],
            specifications: vec![],
            is_featured: false,
            order: 3,
            created_at: ts,
            updated_at: ts,
            application_name: "rmt".to_owned(),
        }
    }

    #[test]
    fn test_draft_minimal_payload_validates() {
        let draft: ProductDraft = serde_json::from_str(
            r#"{"name":"X","slug":"x","category":"C","shortDescription":"s","description":"d"}"#,
        )
        .unwrap();
        let product = draft.validate().unwrap();
        assert_eq!(product.slug.as_str(), "x");
        assert_eq!(product.short_description, "s");
        assert!(product.key_features.is_empty());
        assert!(!product.is_featured);
        assert_eq!(product.order, 0);
    }

    #[test]
    fn test_draft_rejects_blank_required_fields() {
        let draft = ProductDraft {
            name: "  ".to_owned(),
            slug: "x".to_owned(),
            category: "C".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            draft.validate(),
            Err(ProductValidationError::MissingField("name"))
        );

        let draft = ProductDraft {
            name: "X".to_owned(),
            slug: "x".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            draft.validate(),
            Err(ProductValidationError::MissingField("category"))
        );
    }

    #[test]
    fn test_draft_rejects_bad_slug() {
        let draft = ProductDraft {
            name: "X".to_owned(),
            slug: "Not A Slug".to_owned(),
            category: "C".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            draft.validate(),
            Err(ProductValidationError::InvalidSlug(_))
        ));
    }

    #[test]
    fn test_blank_specification_labels_are_dropped() {
        let draft: ProductDraft = serde_json::from_str(
            r#"{"name":"X","slug":"x","category":"C","specifications":[
                {"label":"  ","value":"orphan"},
                {"label":" Power ","value":" 15 kW "},
                {"spec":"","value":""}
            ]}"#,
        )
        .unwrap();
        let product = draft.validate().unwrap();
        assert_eq!(
            product.specifications,
            vec![Specification {
                label: "Power".to_owned(),
                value: "15 kW".to_owned(),
            }]
        );

        let update = ProductUpdate {
            specifications: Some(vec![Specification {
                label: String::new(),
                value: "x".to_owned(),
            }]),
            ..Default::default()
        };
        assert_eq!(update.validate().unwrap().specifications, Some(vec![]));
    }

    #[test]
    fn test_specification_accepts_spec_alias() {
        let spec: Specification =
            serde_json::from_str(r#"{"spec":"Power","value":"15 kW"}"#).unwrap();
        assert_eq!(spec.label, "Power");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["label"], "Power");
    }

    #[test]
    fn test_specification_parse_line() {
        assert_eq!(
            Specification::parse_line(" Blade diameter : 3500 mm "),
            Some(Specification {
                label: "Blade diameter".to_owned(),
                value: "3500 mm".to_owned(),
            })
        );
        assert_eq!(
            Specification::parse_line("Ratio: 1:2").unwrap().value,
            "1:2"
        );
        assert_eq!(Specification::parse_line("CE certified").unwrap().value, "");
        assert_eq!(Specification::parse_line("   "), None);
        assert_eq!(Specification::parse_line(": orphan"), None);
    }

    #[test]
    fn test_update_overwrites_only_submitted_fields() {
        let mut product = sample_product();
        let update: ProductUpdate =
            serde_json::from_str(r#"{"name":"Bridge Saw XL","isFeatured":true}"#).unwrap();
        update.validate().unwrap().apply(&mut product);

        assert_eq!(product.name, "Bridge Saw XL");
        assert!(product.is_featured);
        assert_eq!(product.slug.as_str(), "bridge-saw");
        assert_eq!(product.order, 3);
        assert_eq!(product.key_features, vec!["Fast".to_owned()]);
    }

    #[test]
    fn test_update_rejects_blank_submitted_fields() {
        let update = ProductUpdate {
            name: Some(String::new()),
            order: Some(9),
            ..Default::default()
        };
        assert_eq!(
            update.validate(),
            Err(ProductValidationError::MissingField("name"))
        );

        let update = ProductUpdate {
            slug: Some("Bad Slug".to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            update.validate(),
            Err(ProductValidationError::InvalidSlug(_))
        ));
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let mut product = sample_product();
        let before = product.clone();
        ProductUpdate::default().validate().unwrap().apply(&mut product);
        assert_eq!(product, before);
    }

    #[test]
    fn test_next_updated_at_strictly_advances() {
        let prev = sample_product().updated_at;
        assert!(next_updated_at(prev, prev) > prev);
        assert!(next_updated_at(prev, prev - Duration::seconds(5)) > prev);

        let later = prev + Duration::seconds(10);
        assert_eq!(next_updated_at(prev, later), later);
    }

    #[test]
    fn test_display_category_falls_back() {
        let mut product = sample_product();
        assert_eq!(product.display_category(), "Saws");
        product.category = " ".to_owned();
        assert_eq!(product.display_category(), UNCATEGORIZED);
    }

    #[test]
    fn test_lines_skips_blanks() {
        assert_eq!(lines("a\n\n  b  \r\n"), vec!["a".to_owned(), "b".to_owned()]);
    }
}
