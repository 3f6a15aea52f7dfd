//! Import catalog products from a YAML file.
//!
//! The file is a list of products using the same field names as the JSON
//! API:
//!
//! ```yaml
//! - name: Gang Saw GS-80
//!   slug: gang-saw-gs-80
//!   category: Saws
//!   shortDescription: Multi-blade block saw
//!   keyFeatures: [80 blades, Variable feed]
//!   specifications:
//!     - { label: Power, value: 75 kW }
//!   isFeatured: true
//!   order: 1
//! ```
//!
//! Every entry is validated before anything is written. Products whose slug
//! already exists are skipped.

use std::path::Path;

use rmt_site::db::{ProductRepository, RepositoryError};
use rmt_site::models::{NewProduct, ProductDraft};
use thiserror::Error;
use tracing::{error, info};

/// Why a catalog file was rejected.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not a YAML list of products.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// One message per invalid entry.
    #[error("{} validation errors found", .0.len())]
    Invalid(Vec<String>),
}

/// Counts reported after an import.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse and validate a YAML catalog.
///
/// # Errors
///
/// Returns `CatalogError::Yaml` if the document cannot be parsed and
/// `CatalogError::Invalid` with one message per bad entry otherwise.
pub fn parse_catalog(content: &str) -> Result<Vec<NewProduct>, CatalogError> {
    let drafts: Vec<ProductDraft> = serde_yaml::from_str(content)?;

    let mut products = Vec::with_capacity(drafts.len());
    let mut errors = Vec::new();
    for (index, draft) in drafts.into_iter().enumerate() {
        let label = if draft.slug.trim().is_empty() {
            format!("entry {}", index + 1)
        } else {
            draft.slug.clone()
        };
        match draft.validate() {
            Ok(product) => products.push(product),
            Err(e) => errors.push(format!("{label}: {e}")),
        }
    }

    if errors.is_empty() {
        Ok(products)
    } else {
        Err(CatalogError::Invalid(errors))
    }
}

/// Import products from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or a database operation fails.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;

    let products = match parse_catalog(&content) {
        Ok(products) => products,
        Err(CatalogError::Invalid(errors)) => {
            error!("Catalog validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(CatalogError::Invalid(errors).into());
        }
        Err(e) => return Err(e.into()),
    };
    info!(products = products.len(), "Catalog validated successfully");

    let target = super::connect().await?;
    let repo = ProductRepository::new(&target.pool, &target.scope);

    let mut summary = SeedSummary::default();
    for product in &products {
        match repo.create(product).await {
            Ok(created) => {
                info!(slug = %created.slug, "Inserted product");
                summary.inserted += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                info!(slug = %product.slug, "Skipped existing product");
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {}", summary.inserted);
    info!("  Products skipped (already exist): {}", summary.skipped);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_accepts_api_field_names() {
        let yaml = r"
- name: Gang Saw GS-80
  slug: gang-saw-gs-80
  category: Saws
  keyFeatures: [80 blades, Variable feed]
  specifications:
    - { spec: Power, value: 75 kW }
  isFeatured: true
  order: 2
";
        let products = parse_catalog(yaml).unwrap();
        assert_eq!(products.len(), 1);
        let product = &products[0];
        assert_eq!(product.slug.as_str(), "gang-saw-gs-80");
        assert_eq!(product.key_features, ["80 blades", "Variable feed"]);
        assert_eq!(product.specifications[0].label, "Power");
        assert!(product.is_featured);
        assert_eq!(product.order, 2);
    }

    #[test]
    fn test_parse_catalog_reports_every_invalid_entry() {
        let yaml = r"
- name: ''
  slug: no-name
  category: Saws
- name: Bad Slug
  slug: Bad Slug
  category: Saws
- name: Fine
  slug: fine
  category: Saws
";
        let Err(CatalogError::Invalid(errors)) = parse_catalog(yaml) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("no-name:"));
        assert!(errors[1].starts_with("Bad Slug:"));
    }

    #[test]
    fn test_parse_catalog_rejects_malformed_yaml() {
        assert!(matches!(
            parse_catalog("- name: [unclosed"),
            Err(CatalogError::Yaml(_))
        ));
    }
}
