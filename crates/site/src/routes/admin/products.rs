//! Product management pages.
//!
//! The product form is multipart so the main image can be uploaded with the
//! rest of the fields. List-valued fields are edited as textareas: key
//! features and gallery URLs one per line, specifications one `Label: Value`
//! per line.

use askama::Template;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use rmt_core::ProductId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::product::lines;
use crate::models::{Product, ProductDraft, ProductUpdate, Specification};
use crate::routes::multipart::MultipartForm;
use crate::state::AppState;

use super::{AdminUserView, form_error, render, set_flash, take_flash};

/// Multipart field carrying an optional new main image.
const IMAGE_FIELD: &str = "image";

/// Raw product form values, kept as typed so a failed save can re-render them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFormValues {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub short_description: String,
    pub description: String,
    pub image_url: String,
    pub gallery_urls: String,
    pub key_features: String,
    pub specifications: String,
    pub is_featured: bool,
    pub order: String,
}

impl ProductFormValues {
    fn from_form(form: &MultipartForm) -> Self {
        Self {
            name: form.text("name").to_owned(),
            slug: form.text("slug").to_owned(),
            category: form.text("category").to_owned(),
            short_description: form.text("short_description").to_owned(),
            description: form.text("description").to_owned(),
            image_url: form.text("image_url").to_owned(),
            gallery_urls: form.text("gallery_urls").to_owned(),
            key_features: form.text("key_features").to_owned(),
            specifications: form.text("specifications").to_owned(),
            is_featured: form.checked("is_featured"),
            order: form.text("order").to_owned(),
        }
    }

    fn order(&self) -> Result<i32, AppError> {
        let order = self.order.trim();
        if order.is_empty() {
            return Ok(0);
        }
        order
            .parse()
            .map_err(|_| AppError::BadRequest("Order must be a whole number".to_string()))
    }

    fn specifications(&self) -> Vec<Specification> {
        self.specifications
            .lines()
            .filter_map(Specification::parse_line)
            .collect()
    }

    /// Payload for creating a product.
    fn to_draft(&self) -> Result<ProductDraft, AppError> {
        Ok(ProductDraft {
            name: self.name.clone(),
            slug: self.slug.clone(),
            category: self.category.clone(),
            short_description: self.short_description.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            gallery_urls: lines(&self.gallery_urls),
            key_features: lines(&self.key_features),
            specifications: self.specifications(),
            is_featured: self.is_featured,
            order: self.order()?,
        })
    }

    /// Payload for updating a product. The form always carries every field.
    fn to_update(&self) -> Result<ProductUpdate, AppError> {
        Ok(ProductUpdate {
            name: Some(self.name.clone()),
            slug: Some(self.slug.clone()),
            category: Some(self.category.clone()),
            short_description: Some(self.short_description.clone()),
            description: Some(self.description.clone()),
            image_url: Some(self.image_url.clone()),
            gallery_urls: Some(lines(&self.gallery_urls)),
            key_features: Some(lines(&self.key_features)),
            specifications: Some(self.specifications()),
            is_featured: Some(self.is_featured),
            order: Some(self.order()?),
        })
    }
}

impl From<&Product> for ProductFormValues {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            slug: product.slug.to_string(),
            category: product.category.clone(),
            short_description: product.short_description.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            gallery_urls: product.gallery_urls.join("\n"),
            key_features: product.key_features.join("\n"),
            specifications: product
                .specifications
                .iter()
                .map(Specification::to_line)
                .collect::<Vec<_>>()
                .join("\n"),
            is_featured: product.is_featured,
            order: product.order.to_string(),
        }
    }
}

/// Products list page template.
#[derive(Template)]
#[template(path = "admin/products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<String>,
    pub products: Vec<Product>,
    pub error: Option<String>,
}

/// Product create/edit form template.
#[derive(Template)]
#[template(path = "admin/products/form.html")]
pub struct ProductFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    /// Where the form posts to.
    pub action: String,
    /// `None` when creating.
    pub product_id: Option<ProductId>,
    pub values: ProductFormValues,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn new(admin: &AdminUserView, values: ProductFormValues, error: Option<String>) -> Self {
        Self {
            admin_user: admin.clone(),
            current_path: "/admin/products".to_string(),
            action: "/admin/products/new".to_string(),
            product_id: None,
            values,
            error,
        }
    }

    fn edit(
        admin: &AdminUserView,
        id: ProductId,
        values: ProductFormValues,
        error: Option<String>,
    ) -> Self {
        Self {
            action: format!("/admin/products/{id}/edit"),
            product_id: Some(id),
            ..Self::new(admin, values, error)
        }
    }

    #[must_use]
    pub fn heading(&self) -> &'static str {
        if self.product_id.is_some() {
            "Edit product"
        } else {
            "New product"
        }
    }
}

fn not_found_redirect() -> Response {
    Redirect::to("/admin/products").into_response()
}

/// Products list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let (products, error) = match state.products().list().await {
        Ok(products) => (products, None),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (Vec::new(), Some("Failed to load products".to_string()))
        }
    };

    render(&ProductsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/admin/products".to_string(),
        flash: take_flash(&session).await,
        products,
        error,
    })
}

/// New product form handler.
#[instrument(skip(admin))]
pub async fn new_product(RequireAdminAuth(admin): RequireAdminAuth) -> Html<String> {
    render(&ProductFormTemplate::new(
        &AdminUserView::from(&admin),
        ProductFormValues {
            order: "0".to_string(),
            ..ProductFormValues::default()
        },
        None,
    ))
}

/// Validate, store the optional image, then insert.
async fn create_from_form(state: &AppState, form: &MultipartForm) -> Result<Product, AppError> {
    let values = ProductFormValues::from_form(form);
    let mut new_product = values.to_draft()?.validate()?;

    if let Some(file) = form.file(IMAGE_FIELD) {
        let stored = state.uploads().save(&file.file_name, &file.bytes).await?;
        new_product.image_url = stored.public_path;
    }

    Ok(state.products().create(&new_product).await?)
}

/// Create product handler.
#[instrument(skip(admin, state, session, multipart))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Response {
    let admin_view = AdminUserView::from(&admin);
    let form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => {
            let template =
                ProductFormTemplate::new(&admin_view, ProductFormValues::default(), Some(form_error(&e)));
            return (StatusCode::BAD_REQUEST, render(&template)).into_response();
        }
    };

    match create_from_form(&state, &form).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
            set_flash(&session, format!("Created {}", product.name)).await;
            Redirect::to("/admin/products").into_response()
        }
        Err(e) => {
            let template = ProductFormTemplate::new(
                &admin_view,
                ProductFormValues::from_form(&form),
                Some(form_error(&e)),
            );
            (StatusCode::BAD_REQUEST, render(&template)).into_response()
        }
    }
}

/// Edit product form handler.
#[instrument(skip(admin, state))]
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = ProductId::parse(&id) else {
        return not_found_redirect();
    };

    match state.products().get_by_id(id).await {
        Ok(Some(product)) => render(&ProductFormTemplate::edit(
            &AdminUserView::from(&admin),
            id,
            ProductFormValues::from(&product),
            None,
        ))
        .into_response(),
        Ok(None) => not_found_redirect(),
        Err(e) => {
            tracing::error!(product_id = %id, "Failed to fetch product: {e}");
            not_found_redirect()
        }
    }
}

/// Validate, store the optional image, then update.
async fn update_from_form(
    state: &AppState,
    id: ProductId,
    form: &MultipartForm,
) -> Result<Product, AppError> {
    let values = ProductFormValues::from_form(form);
    let mut changes = values.to_update()?.validate()?;

    if let Some(file) = form.file(IMAGE_FIELD) {
        let stored = state.uploads().save(&file.file_name, &file.bytes).await?;
        changes.image_url = Some(stored.public_path);
    }

    Ok(state.products().update(id, changes).await?)
}

/// Update product handler.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let Some(id) = ProductId::parse(&id) else {
        return not_found_redirect();
    };
    let admin_view = AdminUserView::from(&admin);

    let form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => {
            let template = ProductFormTemplate::edit(
                &admin_view,
                id,
                ProductFormValues::default(),
                Some(form_error(&e)),
            );
            return (StatusCode::BAD_REQUEST, render(&template)).into_response();
        }
    };

    match update_from_form(&state, id, &form).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product updated");
            set_flash(&session, format!("Saved {}", product.name)).await;
            Redirect::to("/admin/products").into_response()
        }
        Err(e) => {
            let template = ProductFormTemplate::edit(
                &admin_view,
                id,
                ProductFormValues::from_form(&form),
                Some(form_error(&e)),
            );
            (StatusCode::BAD_REQUEST, render(&template)).into_response()
        }
    }
}

/// Delete product handler.
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Redirect {
    let result = match ProductId::parse(&id) {
        Some(id) => state.products().delete(id).await.map_err(AppError::from),
        None => Err(AppError::NotFound("Product not found".to_string())),
    };

    match result {
        Ok(()) => {
            tracing::info!(product_id = %id, admin = %admin.username, "Product deleted");
            set_flash(&session, "Product deleted").await;
        }
        Err(e) => {
            tracing::warn!(product_id = %id, error = %e, "Failed to delete product");
            set_flash(&session, format!("Delete failed: {}", form_error(&e))).await;
        }
    }

    Redirect::to("/admin/products")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn values() -> ProductFormValues {
        ProductFormValues {
            name: "Gang Saw GS-80".to_string(),
            slug: "gang-saw-gs-80".to_string(),
            category: "Saws".to_string(),
            gallery_urls: "/uploads/a.jpg\n\n  /uploads/b.jpg  \n".to_string(),
            key_features: "80 blades\r\nVariable feed\n".to_string(),
            specifications: "Power: 75 kW\nWeight : 42 t\n\n".to_string(),
            order: " 3 ".to_string(),
            ..ProductFormValues::default()
        }
    }

    #[test]
    fn test_textareas_split_into_lists() {
        let draft = values().to_draft().unwrap();
        assert_eq!(draft.gallery_urls, ["/uploads/a.jpg", "/uploads/b.jpg"]);
        assert_eq!(draft.key_features, ["80 blades", "Variable feed"]);
        assert_eq!(draft.specifications.len(), 2);
        assert_eq!(draft.specifications[1].label, "Weight");
        assert_eq!(draft.specifications[1].value, "42 t");
        assert_eq!(draft.order, 3);
    }

    #[test]
    fn test_blank_order_defaults_to_zero() {
        let form = ProductFormValues {
            order: String::new(),
            ..values()
        };
        assert_eq!(form.to_draft().unwrap().order, 0);
    }

    #[test]
    fn test_bad_order_is_rejected() {
        let form = ProductFormValues {
            order: "first".to_string(),
            ..values()
        };
        assert!(matches!(form.to_draft(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_form_values_round_trip_through_product() {
        let new_product = values().to_draft().unwrap().validate().unwrap();
        let update = values().to_update().unwrap().validate().unwrap();
        assert_eq!(update.slug.as_ref(), Some(&new_product.slug));
        assert_eq!(update.specifications.as_ref(), Some(&new_product.specifications));
    }

    #[test]
    fn test_edit_template_posts_to_product() {
        let id = ProductId::generate();
        let admin = AdminUserView {
            username: "admin".to_string(),
        };
        let template = ProductFormTemplate::edit(&admin, id, values(), None);
        assert_eq!(template.action, format!("/admin/products/{id}/edit"));
        assert_eq!(template.heading(), "Edit product");
    }
}
