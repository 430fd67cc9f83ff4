use super::handlers::{auth, galleries, health, inquiries};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Same wiring as the served router, keeping only the generated document.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// New endpoints go through `.routes(routes!(...))` so they are both served
/// and documented. The plain-text `/` route is registered outside this
/// function and stays out of the spec on purpose.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(auth::admin::admin_login))
        .routes(routes!(auth::admin::admin_session))
        .routes(routes!(auth::admin::admin_logout))
        .routes(routes!(auth::gallery::gallery_login))
        .routes(routes!(auth::gallery::gallery_session))
        .routes(routes!(galleries::list_galleries))
        .routes(routes!(galleries::upsert_gallery))
        .routes(routes!(inquiries::submit_inquiry))
        .routes(routes!(inquiries::list_inquiries));

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Admin and client gallery sessions".to_string());

    let mut galleries_tag = Tag::new("galleries");
    galleries_tag.description = Some("Gallery credential management".to_string());

    let mut inquiries_tag = Tag::new("inquiries");
    inquiries_tag.description = Some("Contact form inquiries".to_string());

    router.get_openapi_mut().tags = Some(vec![auth_tag, galleries_tag, inquiries_tag]);

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Info comes from Cargo.toml so the spec version tracks the crate version.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(non_empty(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = non_empty(env!("CARGO_PKG_LICENSE")).map(|id| {
        let mut license = License::new(id);
        license.identifier = Some(id.to_string());
        license
    });

    OpenApiBuilder::new().info(info).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors look like "Name <email>", `:` separated.
    let author = env!("CARGO_PKG_AUTHORS").split(':').next()?.trim();

    let (name, email) = match author.split_once('<') {
        Some((name, rest)) => (name.trim(), rest.trim_end_matches('>').trim()),
        None => (author, ""),
    };
    if name.is_empty() && email.is_empty() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = non_empty(name).map(str::to_string);
    contact.email = non_empty(email).map(str::to_string);
    Some(contact)
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
