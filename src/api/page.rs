//! Page objects handed to the client-side renderer.
//!
//! A page names the client component to mount and carries its props. Every
//! page also gets the shared props: the signed-in user, the flash message
//! and any field errors from the previous submission.

use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::flash::Flash;
use crate::domain::Actor;
use crate::validation::FieldErrors;

/// Rendered page
#[derive(Debug, Serialize)]
pub struct Page<P: Serialize> {
    pub component: &'static str,
    pub props: Props<P>,
    pub url: String,
}

/// Page-specific props merged with the shared ones
#[derive(Debug, Serialize)]
pub struct Props<P: Serialize> {
    #[serde(flatten)]
    pub page: P,
    pub auth: AuthProps,
    pub flash: FlashProps,
    pub errors: FieldErrors,
}

#[derive(Debug, Serialize)]
pub struct AuthProps {
    pub user: Option<AuthUser>,
}

#[derive(Debug, Serialize)]
pub struct AuthUser {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct FlashProps {
    pub success: Option<String>,
}

/// Props for pages that only need the shared ones
#[derive(Debug, Serialize)]
pub struct NoProps {}

impl<P: Serialize> Page<P> {
    /// Build the page, consuming the flash read from this request.
    pub fn render(
        component: &'static str,
        url: impl Into<String>,
        page: P,
        actor: Option<&Actor>,
        flash: Flash,
    ) -> Json<Self> {
        Json(Self {
            component,
            props: Props {
                page,
                auth: AuthProps {
                    user: actor.map(|actor| AuthUser {
                        uuid: actor.uuid,
                        name: actor.name.clone(),
                        email: actor.email.clone(),
                    }),
                },
                flash: FlashProps {
                    success: flash.success,
                },
                errors: flash.errors,
            },
            url: url.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Greeting {
        greeting: &'static str,
    }

    #[test]
    fn page_props_include_shared_keys() {
        let Json(page) = Page::render(
            "Welcome",
            "/",
            Greeting { greeting: "hi" },
            None,
            Flash::success("Saved."),
        );
        let json = serde_json::to_value(page).unwrap();

        assert_eq!(json["component"], "Welcome");
        assert_eq!(json["props"]["greeting"], "hi");
        assert!(json["props"]["auth"]["user"].is_null());
        assert_eq!(json["props"]["flash"]["success"], "Saved.");
        assert_eq!(json["props"]["errors"], serde_json::json!({}));
    }

    #[test]
    fn signed_in_actor_is_exposed_without_secrets() {
        let actor = Actor {
            uuid: Uuid::new_v4(),
            name: "Admin".into(),
            email: "admin@example.com".into(),
        };
        let Json(page) = Page::render("Users/Index", "/users", NoProps {}, Some(&actor), Flash::default());
        let json = serde_json::to_value(page).unwrap();

        assert_eq!(json["props"]["auth"]["user"]["email"], "admin@example.com");
        assert_eq!(json["url"], "/users");
    }
}
