use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{ActiveTimezonesResponse, ReorderRequest, Theme, ThemeBody, Timezone};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_timezones,
        handlers::add_timezone,
        handlers::remove_timezone,
        handlers::set_home,
        handlers::reorder,
        handlers::get_theme,
        handlers::set_theme,
    ),
    components(schemas(
        Timezone,
        ActiveTimezonesResponse,
        ReorderRequest,
        Theme,
        ThemeBody,
    )),
    tags(
        (name = "timezones", description = "A client's ordered timezone list"),
        (name = "theme", description = "Theme preference"),
    ),
)]
struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
