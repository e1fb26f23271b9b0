use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{DirectoryEntry, DirectoryStats, LookupResponse, SearchResponse, Timezone};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::search,
        handlers::lookup,
        handlers::static_cities,
        handlers::dynamic_cities,
        handlers::stats,
    ),
    components(schemas(
        Timezone,
        DirectoryEntry,
        SearchResponse,
        LookupResponse,
        DirectoryStats,
    )),
    tags(
        (name = "cities", description = "City directory and search"),
    ),
)]
struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
