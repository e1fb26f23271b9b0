use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{Period, SlotsResponse, TimeData, TimeSlot};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_slots,
        handlers::get_time,
    ),
    components(schemas(
        SlotsResponse,
        TimeSlot,
        Period,
        TimeData,
    )),
    tags(
        (name = "time", description = "Time slot projection and zone lookups"),
    ),
)]
struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
