//! OpenAPI documentation.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "viewbridge",
        description = "Attachment conversion bridge between a messaging platform and a document viewer"
    ),
    paths(
        crate::handlers::events::attachments_posted,
        crate::handlers::file_info::get_file_info,
        crate::handlers::viewer_redirect::viewer_redirect,
    ),
    components(schemas(
        viewbridge_core::PostedAttachments,
        viewbridge_core::AttachmentRef,
        viewbridge_core::FileRecord,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "events", description = "Platform event ingestion"),
        (name = "files", description = "Platform file records"),
        (name = "viewer", description = "Viewer redirects")
    )
)]
pub struct ApiDoc;
