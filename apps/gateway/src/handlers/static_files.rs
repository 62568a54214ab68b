//! Serving the built dashboard bundle.

use std::path::{Path, PathBuf};

use actix_files::{Files, NamedFile};
use actix_web::dev::{ServiceRequest, ServiceResponse, fn_service};
use actix_web::web;

/// Mount `dir` at `/`. Paths with no matching file get `index.html` so the
/// dashboard's client-side routes resolve.
///
/// Register after the API scope.
pub fn configure_static(cfg: &mut web::ServiceConfig, dir: &Path) {
    let index = dir.join("index.html");

    cfg.service(
        Files::new("/", dir)
            .index_file("index.html")
            .default_handler(fn_service(move |req: ServiceRequest| {
                let index: PathBuf = index.clone();
                async move {
                    let (req, _) = req.into_parts();
                    let file = NamedFile::open_async(index).await?;
                    let res = file.into_response(&req);
                    Ok::<_, actix_web::Error>(ServiceResponse::new(req, res))
                }
            })),
    );
}
