use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use std::path::{Component, Path, PathBuf};

pub const INDEX_TEMPLATE: &str = "index.html";

/// Where the browser front-end lives on disk.
#[derive(Debug, Clone)]
pub struct SiteAssets {
    templates_dir: PathBuf,
    static_dir: PathBuf,
}

impl SiteAssets {
    pub fn new(templates_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            static_dir: static_dir.into(),
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.templates_dir.join(INDEX_TEMPLATE)
    }

    /// Maps a request path onto a file under the static directory.
    ///
    /// Returns `None` for anything that would step outside it.
    pub fn static_path(&self, requested: &str) -> Option<PathBuf> {
        let mut resolved = self.static_dir.clone();
        let mut depth = 0;

        for component in Path::new(requested).components() {
            match component {
                Component::Normal(segment) => {
                    resolved.push(segment);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        (depth > 0).then_some(resolved)
    }
}

/// # Index Page
///
/// Renders the verification form. The template is read from disk on every
/// request so edits show up without a restart.
#[get("/")]
pub async fn index(assets: web::Data<SiteAssets>) -> HttpResponse {
    let path = assets.index_path();
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => HttpResponse::Ok().content_type(ContentType::html()).body(html),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Error loading template");
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Error loading template")
        }
    }
}

/// Serves files from the static directory; anything missing is a 404.
#[get("/static/{path:.*}")]
pub async fn static_asset(
    path: web::Path<String>,
    assets: web::Data<SiteAssets>,
) -> HttpResponse {
    let Some(file) = assets.static_path(&path) else {
        return HttpResponse::NotFound().finish();
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(content_type_for(&file))
            .body(bytes),
        Err(e) => {
            tracing::debug!(path = %file.display(), error = %e, "Static asset not served");
            HttpResponse::NotFound().finish()
        }
    }
}

/// Content type guessed from the file extension. Text types are served as UTF-8.
fn content_type_for(file: &Path) -> String {
    let mime = mime_guess::from_path(file).first_or_octet_stream();
    if mime.type_() == mime_guess::mime::TEXT {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.essence_str().to_string()
    }
}

/// - `GET /`: index page
/// - `GET /static/{path}`: front-end assets
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(static_asset);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_path_rejects_traversal() {
        let assets = SiteAssets::new("templates", "static");

        // Plain and dotted paths stay inside the static directory
        assert_eq!(
            assets.static_path("js/script.js"),
            Some(PathBuf::from("static/js/script.js"))
        );
        assert_eq!(
            assets.static_path("./js/./script.js"),
            Some(PathBuf::from("static/js/script.js"))
        );

        // Anything escaping it, or naming the directory itself, is refused
        assert_eq!(assets.static_path("../Cargo.toml"), None);
        assert_eq!(assets.static_path("js/../../secret"), None);
        assert_eq!(assets.static_path("/etc/passwd"), None);
        assert_eq!(assets.static_path(""), None);
        assert_eq!(assets.static_path("."), None);
    }

    #[test]
    fn test_content_type_for() {
        assert!(content_type_for(Path::new("static/js/script.js")).contains("javascript"));
        assert_eq!(
            content_type_for(Path::new("static/css/STYLE.CSS")),
            "text/css; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(
            content_type_for(Path::new("LICENSE")),
            "application/octet-stream"
        );
    }
}
