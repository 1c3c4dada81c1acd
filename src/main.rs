use actix_web::{App, HttpServer, middleware::Logger, web::Data};
use domain_verifier::config::AppConfig;
use domain_verifier::openapi::ApiDoc;
use domain_verifier::routes::pages::SiteAssets;
use domain_verifier::verification::{DomainVerifier, SystemResolver};
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Domain Verifier Service Entry Point
///
/// # Endpoints
/// - Index page: `/`
/// - Verification: `POST /verify`
/// - Health: `/health`
/// - Swagger UI: `/swagger-ui/`
/// - OpenAPI spec: `/api-docs/openapi.json`
///
/// # Configuration
/// - Environment variables loaded from `.env` file (if present), see [`AppConfig`]
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    domain_verifier::telemetry::init_logger();

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let verifier = Data::new(DomainVerifier::with_tracing(SystemResolver::new(config.resolver)));
    let assets = Data::new(SiteAssets::new(config.templates_dir.clone(), config.static_dir.clone()));
    let openapi = ApiDoc::openapi();

    tracing::info!(host = %config.host, port = config.port, "Domain verifier listening");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(verifier.clone())
            .app_data(assets.clone())
            .configure(domain_verifier::routes::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
