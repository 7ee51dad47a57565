// Route exports
pub mod listings;
pub mod location;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(location::configure)
            .configure(listings::configure),
    );
}
