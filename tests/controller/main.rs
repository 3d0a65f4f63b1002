use petclinic_records::{boot, tests_cfg, TestServer};

mod monitoring;
mod owners;
mod pets;
mod vets;
mod visits;

/// A server over an in-memory store loaded with the bundled fixture.
pub async fn seeded_server() -> TestServer {
    let ctx = tests_cfg::app::get_seeded_app_context().await;
    TestServer::new(boot::create_router(ctx)).expect("start test server")
}

/// A server over an empty in-memory store.
pub async fn empty_server() -> TestServer {
    let ctx = tests_cfg::app::get_app_context().await;
    TestServer::new(boot::create_router(ctx)).expect("start test server")
}
