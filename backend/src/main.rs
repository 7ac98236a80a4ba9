#![deny(clippy::all)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::todo)]
// #![warn(clippy::cargo)]
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]

#[tokio::main]
async fn main() {
    app::run().await;
}

#[cfg(test)]
mod tests {
    mod support;

    mod catalog_tests;
    mod csv_tests;
    mod filter_tests;
    mod generator_tests;
    mod integration_tests;
    mod payload_tests;
    mod preview_tests;
    mod report_routes_tests;
    mod settings_tests;
    mod table_tests;
    mod talent_tests;
    mod user_tests;
    mod work_request_tests;
}

pub mod cfg {
    mod app_settings;
    mod database_settings;
    mod integration_settings;
    mod report_settings;
    mod server_settings;

    pub use app_settings::*;
    pub use database_settings::*;
    pub use integration_settings::*;
    pub use report_settings::*;
    pub use server_settings::*;
}

pub mod core {
    mod context;
    mod dbpool;

    pub use context::*;
    pub use dbpool::*;
}

pub mod db {
    mod integrations;
    mod tenants;
    mod users;
    mod work_requests;

    pub use integrations::*;
    pub use tenants::*;
    pub use users::*;
    pub use work_requests::*;
}

pub mod reports {
    mod catalog;
    mod csv;
    mod error;
    mod filter;
    mod format;
    mod generators;
    mod payload;
    mod rng;
    mod source;
    mod table;

    pub use catalog::*;
    pub use csv::*;
    pub use error::*;
    pub use filter::*;
    pub use format::*;
    pub use generators::generate;
    pub use payload::*;
    pub use rng::*;
    pub use source::*;
    pub use table::*;
}

pub mod views {
    mod preview;
    mod table_view;

    pub use preview::*;
    pub use table_view::*;
}

pub mod talent {
    mod mock;

    pub use mock::*;
}

pub mod routes {
    mod error;
    mod tenant_scope;

    pub mod health;
    pub mod integrations;
    pub mod reports;
    pub mod talent;
    pub mod tenants;
    pub mod users;
    pub mod work_requests;

    pub use error::*;
    pub use tenant_scope::*;
}

pub mod app {
    mod cli;
    mod migrations;
    mod router;
    mod server;

    pub use cli::*;
    pub use migrations::*;
    pub use router::*;
    pub use server::*;
}
