//! Development tree server: stores JSON subtrees by path and long-polls changes to them.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::sync::{RwLock, watch};

#[path = "linkdeck_server/types.rs"]
mod types;
use self::types::*;
#[path = "linkdeck_server/validators.rs"]
mod validators;
use self::validators::*;
#[path = "linkdeck_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "linkdeck_server/persistence.rs"]
mod persistence;
use self::persistence::*;
#[path = "linkdeck_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "linkdeck_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "linkdeck_server/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
