// Library root
// -----------
// This crate exposes the client library behind the `fit4ever` CLI. The
// binary (`main.rs`) wires a `Controller` to the terminal presenter.
//
// Module responsibilities:
// - `api`: the resource gateway; every HTTP call goes through it.
// - `session`: login/register/restore/logout and token persistence.
// - `workouts`, `nutrition`, `goals`: CRUD per resource.
// - `dashboard`: the concurrent dashboard load and its derived stats.
// - `router`: active section and cancellable section loads.
// - `controller`: user actions, error-to-notification conversion.
// - `view`: the `Presenter` seam and view models.
// - `ui`: terminal presenter and the interactive menu.
pub mod api;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod goals;
pub mod logging;
pub mod models;
pub mod nutrition;
pub mod router;
pub mod session;
pub mod ui;
pub mod view;
pub mod workouts;

pub use error::{ClientError, Result};
