//! Entity resource routes, mounted once per enabled entity type.

use crate::config::Settings;
use crate::domain::{Entity, Owner, Pet, PetType, Specialty, Vet, Visit};
use crate::handlers::entity::{create, delete, list, partial_update, read, search, update};
use crate::state::AppState;
use axum::{routing::get, Router};

/// Prefix under which `entity_routes` is nested; used in `Location` headers.
pub const API_PREFIX: &str = "/api";

fn routes_for<E: Entity>(router: Router<AppState>) -> Router<AppState> {
    let name = E::DESCRIPTOR.name;
    router
        .route(&format!("/{}", name), get(list::<E>).post(create::<E>))
        .route(
            &format!("/{}/:id", name),
            get(read::<E>)
                .put(update::<E>)
                .patch(partial_update::<E>)
                .delete(delete::<E>),
        )
        .route(&format!("/_search/{}", name), get(search::<E>))
}

fn mount<E: Entity>(router: Router<AppState>, settings: &Settings) -> Router<AppState> {
    if settings.is_enabled(E::DESCRIPTOR.name) {
        routes_for::<E>(router)
    } else {
        router
    }
}

/// Routes for every entity enabled in the settings. Nest under `API_PREFIX`.
pub fn entity_routes(state: AppState) -> Router {
    let settings = state.settings.clone();
    let router = Router::new();
    let router = mount::<Owner>(router, &settings);
    let router = mount::<Pet>(router, &settings);
    let router = mount::<PetType>(router, &settings);
    let router = mount::<Specialty>(router, &settings);
    let router = mount::<Vet>(router, &settings);
    let router = mount::<Visit>(router, &settings);
    router.with_state(state)
}
