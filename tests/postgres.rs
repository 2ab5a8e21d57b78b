//! Runs against a real PostgreSQL when TEST_DATABASE_URL is set; skipped otherwise.

use futures::TryStreamExt;
use petclinic_api::sql::PageRequest;
use chrono::NaiveDate;
use petclinic_api::{
    apply_migrations, DatabaseClient, Entity, EntityRepository, Owner, Pet, PetType, PgClient, Visit,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

async fn client() -> Option<Arc<dyn DatabaseClient>> {
    connect(2).await
}

/// One connection, so every statement reuses the same prepared-statement cache.
async fn single_connection_client() -> Option<Arc<dyn DatabaseClient>> {
    connect(1).await
}

async fn connect(max_connections: u32) -> Option<Arc<dyn DatabaseClient>> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return None;
    };
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await
        .unwrap();
    let client = PgClient::new(pool);
    MIGRATED
        .get_or_init(|| async {
            let entities = [Owner::DESCRIPTOR, PetType::DESCRIPTOR, Pet::DESCRIPTOR, Visit::DESCRIPTOR];
            apply_migrations(&client, &entities).await.unwrap();
        })
        .await;
    Some(Arc::new(client))
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[tokio::test]
async fn saved_owner_round_trips() {
    let Some(client) = client().await else { return };
    let repo = EntityRepository::<Owner>::new(client);
    let owner = Owner {
        id: None,
        first_name: Some("Harold".into()),
        last_name: Some("Davis".into()),
        address: Some("563 Friendly St.".into()),
        city: Some("Windsor".into()),
        telephone: Some("6085553198".into()),
    };
    let saved = repo.save(&owner).await.unwrap();
    let id = saved.id.expect("database assigns an id");
    let found = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found, Owner { id: Some(id), ..owner });
    assert!(repo.delete_by_id(id).await.unwrap());
    assert_eq!(repo.find_by_id(id).await.unwrap(), None);
}

#[tokio::test]
async fn adjacent_pages_are_disjoint() {
    let Some(client) = client().await else { return };
    let repo = EntityRepository::<PetType>::new(client);
    let mut created = Vec::new();
    for name in ["lizard", "snake", "bird", "hamster", "rabbit"] {
        let saved = repo
            .save(&PetType { id: None, name: Some(name.into()) })
            .await
            .unwrap();
        created.push(saved.id.unwrap());
    }

    let first = PageRequest::new(0, 2).unwrap();
    let page0: Vec<PetType> = repo.find_all(Some(&first)).unwrap().try_collect().await.unwrap();
    let page1: Vec<PetType> = repo.find_all(Some(&first.next())).unwrap().try_collect().await.unwrap();
    assert!(page0.len() <= 2 && page1.len() <= 2);
    let ids0: HashSet<_> = page0.iter().filter_map(|t| t.id).collect();
    assert!(page1.iter().filter_map(|t| t.id).all(|id| !ids0.contains(&id)));

    for id in created {
        repo.delete_by_id(id).await.unwrap();
    }
}

#[tokio::test]
async fn missing_id_is_absent() {
    let Some(client) = client().await else { return };
    let repo = EntityRepository::<PetType>::new(client);
    assert_eq!(repo.find_by_id(i64::MAX).await.unwrap(), None);
    assert!(!repo.exists_by_id(i64::MAX).await.unwrap());
}

#[tokio::test]
async fn pet_foreign_keys_go_from_null_to_set_on_one_connection() {
    let Some(client) = single_connection_client().await else { return };
    let types = EntityRepository::<PetType>::new(client.clone());
    let pets = EntityRepository::<Pet>::new(client);
    let kind = types
        .save(&PetType { id: None, name: Some("iguana".into()) })
        .await
        .unwrap();

    let stray = Pet {
        id: None,
        name: Some("Nobody".into()),
        birth_date: date(2020, 5, 1),
        type_id: None,
        owner_id: None,
    };
    let stray = pets.save(&stray).await.unwrap();
    assert_eq!((stray.type_id, stray.owner_id), (None, None));

    let typed = Pet {
        id: None,
        name: Some("Iggy".into()),
        birth_date: date(2021, 6, 2),
        type_id: kind.id,
        owner_id: Some(1),
    };
    let typed = pets.save(&typed).await.unwrap();
    assert_eq!(pets.find_by_id(typed.id.unwrap()).await.unwrap().unwrap().type_id, kind.id);

    let adopted = pets.save(&Pet { type_id: kind.id, ..stray.clone() }).await.unwrap();
    assert_eq!(adopted.type_id, kind.id);
    let released = pets.save(&Pet { type_id: None, ..adopted }).await.unwrap();
    assert_eq!(released.type_id, None);

    for id in [stray.id, typed.id].into_iter().flatten() {
        pets.delete_by_id(id).await.unwrap();
    }
    types.delete_by_id(kind.id.unwrap()).await.unwrap();
}

#[tokio::test]
async fn visit_round_trips_with_and_without_date_and_pet() {
    let Some(client) = single_connection_client().await else { return };
    let visits = EntityRepository::<Visit>::new(client);

    let blank = Visit {
        id: None,
        visit_date: None,
        description: Some("walk-in".into()),
        pet_id: None,
    };
    let blank = visits.save(&blank).await.unwrap();
    let found = visits.find_by_id(blank.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found, blank);
    assert_eq!((found.visit_date, found.pet_id), (None, None));

    let booked = Visit {
        id: None,
        visit_date: date(2013, 1, 4),
        description: Some("spayed".into()),
        pet_id: Some(7),
    };
    let booked = visits.save(&booked).await.unwrap();
    let found = visits.find_by_id(booked.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found.visit_date, date(2013, 1, 4));
    assert_eq!(found.pet_id, Some(7));

    let moved = visits
        .save(&Visit { visit_date: date(2013, 1, 5), pet_id: Some(8), ..blank.clone() })
        .await
        .unwrap();
    assert_eq!((moved.visit_date, moved.pet_id), (date(2013, 1, 5), Some(8)));

    for id in [blank.id, booked.id].into_iter().flatten() {
        visits.delete_by_id(id).await.unwrap();
    }
}
