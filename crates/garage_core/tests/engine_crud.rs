use garage_core::db::open_db_in_memory;
use garage_core::{
    CarEngineRequest, CarRepository, CarRequest, EngineRepository, EngineRequest, EngineService,
    ErrorKind, MissingRecord, RepoError, SqliteCarRepository, SqliteEngineRepository,
    ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn engine_request(displacement: i64) -> EngineRequest {
    EngineRequest {
        displacement,
        number_of_cylinders: 4,
        car_range: 550,
    }
}

fn engine_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM engines;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEngineRepository::try_new(&conn).unwrap();

    let created = repo.create_engine(&engine_request(1600)).unwrap();
    assert!(!created.engine_id.is_nil());
    assert_eq!(created.displacement, 1600);

    let loaded = repo.get_engine(created.engine_id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn every_create_generates_a_fresh_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEngineRepository::try_new(&conn).unwrap();

    let first = repo.create_engine(&engine_request(1600)).unwrap();
    let second = repo.create_engine(&engine_request(1600)).unwrap();
    assert_ne!(first.engine_id, second.engine_id);
}

#[test]
fn invalid_request_is_rejected_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEngineRepository::try_new(&conn).unwrap();

    let err = repo
        .create_engine(&EngineRequest {
            displacement: 1500,
            number_of_cylinders: 0,
            car_range: 400,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::CylindersNotPositive)
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(engine_count(&conn), 0);
}

#[test]
fn update_replaces_all_attributes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEngineRepository::try_new(&conn).unwrap();
    let created = repo.create_engine(&engine_request(1600)).unwrap();

    let replacement = EngineRequest {
        displacement: 3000,
        number_of_cylinders: 6,
        car_range: 720,
    };
    let updated = repo.update_engine(created.engine_id, &replacement).unwrap();
    assert_eq!(updated.engine_id, created.engine_id);
    assert_eq!(updated.displacement, 3000);
    assert_eq!(updated.number_of_cylinders, 6);
    assert_eq!(updated.car_range, 720);
    assert_eq!(repo.get_engine(created.engine_id).unwrap(), updated);
}

#[test]
fn update_validation_failure_leaves_row_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEngineRepository::try_new(&conn).unwrap();
    let created = repo.create_engine(&engine_request(1600)).unwrap();

    let err = repo
        .update_engine(
            created.engine_id,
            &EngineRequest {
                displacement: 2000,
                number_of_cylinders: 4,
                car_range: 0,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::CarRangeNotPositive)
    ));
    assert_eq!(repo.get_engine(created.engine_id).unwrap(), created);
}

#[test]
fn missing_engine_reports_not_found_for_every_operation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEngineRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    let get_err = repo.get_engine(missing).unwrap_err();
    assert!(matches!(get_err, RepoError::NotFound(MissingRecord::Engine(id)) if id == missing));

    let update_err = repo.update_engine(missing, &engine_request(1600)).unwrap_err();
    assert!(matches!(update_err, RepoError::NotFound(MissingRecord::Engine(id)) if id == missing));

    let delete_err = repo.delete_engine(missing).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound(MissingRecord::Engine(id)) if id == missing));
    assert_eq!(delete_err.to_string(), format!("engine not found: {missing}"));
}

#[test]
fn delete_removes_standalone_engine() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEngineRepository::try_new(&conn).unwrap();
    let created = repo.create_engine(&engine_request(1600)).unwrap();

    repo.delete_engine(created.engine_id).unwrap();
    assert!(repo.get_engine(created.engine_id).unwrap_err().is_not_found());
    assert!(repo.delete_engine(created.engine_id).unwrap_err().is_not_found());
}

#[test]
fn engine_owned_by_car_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let car_repo = SqliteCarRepository::try_new(&conn).unwrap();
    let car = car_repo
        .create_car(&CarRequest {
            name: "Golf".to_string(),
            year: "2018".to_string(),
            brand: "Volkswagen".to_string(),
            fuel_type: "diesel".to_string(),
            engine: CarEngineRequest {
                engine_id: None,
                displacement: 1968,
                number_of_cylinders: 4,
                car_range: 900,
            },
            price: 15500.0,
        })
        .unwrap();

    let engine_repo = SqliteEngineRepository::try_new(&conn).unwrap();
    let err = engine_repo.delete_engine(car.engine.engine_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);

    assert_eq!(
        engine_repo.get_engine(car.engine.engine_id).unwrap(),
        car.engine
    );
    assert_eq!(car_repo.get_car(car.id).unwrap().engine, car.engine);
    assert!(conn.is_autocommit());
}

#[test]
fn service_delete_checks_existence_first() {
    let conn = open_db_in_memory().unwrap();
    let service = EngineService::new(SqliteEngineRepository::try_new(&conn).unwrap());

    let created = service.create_engine(&engine_request(1200)).unwrap();
    service.delete_engine(created.engine_id).unwrap();

    let err = service.delete_engine(created.engine_id).unwrap_err();
    assert!(err.is_not_found());
}
