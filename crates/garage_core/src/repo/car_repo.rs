//! Car repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Sole writer of both tables whenever a car is involved.
//! - Run every car write together with its engine write in one transaction.
//!
//! # Invariants
//! - A committed car always references an existing engine, and the pair is
//!   created and deleted together.
//! - Engine attribute updates are applied before the car row update.
//! - Update returns the engine state read back inside the same transaction.
//! - Brand listings carry no ordering guarantee.

use crate::db::{begin_write, commit, CancelToken};
use crate::model::car::{Car, CarId, CarRequest, FuelType};
use crate::model::engine::{Engine, EngineId};
use crate::model::validation::ValidationError;
use crate::repo::engine_repo::{delete_engine_row, insert_engine, load_engine, replace_engine};
use crate::repo::sql::{ensure_schema_ready, now_millis, parse_uuid, query_optional};
use crate::repo::{MissingRecord, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const CAR_COLUMNS: &str =
    "id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at";

const CAR_WITH_ENGINE_SQL: &str = "SELECT
    c.id AS id,
    c.name AS name,
    c.year AS year,
    c.brand AS brand,
    c.fuel_type AS fuel_type,
    c.engine_id AS engine_id,
    c.price AS price,
    c.created_at AS created_at,
    c.updated_at AS updated_at,
    e.displacement AS displacement,
    e.number_of_cylinders AS number_of_cylinders,
    e.car_range AS car_range
FROM cars c
INNER JOIN engines e ON e.id = c.engine_id";

/// Which engine columns a car row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineColumns {
    /// Joined `engines` columns are present.
    Joined,
    /// Only `cars.engine_id`; attributes stay zero.
    IdOnly,
}

/// Repository interface for car operations.
pub trait CarRepository {
    /// Loads one car with its engine.
    fn get_car(&self, id: CarId) -> RepoResult<Car>;
    /// Lists all cars of `brand`, optionally joining engine attributes.
    fn get_cars_by_brand(&self, brand: &str, include_engine: bool) -> RepoResult<Vec<Car>>;
    /// Creates one car together with a new engine.
    fn create_car(&self, request: &CarRequest) -> RepoResult<Car>;
    /// Replaces car fields and, when identified, its engine attributes.
    fn update_car(&self, id: CarId, request: &CarRequest) -> RepoResult<Car>;
    /// Deletes one car and the engine it owns.
    fn delete_car(&self, id: CarId) -> RepoResult<()>;
}

/// SQLite-backed car repository.
pub struct SqliteCarRepository<'conn> {
    conn: &'conn Connection,
    cancel: CancelToken,
}

impl<'conn> SqliteCarRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self {
            conn,
            cancel: CancelToken::new(),
        })
    }

    /// Aborts in-flight work once `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    fn checkpoint(&self) -> RepoResult<()> {
        Ok(self.cancel.check()?)
    }
}

impl CarRepository for SqliteCarRepository<'_> {
    fn get_car(&self, id: CarId) -> RepoResult<Car> {
        self.checkpoint()?;
        query_optional(
            self.conn,
            &format!("{CAR_WITH_ENGINE_SQL} WHERE c.id = ?1;"),
            [id.to_string()],
            |row| parse_car_row(row, EngineColumns::Joined),
        )?
        .ok_or(RepoError::NotFound(MissingRecord::Car(id)))
    }

    fn get_cars_by_brand(&self, brand: &str, include_engine: bool) -> RepoResult<Vec<Car>> {
        self.checkpoint()?;
        let (sql, columns) = if include_engine {
            (
                format!("{CAR_WITH_ENGINE_SQL} WHERE c.brand = ?1;"),
                EngineColumns::Joined,
            )
        } else {
            (
                format!("SELECT {CAR_COLUMNS} FROM cars WHERE brand = ?1;"),
                EngineColumns::IdOnly,
            )
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([brand])?;
        let mut cars = Vec::new();
        while let Some(row) = rows.next()? {
            cars.push(parse_car_row(row, columns)?);
        }
        Ok(cars)
    }

    fn create_car(&self, request: &CarRequest) -> RepoResult<Car> {
        let fuel_type = request.validate_for_create()?;
        let attributes = request.engine.attributes();

        let tx = begin_write(self.conn, &self.cancel)?;
        let engine_id = insert_engine(&tx, &attributes)?.engine_id;

        self.checkpoint()?;
        let now = now_millis();
        let car = query_optional(
            &tx,
            &format!(
                "INSERT INTO cars ({CAR_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                 RETURNING {CAR_COLUMNS};"
            ),
            params![
                Uuid::new_v4().to_string(),
                request.name.as_str(),
                request.year.as_str(),
                request.brand.as_str(),
                fuel_type.as_str(),
                engine_id.to_string(),
                request.price,
                now,
            ],
            |row| parse_car_row(row, EngineColumns::IdOnly),
        )?
        .ok_or_else(|| RepoError::InvalidData("car insert returned no row".to_string()))?;

        commit(tx, &self.cancel)?;

        Ok(Car {
            engine: Engine {
                engine_id,
                displacement: attributes.displacement,
                number_of_cylinders: attributes.number_of_cylinders,
                car_range: attributes.car_range,
            },
            ..car
        })
    }

    fn update_car(&self, id: CarId, request: &CarRequest) -> RepoResult<Car> {
        let fuel_type = request.validate_for_update()?;

        let tx = begin_write(self.conn, &self.cancel)?;
        let owned_engine_id = load_owned_engine_id(&tx, id)?;

        if let Some(engine_id) = request.engine.engine_id {
            if engine_id != owned_engine_id {
                return Err(ValidationError::EngineNotOwned {
                    car_id: id,
                    engine_id,
                }
                .into());
            }
            self.checkpoint()?;
            replace_engine(&tx, engine_id, &request.engine.attributes())?;
        }

        self.checkpoint()?;
        let car = update_car_row(&tx, id, request, fuel_type, owned_engine_id)?;

        self.checkpoint()?;
        let engine = load_engine(&tx, car.engine.engine_id)?;

        commit(tx, &self.cancel)?;
        Ok(Car { engine, ..car })
    }

    fn delete_car(&self, id: CarId) -> RepoResult<()> {
        let tx = begin_write(self.conn, &self.cancel)?;
        let engine_id = load_owned_engine_id(&tx, id)?;

        self.checkpoint()?;
        let changed = tx.execute("DELETE FROM cars WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(MissingRecord::Car(id)));
        }

        self.checkpoint()?;
        delete_engine_row(&tx, engine_id)?;

        commit(tx, &self.cancel)?;
        Ok(())
    }
}

fn load_owned_engine_id(conn: &Connection, car_id: CarId) -> RepoResult<EngineId> {
    query_optional(
        conn,
        "SELECT engine_id FROM cars WHERE id = ?1;",
        [car_id.to_string()],
        |row| parse_uuid(row, "engine_id"),
    )?
    .ok_or(RepoError::NotFound(MissingRecord::Car(car_id)))
}

fn update_car_row(
    conn: &Connection,
    id: CarId,
    request: &CarRequest,
    fuel_type: FuelType,
    engine_id: EngineId,
) -> RepoResult<Car> {
    // updated_at must move forward even when two writes share a millisecond.
    query_optional(
        conn,
        &format!(
            "UPDATE cars
             SET
                name = ?2,
                year = ?3,
                brand = ?4,
                fuel_type = ?5,
                engine_id = ?6,
                price = ?7,
                updated_at = MAX(?8, updated_at + 1)
             WHERE id = ?1
             RETURNING {CAR_COLUMNS};"
        ),
        params![
            id.to_string(),
            request.name.as_str(),
            request.year.as_str(),
            request.brand.as_str(),
            fuel_type.as_str(),
            engine_id.to_string(),
            request.price,
            now_millis(),
        ],
        |row| parse_car_row(row, EngineColumns::IdOnly),
    )?
    .ok_or(RepoError::NotFound(MissingRecord::Car(id)))
}

fn parse_car_row(row: &Row<'_>, columns: EngineColumns) -> RepoResult<Car> {
    let fuel_text: String = row.get("fuel_type")?;
    let fuel_type = FuelType::parse(&fuel_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid fuel type `{fuel_text}` in cars.fuel_type"))
    })?;

    let engine_id = parse_uuid(row, "engine_id")?;
    let engine = match columns {
        EngineColumns::Joined => Engine {
            engine_id,
            displacement: row.get("displacement")?,
            number_of_cylinders: row.get("number_of_cylinders")?,
            car_range: row.get("car_range")?,
        },
        EngineColumns::IdOnly => Engine {
            engine_id,
            ..Engine::default()
        },
    };

    Ok(Car {
        id: parse_uuid(row, "id")?,
        name: row.get("name")?,
        year: row.get("year")?,
        brand: row.get("brand")?,
        fuel_type,
        engine,
        price: row.get("price")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
