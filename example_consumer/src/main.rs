//! Demo server: the three built-in resources with sample rows, in memory by default or
//! in PostgreSQL when `DATABASE_URL` is set.
//!
//! Run from repo root: `cargo run -p example-consumer`

use chrono::NaiveDate;
use crud_sdk::models::{
    employee, subscriber, user, Employee, EmployeeCreate, EmployeePosition, Subscriber, SubscriberCreate, User,
    UserCreate,
};
use crud_sdk::{
    build_app, ensure_schema, init_tracing, AppState, MemoryStore, ModelRegistry, PageParams, PgStore, Resource,
    ResourceService, Settings, Store, StoreError,
};
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;

type BoxError = Box<dyn Error + Send + Sync>;

const PG_SCHEMA: &str = "crud";

struct Stores {
    users: Arc<dyn Store<User>>,
    employees: Arc<dyn Store<Employee>>,
    subscribers: Arc<dyn Store<Subscriber>>,
}

async fn pg_store<R: Resource>(pool: &sqlx::PgPool, table: &str) -> Result<Arc<dyn Store<R>>, StoreError> {
    let store = PgStore::<R>::new(pool.clone(), PG_SCHEMA, table)?;
    store.ensure_table().await?;
    Ok(Arc::new(store))
}

async fn open_stores(settings: &Settings) -> Result<Stores, BoxError> {
    let Some(url) = settings.database_url.as_deref() else {
        tracing::info!("no DATABASE_URL; using in-memory stores");
        return Ok(Stores {
            users: Arc::new(MemoryStore::new()),
            employees: Arc::new(MemoryStore::new()),
            subscribers: Arc::new(MemoryStore::new()),
        });
    };
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await?;
    ensure_schema(&pool, PG_SCHEMA).await?;
    tracing::info!(schema = PG_SCHEMA, "using PostgreSQL stores");
    Ok(Stores {
        users: pg_store(&pool, "users").await?,
        employees: pg_store(&pool, "employees").await?,
        subscribers: pg_store(&pool, "subscribers").await?,
    })
}

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, BoxError> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("invalid date {}-{}-{}", y, m, d).into())
}

/// Create `rows` through the service unless the store already holds something.
async fn seed<R: Resource>(store: &Arc<dyn Store<R>>, rows: Vec<R::Create>) -> Result<(), BoxError> {
    let service = ResourceService::<R, _>::new(store.clone());
    if service.list_typed(PageParams { offset: 0, limit: 1 }).await?.total > 0 {
        return Ok(());
    }
    let count = rows.len();
    for row in rows {
        service.create_typed(row).await?;
    }
    tracing::info!(kind = R::KIND, count, "sample data added");
    Ok(())
}

async fn seed_samples(stores: &Stores) -> Result<(), BoxError> {
    let person = |first: &str, last: &str| UserCreate {
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
    };
    seed(
        &stores.users,
        vec![person("John", "Doe"), person("Jane", "Smith"), person("Bob", "Johnson")],
    )
    .await?;

    let staff = |first: &str,
                 last: &str,
                 department: &str,
                 position: EmployeePosition,
                 hire_date: NaiveDate,
                 contract_end_date: Option<NaiveDate>| EmployeeCreate {
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        department: department.into(),
        position,
        hire_date,
        contract_end_date,
    };
    seed(
        &stores.employees,
        vec![
            staff(
                "Alice",
                "Williams",
                "Engineering",
                EmployeePosition::SeniorSpecialist,
                date(2021, 3, 15)?,
                Some(date(2025, 3, 15)?),
            ),
            staff("David", "Brown", "Marketing", EmployeePosition::Manager, date(2022, 6, 1)?, None),
            staff(
                "Emma",
                "Davis",
                "HR",
                EmployeePosition::Analyst,
                date(2020, 9, 10)?,
                Some(date(2026, 9, 10)?),
            ),
        ],
    )
    .await?;

    let member = |name: &str, email: &str, plan: &str, is_active: bool| SubscriberCreate {
        name: name.into(),
        email: email.into(),
        subscription_type: plan.into(),
        is_active,
    };
    seed(
        &stores.subscribers,
        vec![
            member("Michael Wilson", "michael.wilson@example.com", "Premium", true),
            member("Sarah Taylor", "sarah.taylor@example.com", "Basic", true),
            member("James Anderson", "james.anderson@example.com", "Premium", false),
        ],
    )
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = Settings::from_env()?;
    init_tracing(settings.debug);

    let stores = open_stores(&settings).await?;
    seed_samples(&stores).await?;

    let mut registry = ModelRegistry::new();
    user::register_with_store(&mut registry, stores.users)?;
    employee::register_with_store(&mut registry, stores.employees)?;
    subscriber::register_with_store(&mut registry, stores.subscribers)?;

    let addr = settings.bind_addr();
    let state = AppState::new(registry, settings);
    let app = build_app(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
