//! Placeholder data for a fresh database.
//!
//! Users, customers and revenue are inserted only when their key is absent, so
//! re-running leaves existing rows untouched. Invoices have no natural key and
//! are only inserted into an empty table.

use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::entities::{customer, invoice, revenue, user, InvoiceStatus};
use crate::error::AppError;

/// bcrypt cost used for seeded passwords.
pub const SEED_HASH_COST: u32 = 10;

struct SeedUser {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
}

struct SeedCustomer {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    image_url: &'static str,
}

struct SeedInvoice {
    customer: usize, // index into CUSTOMERS
    amount: i32,
    status: InvoiceStatus,
    date: (i32, u32, u32),
}

const USERS: &[SeedUser] = &[SeedUser {
    id: "410544b2-4001-4271-9855-fec4b6a6442a",
    name: "User",
    email: "user@nextmail.com",
    password: "123456",
}];

const CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        id: "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa",
        name: "Evil Rabbit",
        email: "evil@rabbit.com",
        image_url: "/customers/evil-rabbit.png",
    },
    SeedCustomer {
        id: "3958dc9e-712f-4377-85e9-fec4b6a6442a",
        name: "Delba de Oliveira",
        email: "delba@oliveira.com",
        image_url: "/customers/delba-de-oliveira.png",
    },
    SeedCustomer {
        id: "3958dc9e-742f-4377-85e9-fec4b6a6442a",
        name: "Lee Robinson",
        email: "lee@robinson.com",
        image_url: "/customers/lee-robinson.png",
    },
    SeedCustomer {
        id: "76d65c26-f784-44a2-ac19-586678f7c2f2",
        name: "Michael Novotny",
        email: "michael@novotny.com",
        image_url: "/customers/michael-novotny.png",
    },
    SeedCustomer {
        id: "cc27c14a-0acf-4f4a-a6c9-d45682c144b9",
        name: "Amy Burns",
        email: "amy@burns.com",
        image_url: "/customers/amy-burns.png",
    },
    SeedCustomer {
        id: "13d07535-c59e-4157-a011-f8d2ef4e0cbb",
        name: "Balazs Orban",
        email: "balazs@orban.com",
        image_url: "/customers/balazs-orban.png",
    },
];

const INVOICES: &[SeedInvoice] = &[
    SeedInvoice { customer: 0, amount: 15795, status: InvoiceStatus::Pending, date: (2022, 12, 6) },
    SeedInvoice { customer: 1, amount: 20348, status: InvoiceStatus::Pending, date: (2022, 11, 14) },
    SeedInvoice { customer: 4, amount: 3040, status: InvoiceStatus::Paid, date: (2022, 10, 29) },
    SeedInvoice { customer: 3, amount: 44800, status: InvoiceStatus::Paid, date: (2023, 9, 10) },
    SeedInvoice { customer: 5, amount: 34577, status: InvoiceStatus::Pending, date: (2023, 8, 5) },
    SeedInvoice { customer: 2, amount: 54246, status: InvoiceStatus::Pending, date: (2023, 7, 16) },
    SeedInvoice { customer: 0, amount: 666, status: InvoiceStatus::Pending, date: (2023, 6, 27) },
    SeedInvoice { customer: 3, amount: 32545, status: InvoiceStatus::Paid, date: (2023, 6, 9) },
    SeedInvoice { customer: 4, amount: 1250, status: InvoiceStatus::Paid, date: (2023, 6, 17) },
    SeedInvoice { customer: 5, amount: 8546, status: InvoiceStatus::Paid, date: (2023, 6, 7) },
    SeedInvoice { customer: 1, amount: 500, status: InvoiceStatus::Paid, date: (2023, 8, 19) },
    SeedInvoice { customer: 5, amount: 8945, status: InvoiceStatus::Paid, date: (2023, 6, 3) },
    SeedInvoice { customer: 2, amount: 1000, status: InvoiceStatus::Paid, date: (2022, 6, 5) },
];

const REVENUE: &[(&str, i32)] = &[
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

/// Row counts written by one [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub customers: u64,
    pub invoices: u64,
    pub revenue: u64,
}

/// Seeds every table. `hash_cost` is the bcrypt cost for user passwords.
pub async fn run(db: &DatabaseConnection, hash_cost: u32) -> Result<SeedReport, AppError> {
    tracing::info!("Seeding started...");

    let report = SeedReport {
        users: seed_users(db, hash_cost).await?,
        customers: seed_customers(db).await?,
        invoices: seed_invoices(db).await?,
        revenue: seed_revenue(db).await?,
    };

    tracing::info!(?report, "Database seeded successfully");
    Ok(report)
}

async fn seed_users(db: &DatabaseConnection, hash_cost: u32) -> Result<u64, AppError> {
    let mut inserted = 0;
    for seed in USERS {
        let password = hash_password(seed.password.to_string(), hash_cost).await?;
        inserted += user::Entity::insert(user::ActiveModel {
            id: Set(seed.id.to_string()),
            name: Set(seed.name.to_string()),
            email: Set(seed.email.to_string()),
            password: Set(password),
        })
        .on_conflict(OnConflict::column(user::Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    }
    Ok(inserted)
}

async fn seed_customers(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let mut inserted = 0;
    for seed in CUSTOMERS {
        inserted += customer::Entity::insert(customer::ActiveModel {
            id: Set(seed.id.to_string()),
            name: Set(seed.name.to_string()),
            email: Set(seed.email.to_string()),
            image_url: Set(seed.image_url.to_string()),
        })
        .on_conflict(OnConflict::column(customer::Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    }
    Ok(inserted)
}

async fn seed_invoices(db: &DatabaseConnection) -> Result<u64, AppError> {
    if invoice::Entity::find().count(db).await? > 0 {
        tracing::info!("invoices already present, skipping");
        return Ok(0);
    }

    let mut rows = Vec::with_capacity(INVOICES.len());
    for seed in INVOICES {
        let (y, m, d) = seed.date;
        let date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| AppError::InternalError(format!("invalid seed date {y}-{m}-{d}")))?;
        rows.push(invoice::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            customer_id: Set(CUSTOMERS[seed.customer].id.to_string()),
            amount: Set(seed.amount),
            status: Set(seed.status),
            date: Set(date),
        });
    }

    Ok(invoice::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?)
}

async fn seed_revenue(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let mut inserted = 0;
    for (month, amount) in REVENUE {
        inserted += revenue::Entity::insert(revenue::ActiveModel {
            month: Set(month.to_string()),
            revenue: Set(*amount),
        })
        .on_conflict(OnConflict::column(revenue::Column::Month).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    }
    Ok(inserted)
}
