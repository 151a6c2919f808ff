//! Demo data loader: menu categories, products and an admin account.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p restau-api --bin seed -- --admin-email admin@restau.local --admin-password secret
//! ```
//!
//! Safe to run repeatedly: rows that already exist (by name or email) are
//! left alone.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use restau_api::domain::repository::{CategoryRepository, ProductRepository, UserRepository};
use restau_api::domain::types::{NewCategory, NewProduct, ProductFilter};
use restau_api::state::AppState;
use restau_api::usecase::category::CreateCategoryUseCase;
use restau_api::usecase::product::CreateProductUseCase;
use restau_api::usecase::user::{CreateUserInput, CreateUserUseCase};
use restau_api_migration::Migrator;
use restau_auth_types::token::TokenTtl;
use restau_core::tracing::init_tracing;
use restau_domain::user::UserRole;

#[derive(Parser)]
#[command(about = "Load the demo menu and an admin account")]
struct Args {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Email of the admin account to create if absent
    #[arg(long, default_value = "admin@restau.local")]
    admin_email: String,

    /// Password of the admin account
    #[arg(long, env = "SEED_ADMIN_PASSWORD")]
    admin_password: String,

    /// Skip applying pending migrations first
    #[arg(long)]
    skip_migrations: bool,
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    /// Price in cents.
    cents: i64,
    stock: i32,
}

const fn product(
    name: &'static str,
    description: &'static str,
    cents: i64,
    stock: i32,
) -> SeedProduct {
    SeedProduct {
        name,
        description,
        cents,
        stock,
    }
}

const MENU: &[(&str, &str, &[SeedProduct])] = &[
    (
        "Entrées",
        "Délicieuses entrées",
        &[
            product("Bruschetta", "Pain grillé, tomates et basilic", 650, 40),
            product("Soupe à l'oignon", "Gratinée au comté", 750, 30),
            product("Salade César", "Poulet, parmesan et croûtons", 900, 35),
        ],
    ),
    (
        "Plats principaux",
        "Repas copieux",
        &[
            product("Poulet curry", "Riz basmati et légumes", 1450, 25),
            product("Steak frites", "Bavette sauce échalote", 1890, 20),
            product("Lasagnes", "Bolognaise maison", 1350, 18),
        ],
    ),
    (
        "Desserts",
        "Finissez en beauté",
        &[
            product("Tiramisu", "Mascarpone et café", 650, 30),
            product("Crème brûlée", "Vanille de Madagascar", 600, 25),
            product("Moelleux au chocolat", "Coeur coulant", 700, 20),
        ],
    ),
    (
        "Boissons",
        "Boissons fraîches et chaudes",
        &[
            product("Coca-Cola", "33 cl", 350, 100),
            product("Bière blonde", "Pression 25 cl", 500, 80),
            product("Eau gazeuse", "50 cl", 300, 100),
            product("Jus d’orange", "Pressé minute", 450, 60),
        ],
    ),
    (
        "Pizzas",
        "Pizzas artisanales",
        &[
            product("Margherita", "Tomate, mozzarella et basilic", 1100, 30),
            product("Reine", "Jambon et champignons", 1250, 30),
            product("4 Fromages", "Mozzarella, gorgonzola, chèvre et parmesan", 1390, 25),
            product("Calzone", "Chausson jambon, oeuf et fromage", 1350, 20),
        ],
    ),
    (
        "Burgers",
        "Burgers maison",
        &[
            product("Cheeseburger", "Cheddar affiné", 1200, 40),
            product("Double bacon burger", "Deux steaks et bacon fumé", 1590, 25),
            product("Veggie burger", "Galette de légumes", 1290, 20),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let db = Database::connect(&args.database_url)
        .await
        .context("connect to database")?;
    if !args.skip_migrations {
        Migrator::up(&db, None).await.context("apply migrations")?;
    }

    // Only the repositories are used; the token settings are never read.
    let state = AppState {
        db: Arc::new(db),
        jwt_secret: String::new(),
        token_ttl: TokenTtl::from_config(0, 0),
    };

    let mut categories_created = 0;
    let mut products_created = 0;

    for (category_name, category_description, products) in MENU {
        let category = match state.category_repo().find_by_name(category_name).await? {
            Some(existing) => existing,
            None => {
                categories_created += 1;
                CreateCategoryUseCase {
                    repo: state.category_repo(),
                }
                .execute(NewCategory {
                    name: (*category_name).to_owned(),
                    description: Some((*category_description).to_owned()),
                })
                .await?
            }
        };

        let existing = state
            .product_repo()
            .list(&ProductFilter {
                category_id: Some(category.id),
                ..Default::default()
            })
            .await?;

        for seed in products.iter() {
            if existing.iter().any(|p| p.name == seed.name) {
                continue;
            }
            CreateProductUseCase {
                products: state.product_repo(),
                categories: state.category_repo(),
            }
            .execute(NewProduct {
                name: seed.name.to_owned(),
                description: Some(seed.description.to_owned()),
                price: Decimal::new(seed.cents, 2),
                stock: seed.stock,
                category_id: category.id,
            })
            .await?;
            products_created += 1;
        }
    }

    let admin_email = args.admin_email.trim().to_lowercase();
    if state.user_repo().find_by_email(&admin_email).await?.is_none() {
        CreateUserUseCase {
            repo: state.user_repo(),
        }
        .execute(CreateUserInput {
            name: "Administrateur".into(),
            address: "1 rue du Restaurant".into(),
            phone: "0100000000".into(),
            email: admin_email.clone(),
            password: args.admin_password,
            role: UserRole::Admin,
        })
        .await?;
    } else {
        info!(email = %admin_email, "admin account already exists");
    }

    info!(categories_created, products_created, "seed complete");
    Ok(())
}
