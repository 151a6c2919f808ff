use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_categories;
mod m20250601_000003_create_products;
mod m20250601_000004_create_orders;
mod m20250601_000005_create_order_lines;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_categories::Migration),
            Box::new(m20250601_000003_create_products::Migration),
            Box::new(m20250601_000004_create_orders::Migration),
            Box::new(m20250601_000005_create_order_lines::Migration),
        ]
    }
}
