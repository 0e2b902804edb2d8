pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_trail_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Bookkeeping table for the trail schema, kept apart from any host migrations.
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("trail_store_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_trail_tables::Migration)]
    }
}
