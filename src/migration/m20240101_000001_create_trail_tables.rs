use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_column(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Salt).blob().not_null())
                    .col(ColumnDef::new(Users::HashedPassword).blob().not_null())
                    .col(
                        ColumnDef::new(Users::IsAdministrator)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bundles::Table)
                    .if_not_exists()
                    .col(id_column(Bundles::Id))
                    .col(text_column(Bundles::Name))
                    .col(text_column(Bundles::Info))
                    .col(text_column(Bundles::ImageUrl))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Paths::Table)
                    .if_not_exists()
                    .col(id_column(Paths::Id))
                    .col(text_column(Paths::Name))
                    .col(text_column(Paths::Info))
                    .col(text_column(Paths::Length))
                    .col(text_column(Paths::Duration))
                    .col(text_column(Paths::ImageUrl))
                    .col(ColumnDef::new(Paths::Polyline).blob().not_null())
                    .col(ColumnDef::new(Paths::BundleId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_paths_bundle_id")
                            .from(Paths::Table, Paths::BundleId)
                            .to(Bundles::Table, Bundles::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Places::Table)
                    .if_not_exists()
                    .col(id_column(Places::Id))
                    .col(text_column(Places::Name))
                    .col(text_column(Places::Info))
                    .col(
                        ColumnDef::new(Places::Radius)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Places::Position).blob().not_null())
                    .col(ColumnDef::new(Places::PathId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_places_path_id")
                            .from(Places::Table, Places::PathId)
                            .to(Paths::Table, Paths::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Places::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Paths::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bundles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}

fn id_column(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn text_column(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name)
        .string_len(255)
        .not_null()
        .default("")
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Salt,
    HashedPassword,
    IsAdministrator,
}

#[derive(DeriveIden)]
enum Bundles {
    Table,
    Id,
    Name,
    Info,
    ImageUrl,
}

#[derive(DeriveIden)]
enum Paths {
    Table,
    Id,
    Name,
    Info,
    Length,
    Duration,
    ImageUrl,
    Polyline,
    BundleId,
}

#[derive(DeriveIden)]
enum Places {
    Table,
    Id,
    Name,
    Info,
    Radius,
    Position,
    PathId,
}
