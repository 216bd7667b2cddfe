use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        string_len(Listings::Id, 50).primary_key().check(max_len(Listings::Id, 50)),
                    )
                    .col(string_len(Listings::Title, 255).check(max_len(Listings::Title, 255)))
                    .col(string_len(Listings::Year, 10).check(max_len(Listings::Year, 10)))
                    .col(string_len_null(Listings::Type, 50).check(max_len(Listings::Type, 50)))
                    .col(
                        string_len_null(Listings::PosterUrl, 500)
                            .check(max_len(Listings::PosterUrl, 500)),
                    )
                    .col(boolean_null(Listings::Active))
                    .col(text_null(Listings::Description))
                    .col(
                        string_len_null(Listings::Location, 100)
                            .check(max_len(Listings::Location, 100)),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Listings::Table).to_owned()).await?;
        Ok(())
    }
}

// SQLite ignores VARCHAR lengths.
fn max_len(col: Listings, len: u32) -> SimpleExpr {
    Expr::expr(Func::cust(Alias::new("length")).arg(Expr::col(col))).lte(len)
}

#[derive(DeriveIden)]
enum Listings {
    Table,
    Id,
    Title,
    Year,
    Type,
    PosterUrl,
    Active,
    Description,
    Location,
}
