use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Categories::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Categories::Name).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Categories::Slug).string_len(128).not_null().unique_key())
                    .col(ColumnDef::new(Categories::Description).text())
                    .col(ColumnDef::new(Categories::Color).string_len(7).not_null())
                    .col(timestamp(Categories::CreatedAt))
                    .col(timestamp(Categories::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Posts::Slug).string_len(128).not_null().unique_key())
                    .col(ColumnDef::new(Posts::Excerpt).text().not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::FeaturedImage).text())
                    .col(json_list(Posts::Images))
                    .col(ColumnDef::new(Posts::AuthorName).string_len(100).not_null())
                    .col(ColumnDef::new(Posts::AuthorAvatar).text())
                    .col(ColumnDef::new(Posts::Category).string_len(50).not_null())
                    .col(json_list(Posts::Tags))
                    .col(
                        ColumnDef::new(Posts::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Posts::PublishedAt).timestamp_with_time_zone())
                    .col(timestamp(Posts::CreatedAt))
                    .col(timestamp(Posts::UpdatedAt))
                    .col(ColumnDef::new(Posts::ReadingTime).integer().not_null().default(1))
                    .col(ColumnDef::new(Posts::Views).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::Likes).big_integer().not_null().default(0))
                    .check(Expr::col(Posts::Status).is_in(["draft", "published", "archived"]))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_category")
                    .table(Posts::Table)
                    .col(Posts::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_status_created_at")
                    .table(Posts::Table)
                    .col(Posts::Status)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GalleryImages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GalleryImages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GalleryImages::Url).text().not_null())
                    .col(ColumnDef::new(GalleryImages::Filename).string_len(255).not_null())
                    .col(ColumnDef::new(GalleryImages::Title).string_len(200))
                    .col(ColumnDef::new(GalleryImages::Description).text())
                    .col(ColumnDef::new(GalleryImages::Size).big_integer().not_null())
                    .col(ColumnDef::new(GalleryImages::Width).integer())
                    .col(ColumnDef::new(GalleryImages::Height).integer())
                    .col(json_list(GalleryImages::Tags))
                    .col(timestamp(GalleryImages::UploadedAt))
                    .col(timestamp(GalleryImages::CreatedAt))
                    .col(timestamp(GalleryImages::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GalleryImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

/// JSONB string array, empty by default.
fn json_list<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .json_binary()
        .not_null()
        .default(Expr::cust("'[]'::jsonb"))
        .to_owned()
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Color,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    Slug,
    Excerpt,
    Content,
    FeaturedImage,
    Images,
    AuthorName,
    AuthorAvatar,
    Category,
    Tags,
    Status,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
    ReadingTime,
    Views,
    Likes,
}

#[derive(DeriveIden)]
enum GalleryImages {
    Table,
    Id,
    Url,
    Filename,
    Title,
    Description,
    Size,
    Width,
    Height,
    Tags,
    UploadedAt,
    CreatedAt,
    UpdatedAt,
}
