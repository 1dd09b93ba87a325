use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Node {
    Table,
    Nid,
    Bundle,
    Title,
    BodyValue,
    BodyFormat,
    FieldName,
    Status,
    Uid,
    Created,
    FieldAddress,
}

#[derive(DeriveIden)]
enum Paragraph {
    Table,
    Id,
    Bundle,
    FieldColony,
    FieldHouseNo,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Node::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Node::Nid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Node::Bundle).string().not_null())
                    .col(ColumnDef::new(Node::Title).string().not_null())
                    .col(ColumnDef::new(Node::BodyValue).text().not_null())
                    .col(ColumnDef::new(Node::BodyFormat).string().not_null())
                    .col(ColumnDef::new(Node::FieldName).string().not_null())
                    .col(ColumnDef::new(Node::Status).boolean().not_null())
                    .col(ColumnDef::new(Node::Uid).big_integer().not_null())
                    .col(ColumnDef::new(Node::Created).big_integer().not_null())
                    .col(ColumnDef::new(Node::FieldAddress).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_node_bundle_status_created")
                    .table(Node::Table)
                    .col(Node::Bundle)
                    .col(Node::Status)
                    .col(Node::Created)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Paragraph::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Paragraph::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Paragraph::Bundle).string().not_null())
                    .col(ColumnDef::new(Paragraph::FieldColony).string().not_null())
                    .col(ColumnDef::new(Paragraph::FieldHouseNo).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Paragraph::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Node::Table).to_owned())
            .await
    }
}
