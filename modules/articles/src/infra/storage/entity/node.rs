use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "node")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub nid: i32,
    pub bundle: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body_value: String,
    pub body_format: String,
    pub field_name: String,
    pub status: bool,
    pub uid: i64,
    /// Unix seconds.
    pub created: i64,
    /// Paragraph id of the address, if any.
    pub field_address: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
