use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    Address, Article, ArticlePatch, ArticleRecord, NewAddress, NewArticle,
};

pub const ARTICLE_UPDATED_MESSAGE: &str = "Article updated successfully.";
pub const ARTICLE_DELETED_MESSAGE: &str = "Article deleted";

/// Query string of `/api/articles`; an absent, blank or `0` id selects the list on GET.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleQuery {
    /// Article id
    pub id: Option<String>,
}

impl ArticleQuery {
    /// The trimmed id, `None` when absent or blank.
    pub fn lookup_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Id for retrieve-one. `0` names no article and reads as "no id".
    pub fn retrieve_id(&self) -> Option<&str> {
        self.lookup_id().filter(|s| *s != "0")
    }
}

/// Write request body: the article fields wrapped in `data`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleEnvelope {
    pub data: ArticlePayload,
}

/// Article fields accepted by create, replace and partial-update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ArticlePayload {
    pub title: Option<String>,
    pub body: Option<BodyPayload>,
    pub name: Option<String>,
    /// Only honoured on create.
    pub address: Option<AddressPayload>,
}

/// `{"value": "..."}` or a bare string.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum BodyPayload {
    Text(String),
    Rich { value: Option<String> },
}

impl BodyPayload {
    pub fn into_value(self) -> Option<String> {
        match self {
            BodyPayload::Text(value) => Some(value),
            BodyPayload::Rich { value } => value,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AddressPayload {
    pub field_colony: Option<String>,
    pub field_house_no: Option<String>,
}

/// Full article projection returned by retrieve and create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArticleDto {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub name: String,
    /// Creation time, unix seconds.
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressDto>,
}

/// GET response: one projection when an id is given, the list otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ArticleLookupDto {
    One(ArticleDto),
    List(Vec<ArticleDto>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddressDto {
    pub field_colony: String,
    pub field_house_no: String,
}

/// Summary returned by replace and partial-update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArticleUpdatedDto {
    pub message: String,
    pub nid: i64,
    pub title: String,
    pub body: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<ArticlePayload> for NewArticle {
    fn from(p: ArticlePayload) -> Self {
        Self {
            title: p.title,
            body: p.body.and_then(BodyPayload::into_value),
            name: p.name,
            address: p.address.map(|a| NewAddress {
                colony: a.field_colony,
                house_number: a.field_house_no,
            }),
        }
    }
}

impl From<ArticlePayload> for ArticlePatch {
    fn from(p: ArticlePayload) -> Self {
        Self {
            title: p.title,
            body: p.body.and_then(BodyPayload::into_value),
            name: p.name,
        }
    }
}

impl From<Address> for AddressDto {
    fn from(a: Address) -> Self {
        Self {
            field_colony: a.colony,
            field_house_no: a.house_number,
        }
    }
}

impl From<ArticleRecord> for ArticleDto {
    fn from(record: ArticleRecord) -> Self {
        let ArticleRecord { article, address } = record;
        Self {
            id: article.id.0,
            title: article.title,
            body: article.body.value,
            name: article.name,
            created: article.created_at.timestamp(),
            address: address.map(AddressDto::from),
        }
    }
}

impl From<Article> for ArticleUpdatedDto {
    fn from(article: Article) -> Self {
        Self {
            message: ARTICLE_UPDATED_MESSAGE.to_string(),
            nid: article.id.0,
            title: article.title,
            body: article.body.value,
            name: article.name,
        }
    }
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
