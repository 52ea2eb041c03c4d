use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, QueryOrder, entity::prelude::*};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "intervention_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub intervention_id: i64,
    pub user_id: i64,

    pub content: String,
    pub message_type: MessageType,

    /// Assigned by the store at persistence time. The log for an
    /// intervention is totally ordered by (timestamp, id); the id tiebreak
    /// keeps the order strict when two writes land on the same clock tick.
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "message_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MessageType {
    #[sea_orm(string_value = "client_message")]
    ClientMessage,

    #[sea_orm(string_value = "employee_message")]
    EmployeeMessage,

    #[sea_orm(string_value = "system_message")]
    SystemMessage,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::intervention::Entity",
        from = "Column::InterventionId",
        to = "super::intervention::Column::Id"
    )]
    Intervention,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::intervention::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Intervention.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Appends a message to the intervention's log. The log is append-only;
    /// there is no update path.
    pub async fn create(
        db: &DbConn,
        intervention_id: i64,
        user_id: i64,
        content: &str,
        message_type: MessageType,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            intervention_id: Set(intervention_id),
            user_id: Set(user_id),
            content: Set(content.to_owned()),
            message_type: Set(message_type),
            timestamp: Set(Utc::now()),
            is_read: Set(false),
            ..Default::default()
        };

        active.insert(db).await
    }

    pub async fn find_all_for_intervention(
        db: &DbConn,
        intervention_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::InterventionId.eq(intervention_id))
            .order_by_asc(Column::Timestamp)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn count_for_intervention(db: &DbConn, intervention_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::InterventionId.eq(intervention_id))
            .count(db)
            .await
    }
}
