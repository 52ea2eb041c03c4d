use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::DeriveActiveEnum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "interventions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub title: String,
    pub description: String,
    /// Free-form problem category (e.g. Technical, Billing).
    pub problem_type: String,

    pub priority: Priority,
    pub status: InterventionStatus,

    pub created_by: i64,
    pub assigned_to: Option<i64>,

    pub chat_ended_by_employee: bool,
    pub chat_ended_at: Option<DateTime<Utc>>,
    /// Client rating recorded once the chat is closed. Last write wins.
    pub chat_rating: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "intervention_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InterventionStatus {
    #[sea_orm(string_value = "open")]
    Open,

    #[sea_orm(string_value = "in_progress")]
    InProgress,

    #[sea_orm(string_value = "waiting_for_client")]
    WaitingForClient,

    #[sea_orm(string_value = "waiting_for_employee")]
    WaitingForEmployee,

    #[sea_orm(string_value = "resolved")]
    Resolved,

    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "priority")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,

    #[sea_orm(string_value = "medium")]
    Medium,

    #[sea_orm(string_value = "high")]
    High,

    #[sea_orm(string_value = "urgent")]
    Urgent,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        created_by: i64,
        title: &str,
        description: &str,
        problem_type: &str,
        priority: Priority,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            title: Set(title.to_owned()),
            description: Set(description.to_owned()),
            problem_type: Set(problem_type.to_owned()),
            priority: Set(priority),
            status: Set(InterventionStatus::Open),
            created_by: Set(created_by),
            assigned_to: Set(None),
            chat_ended_by_employee: Set(false),
            chat_ended_at: Set(None),
            chat_rating: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            resolved_at: Set(None),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, intervention_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(intervention_id).one(db).await
    }

    /// Assigns an employee and moves the intervention into progress. Appends
    /// a system note to the message log, as assignment is visible in chat.
    pub async fn assign_employee(
        db: &DbConn,
        intervention_id: i64,
        employee_id: i64,
        assigned_by: i64,
        employee_name: &str,
    ) -> Result<Model, DbErr> {
        let model = require(db, intervention_id).await?;

        let mut active_model: ActiveModel = model.into();
        active_model.assigned_to = Set(Some(employee_id));
        active_model.status = Set(InterventionStatus::InProgress);
        active_model.updated_at = Set(Utc::now());
        let updated = active_model.update(db).await?;

        super::intervention_message::Model::create(
            db,
            intervention_id,
            assigned_by,
            &format!("Intervention assigned to {employee_name}"),
            super::intervention_message::MessageType::SystemMessage,
        )
        .await?;

        Ok(updated)
    }

    pub async fn set_status(
        db: &DbConn,
        intervention_id: i64,
        status: InterventionStatus,
    ) -> Result<Model, DbErr> {
        let model = require(db, intervention_id).await?;

        let mut active_model: ActiveModel = model.into();
        if status == InterventionStatus::Resolved {
            active_model.resolved_at = Set(Some(Utc::now()));
        }
        active_model.status = Set(status);
        active_model.updated_at = Set(Utc::now());
        active_model.update(db).await
    }

    /// Marks the chat as ended by an employee and closes the intervention.
    pub async fn end_chat_by_employee(db: &DbConn, intervention_id: i64) -> Result<Model, DbErr> {
        let model = require(db, intervention_id).await?;
        let now = Utc::now();

        let mut active_model: ActiveModel = model.into();
        active_model.chat_ended_by_employee = Set(true);
        active_model.chat_ended_at = Set(Some(now));
        active_model.status = Set(InterventionStatus::Closed);
        active_model.updated_at = Set(now);
        active_model.update(db).await
    }

    /// Records the client's chat rating. Overwrites any previous value.
    pub async fn set_rating(
        db: &DbConn,
        intervention_id: i64,
        rating: i32,
    ) -> Result<Model, DbErr> {
        let model = require(db, intervention_id).await?;

        let mut active_model: ActiveModel = model.into();
        active_model.chat_rating = Set(Some(rating));
        active_model.updated_at = Set(Utc::now());
        active_model.update(db).await
    }

    pub fn is_closed(&self) -> bool {
        self.status == InterventionStatus::Closed
    }

    /// True if `user_id` created this intervention or is assigned to it.
    pub fn is_participant(&self, user_id: i64) -> bool {
        self.created_by == user_id || self.assigned_to == Some(user_id)
    }
}

async fn require(db: &DbConn, intervention_id: i64) -> Result<Model, DbErr> {
    Entity::find_by_id(intervention_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Intervention not found".to_string()))
}
