use nework_core::{AppError, Event};

use crate::api::ApiClient;
use crate::transport::ApiRequest;

#[derive(Clone)]
pub struct EventRepository {
    api: ApiClient,
}

impl EventRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all(&self) -> Result<Vec<Event>, AppError> {
        self.api.fetch_list(ApiRequest::get("api/events")).await
    }

    pub async fn latest(&self, count: u32) -> Result<Vec<Event>, AppError> {
        self.api
            .fetch_list(ApiRequest::get("api/events/latest").query("count", count))
            .await
    }

    pub async fn newer(&self, id: i64, count: u32) -> Result<Vec<Event>, AppError> {
        self.api
            .fetch_list(ApiRequest::get(format!("api/events/{}/newer", id)).query("count", count))
            .await
    }

    pub async fn before(&self, id: i64, count: u32) -> Result<Vec<Event>, AppError> {
        self.api
            .fetch_list(ApiRequest::get(format!("api/events/{}/before", id)).query("count", count))
            .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Event, AppError> {
        self.api.fetch(ApiRequest::get(format!("api/events/{}", id))).await
    }

    pub async fn save(&self, event: &Event) -> Result<Event, AppError> {
        let body = serde_json::to_value(event).map_err(|_| AppError::Unknown)?;
        self.api.fetch(ApiRequest::post("api/events").json(body)).await
    }

    pub async fn remove_by_id(&self, id: i64) -> Result<(), AppError> {
        self.api.execute(ApiRequest::delete(format!("api/events/{}", id))).await
    }

    pub async fn like_by_id(&self, id: i64) -> Result<Event, AppError> {
        self.api.fetch(ApiRequest::post(format!("api/events/{}/likes", id))).await
    }

    pub async fn dislike_by_id(&self, id: i64) -> Result<Event, AppError> {
        self.api.fetch(ApiRequest::delete(format!("api/events/{}/likes", id))).await
    }

    pub async fn participate(&self, id: i64) -> Result<Event, AppError> {
        self.api
            .fetch(ApiRequest::post(format!("api/events/{}/participants", id)))
            .await
    }

    pub async fn cancel_participation(&self, id: i64) -> Result<Event, AppError> {
        self.api
            .fetch(ApiRequest::delete(format!("api/events/{}/participants", id)))
            .await
    }
}
