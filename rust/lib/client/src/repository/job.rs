use nework_core::{AppError, Job};

use crate::api::ApiClient;
use crate::transport::ApiRequest;

#[derive(Clone)]
pub struct JobRepository {
    api: ApiClient,
}

impl JobRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Jobs of the signed-in user.
    pub async fn my_jobs(&self) -> Result<Vec<Job>, AppError> {
        self.api.fetch_list(ApiRequest::get("api/my/jobs")).await
    }

    pub async fn for_user(&self, user_id: i64) -> Result<Vec<Job>, AppError> {
        self.api
            .fetch_list(ApiRequest::get(format!("api/{}/jobs", user_id)))
            .await
    }

    pub async fn save(&self, job: &Job) -> Result<Job, AppError> {
        let body = serde_json::to_value(job).map_err(|_| AppError::Unknown)?;
        self.api.fetch(ApiRequest::post("api/my/jobs").json(body)).await
    }

    pub async fn remove_by_id(&self, id: i64) -> Result<(), AppError> {
        self.api.execute(ApiRequest::delete(format!("api/my/jobs/{}", id))).await
    }
}
