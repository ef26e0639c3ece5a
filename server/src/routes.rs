use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use log::info;
use machine_learning::app;
use serde::Serialize;

use crate::{error::Result, state::AppState};

/// The body of a successful prediction, one output row per input row.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: Vec<Vec<f32>>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/prediction/:input_value", get(prediction))
        .with_state(state)
}

async fn prediction(
    State(state): State<AppState>,
    Path(input_value): Path<f32>,
) -> Result<Json<PredictionResponse>> {
    let prediction = app::predict(&state.model, &[[input_value]])?;
    info!("API called, prediction: {prediction:?}");

    Ok(Json(PredictionResponse { prediction }))
}
