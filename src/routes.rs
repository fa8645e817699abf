use actix_web::{delete, error, get, post, put, web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::balance::{compute_trip_balances, Balances};
use crate::db::TripStore;
use crate::error::ApiError;
use crate::schemas::{ExpenseInput, NewTrip, ParticipantInput, Trip};

#[derive(Serialize)]
struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    message: &'static str,
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(Message {
        status: Some("OK"),
        message: "TripSplit API is running",
    })
}

#[post("")]
async fn create_trip(
    store: web::Data<TripStore>,
    json: web::Json<NewTrip>,
) -> Result<HttpResponse, ApiError> {
    let trip = json.into_inner().validate()?;
    store.insert(&trip).await?;
    Ok(HttpResponse::Created().json(trip))
}

#[get("")]
async fn list_trips(store: web::Data<TripStore>) -> Result<web::Json<Vec<Trip>>, ApiError> {
    Ok(web::Json(store.list().await?))
}

#[get("/{id}")]
async fn get_trip(
    store: web::Data<TripStore>,
    id: web::Path<String>,
) -> Result<web::Json<Trip>, ApiError> {
    Ok(web::Json(store.find(&id).await?))
}

#[delete("/{id}")]
async fn delete_trip(
    store: web::Data<TripStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    store.delete(&id).await?;
    Ok(HttpResponse::Ok().json(Message {
        status: None,
        message: "Trip deleted",
    }))
}

#[get("/{id}/balances")]
async fn get_balances(
    store: web::Data<TripStore>,
    id: web::Path<String>,
) -> Result<web::Json<Balances>, ApiError> {
    let trip = store.find(&id).await?;
    Ok(web::Json(compute_trip_balances(&trip)?))
}

#[post("/{id}/expenses")]
async fn add_expense(
    store: web::Data<TripStore>,
    id: web::Path<String>,
    expense: web::Json<ExpenseInput>,
) -> Result<HttpResponse, ApiError> {
    let mut trip = store.find(&id).await?;
    let expense = trip.add_expense(expense.into_inner())?;
    store.replace(&trip).await?;
    tracing::info!(trip = %trip.id, expense = %expense.id, "expense added");
    Ok(HttpResponse::Created().json(trip))
}

#[put("/{id}/expenses/{expense_id}")]
async fn update_expense(
    store: web::Data<TripStore>,
    path: web::Path<(String, String)>,
    expense: web::Json<ExpenseInput>,
) -> Result<web::Json<Trip>, ApiError> {
    let (id, expense_id) = path.into_inner();
    let mut trip = store.find(&id).await?;
    trip.update_expense(&expense_id, expense.into_inner())?;
    store.replace(&trip).await?;
    tracing::info!(trip = %trip.id, expense = %expense_id, "expense updated");
    Ok(web::Json(trip))
}

#[delete("/{id}/expenses/{expense_id}")]
async fn delete_expense(
    store: web::Data<TripStore>,
    path: web::Path<(String, String)>,
) -> Result<web::Json<Trip>, ApiError> {
    let (id, expense_id) = path.into_inner();
    let mut trip = store.find(&id).await?;
    trip.remove_expense(&expense_id)?;
    store.replace(&trip).await?;
    tracing::info!(trip = %trip.id, expense = %expense_id, "expense removed");
    Ok(web::Json(trip))
}

#[post("/{id}/participants")]
async fn add_participant(
    store: web::Data<TripStore>,
    id: web::Path<String>,
    json: web::Json<ParticipantInput>,
) -> Result<HttpResponse, ApiError> {
    let mut trip = store.find(&id).await?;
    trip.add_participant(&json.name)?;
    store.replace(&trip).await?;
    Ok(HttpResponse::Created().json(trip))
}

#[delete("/{id}/participants/{name}")]
async fn remove_participant(
    store: web::Data<TripStore>,
    path: web::Path<(String, String)>,
) -> Result<web::Json<Trip>, ApiError> {
    let (id, name) = path.into_inner();
    let mut trip = store.find(&id).await?;
    trip.remove_participant(&name)?;
    store.replace(&trip).await?;
    Ok(web::Json(trip))
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(health)
        .service(
        web::scope("/api/trips")
            .service(create_trip)
            .service(list_trips)
            .service(get_balances)
            .service(add_expense)
            .service(update_expense)
            .service(delete_expense)
            .service(add_participant)
            .service(remove_participant)
            .service(get_trip)
            .service(delete_trip),
    );
}
