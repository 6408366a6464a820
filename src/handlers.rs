use crate::advice::{advise, weekly_summary};
use crate::calendar::{grid_days, records_on, ViewKind};
use crate::errors::AppError;
use crate::models::{
    CalendarDayResponse, CalendarQuery, CalendarResponse, HealthMessageResponse, MessageQuery,
    NewRecordRequest, Record, RecordResponse, StatsQuery, StatsResponse, UpdateRecordRequest,
};
use crate::period::{Period, PeriodKind};
use crate::state::AppState;
use crate::stats::{records_in_range, DailyStats, ShapeStats};
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate, NaiveTime};

const USER_HEADER: &str = "x-user-id";

pub async fn index() -> Html<String> {
    Html(render_index(&Local::now().date_naive().to_string()))
}

pub async fn list_records(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let user = require_user(&headers)?;
    let data = state.data.lock().await;

    // Reference ordering: newest date first, same-day order as inserted.
    let mut records = data.user_records(&user).to_vec();
    records.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(Json(records.iter().map(RecordResponse::from_record).collect()))
}

pub async fn create_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewRecordRequest>,
) -> Result<Json<RecordResponse>, AppError> {
    let user = require_user(&headers)?;
    let date = parse_date(&payload.date)?;
    let time = parse_time(&payload.time)?;
    let notes = payload.notes.filter(|notes| !notes.trim().is_empty());

    let mut data = state.data.lock().await;
    let record = Record {
        id: data.allocate_id(),
        date,
        time,
        shape: payload.shape,
        notes,
    };
    data.users.entry(user).or_default().push(record.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(RecordResponse::from_record(&record)))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<Json<RecordResponse>, AppError> {
    let user = require_user(&headers)?;
    let date = payload.date.as_deref().map(parse_date).transpose()?;
    let time = payload.time.as_deref().map(parse_time).transpose()?;

    let mut data = state.data.lock().await;
    let response = {
        let record = data
            .users
            .get_mut(&user)
            .and_then(|records| records.iter_mut().find(|record| record.id == id))
            .ok_or_else(|| AppError::not_found(format!("no record with id {id}")))?;

        if let Some(date) = date {
            record.date = date;
        }
        if let Some(time) = time {
            record.time = time;
        }
        if let Some(shape) = payload.shape {
            record.shape = shape;
        }
        if let Some(notes) = payload.notes {
            record.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        }
        RecordResponse::from_record(record)
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(response))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = require_user(&headers)?;

    let mut data = state.data.lock().await;
    let removed = data
        .users
        .get_mut(&user)
        .map(|records| {
            let before = records.len();
            records.retain(|record| record.id != id);
            records.len() < before
        })
        .unwrap_or(false);
    if !removed {
        return Err(AppError::not_found(format!("no record with id {id}")));
    }
    persist_data(&state.data_path, &data).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_all_records(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let user = require_user(&headers)?;

    let mut data = state.data.lock().await;
    data.users.remove(&user);
    persist_data(&state.data_path, &data).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let user = require_user(&headers)?;
    let reference = query.date.unwrap_or_else(today);
    let kind = query.period.unwrap_or(PeriodKind::Week);

    let data = state.data.lock().await;
    let period = Period::resolve(reference, kind);
    let subset = records_in_range(data.user_records(&user), period.start, period.end);
    let shape = ShapeStats::aggregate(&subset);
    let daily = DailyStats::aggregate(&subset);
    let advice = advise(&shape, &daily);

    Ok(Json(StatsResponse { period, shape, daily, advice }))
}

pub async fn get_health_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MessageQuery>,
) -> Result<Json<HealthMessageResponse>, AppError> {
    let user = require_user(&headers)?;
    let reference = query.date.unwrap_or_else(today);

    let data = state.data.lock().await;
    let period = Period::resolve(reference, PeriodKind::Week);
    let subset = records_in_range(data.user_records(&user), period.start, period.end);

    Ok(Json(HealthMessageResponse {
        week_start: period.start.to_string(),
        week_end: period.end.to_string(),
        message: weekly_summary(&subset),
    }))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let user = require_user(&headers)?;
    let view = query.view.unwrap_or(ViewKind::Week);
    let reference = query.date.unwrap_or_else(today);
    let selected = query.selected.unwrap_or(reference);

    let data = state.data.lock().await;
    let records = data.user_records(&user);
    let days = grid_days(view, reference, selected)
        .into_iter()
        .map(|day| CalendarDayResponse {
            date: day.to_string(),
            records: records_on(records, day)
                .iter()
                .map(RecordResponse::from_record)
                .collect(),
        })
        .collect();

    Ok(Json(CalendarResponse { view, days }))
}

fn require_user(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::unauthorized("missing X-User-Id header"))
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("invalid date '{value}', expected YYYY-MM-DD")))
}

fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::bad_request(format!("invalid time '{value}', expected HH:MM")))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
