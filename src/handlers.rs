use crate::errors::AppError;
use crate::models::{
    filter_records, Calories, CreatedResponse, FilterQuery, LimitForm, LimitRequest,
    NewRecordForm, NewRecordRequest, Record, RecordId, RecordKind, Snapshot, MAX_CALORIE_LIMIT,
    MAX_RECORD_CALORIES,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(&tracker.snapshot()))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<Snapshot> {
    let tracker = state.tracker.lock().await;
    Json(tracker.snapshot())
}

pub async fn list_meals(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<Vec<Record>> {
    let tracker = state.tracker.lock().await;
    Json(filtered(tracker.ledger().meals(), &query))
}

pub async fn list_workouts(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<Vec<Record>> {
    let tracker = state.tracker.lock().await;
    Json(filtered(tracker.ledger().workouts(), &query))
}

pub async fn create_meal(
    State(state): State<AppState>,
    Json(payload): Json<NewRecordRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let name = validate_record(&payload.name, payload.calories)?;
    Ok(Json(add_record(&state, RecordKind::Meal, name, payload.calories).await?))
}

pub async fn create_workout(
    State(state): State<AppState>,
    Json(payload): Json<NewRecordRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let name = validate_record(&payload.name, payload.calories)?;
    Ok(Json(add_record(&state, RecordKind::Workout, name, payload.calories).await?))
}

pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(remove_record(&state, RecordKind::Meal, id).await?))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(remove_record(&state, RecordKind::Workout, id).await?))
}

pub async fn put_limit(
    State(state): State<AppState>,
    Json(payload): Json<LimitRequest>,
) -> Result<Json<Snapshot>, AppError> {
    let limit = validate_limit(payload.calorie_limit)?;
    Ok(Json(apply_limit(&state, limit).await?))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(apply_reset(&state).await?))
}

pub async fn meal_form(
    State(state): State<AppState>,
    Form(form): Form<NewRecordForm>,
) -> Result<Redirect, AppError> {
    let (name, calories) = parse_record_form(&form)?;
    add_record(&state, RecordKind::Meal, name, calories).await?;
    Ok(Redirect::to("/"))
}

pub async fn workout_form(
    State(state): State<AppState>,
    Form(form): Form<NewRecordForm>,
) -> Result<Redirect, AppError> {
    let (name, calories) = parse_record_form(&form)?;
    add_record(&state, RecordKind::Workout, name, calories).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_meal_form(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Redirect, AppError> {
    remove_record(&state, RecordKind::Meal, id).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_workout_form(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Redirect, AppError> {
    remove_record(&state, RecordKind::Workout, id).await?;
    Ok(Redirect::to("/"))
}

pub async fn limit_form(
    State(state): State<AppState>,
    Form(form): Form<LimitForm>,
) -> Result<Redirect, AppError> {
    let limit = parse_limit_form(&form)?;
    apply_limit(&state, limit).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_reset(&state).await?;
    Ok(Redirect::to("/"))
}

async fn add_record(
    state: &AppState,
    kind: RecordKind,
    name: String,
    calories: Calories,
) -> Result<CreatedResponse, AppError> {
    let mut tracker = state.tracker.lock().await;
    let record = match kind {
        RecordKind::Meal => tracker.add_meal(name, calories)?,
        RecordKind::Workout => tracker.add_workout(name, calories)?,
    };
    Ok(CreatedResponse {
        record,
        summary: tracker.snapshot(),
    })
}

async fn remove_record(
    state: &AppState,
    kind: RecordKind,
    id: RecordId,
) -> Result<Snapshot, AppError> {
    let mut tracker = state.tracker.lock().await;
    match kind {
        RecordKind::Meal => tracker.remove_meal(id)?,
        RecordKind::Workout => tracker.remove_workout(id)?,
    };
    Ok(tracker.snapshot())
}

async fn apply_limit(state: &AppState, limit: Calories) -> Result<Snapshot, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.set_limit(limit)?;
    Ok(tracker.snapshot())
}

async fn apply_reset(state: &AppState) -> Result<Snapshot, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.reset()?;
    Ok(tracker.snapshot())
}

fn filtered(records: &[Record], query: &FilterQuery) -> Vec<Record> {
    filter_records(records, query.filter.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .collect()
}

fn validate_record(name: &str, calories: Calories) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Please fill in all fields"));
    }
    if calories < 0 {
        return Err(AppError::bad_request("calories must not be negative"));
    }
    if calories > MAX_RECORD_CALORIES {
        return Err(AppError::bad_request(format!(
            "calories must not exceed {MAX_RECORD_CALORIES}"
        )));
    }
    Ok(name.to_string())
}

fn validate_limit(limit: Calories) -> Result<Calories, AppError> {
    if !(0..=MAX_CALORIE_LIMIT).contains(&limit) {
        return Err(AppError::bad_request(format!(
            "limit must be between 0 and {MAX_CALORIE_LIMIT}"
        )));
    }
    Ok(limit)
}

fn parse_record_form(form: &NewRecordForm) -> Result<(String, Calories), AppError> {
    let calories = form.calories.trim();
    if form.name.trim().is_empty() || calories.is_empty() {
        return Err(AppError::bad_request("Please fill in all fields"));
    }
    let calories = calories
        .parse::<Calories>()
        .map_err(|_| AppError::bad_request("calories must be a whole number"))?;
    let name = validate_record(&form.name, calories)?;
    Ok((name, calories))
}

fn parse_limit_form(form: &LimitForm) -> Result<Calories, AppError> {
    let limit = form.limit.trim();
    if limit.is_empty() {
        return Err(AppError::bad_request("Please add a limit"));
    }
    let limit = limit
        .parse::<Calories>()
        .map_err(|_| AppError::bad_request("limit must be a whole number"))?;
    validate_limit(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn form(name: &str, calories: &str) -> NewRecordForm {
        NewRecordForm {
            name: name.to_string(),
            calories: calories.to_string(),
        }
    }

    #[test]
    fn record_form_requires_both_fields() {
        for (name, calories) in [("", "200"), ("Salad", ""), ("   ", " ")] {
            let err = parse_record_form(&form(name, calories)).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "Please fill in all fields");
        }
    }

    #[test]
    fn record_form_parses_and_trims() {
        let (name, calories) = parse_record_form(&form("  Greek yogurt ", " 180 ")).unwrap();
        assert_eq!(name, "Greek yogurt");
        assert_eq!(calories, 180);
    }

    #[test]
    fn record_form_rejects_bad_calories() {
        let err = parse_record_form(&form("Apple", "ninety")).unwrap_err();
        assert_eq!(err.message, "calories must be a whole number");

        let err = parse_record_form(&form("Apple", "-90")).unwrap_err();
        assert_eq!(err.message, "calories must not be negative");
    }

    #[test]
    fn limit_form_validation() {
        let empty = LimitForm { limit: " ".into() };
        assert_eq!(parse_limit_form(&empty).unwrap_err().message, "Please add a limit");

        let junk = LimitForm { limit: "2k".into() };
        assert_eq!(
            parse_limit_form(&junk).unwrap_err().status,
            StatusCode::BAD_REQUEST
        );

        let ok = LimitForm { limit: "2200".into() };
        assert_eq!(parse_limit_form(&ok).unwrap(), 2200);
    }

    #[test]
    fn record_calories_are_bounded() {
        let err = validate_record("Buffet", MAX_RECORD_CALORIES + 1).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "calories must not exceed 100000");

        let err = validate_record("Buffet", Calories::MAX).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        assert_eq!(validate_record("Buffet", MAX_RECORD_CALORIES).unwrap(), "Buffet");

        let err = parse_record_form(&form("Buffet", "9223372036854775807")).unwrap_err();
        assert_eq!(err.message, "calories must not exceed 100000");
    }

    #[test]
    fn limit_is_bounded() {
        for limit in [-1, Calories::MIN, MAX_CALORIE_LIMIT + 1, Calories::MAX] {
            let err = validate_limit(limit).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "limit must be between 0 and 1000000");
        }
        assert_eq!(validate_limit(0).unwrap(), 0);
        assert_eq!(validate_limit(MAX_CALORIE_LIMIT).unwrap(), MAX_CALORIE_LIMIT);

        let negative = LimitForm { limit: "-500".into() };
        assert_eq!(
            parse_limit_form(&negative).unwrap_err().message,
            "limit must be between 0 and 1000000"
        );
    }

    #[test]
    fn filtered_clones_matching_records() {
        let records = vec![Record::meal("Banana bread", 350), Record::meal("Eggs", 200)];
        let query = FilterQuery {
            filter: Some("banana".into()),
        };
        let matched = filtered(&records, &query);
        assert_eq!(matched, vec![records[0].clone()]);
        assert_eq!(filtered(&records, &FilterQuery::default()).len(), 2);
    }
}
