use std::io::Cursor;
use std::path::Path as FsPath;
use std::sync::{Arc, PoisonError};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use padkit_cells::{CellError, Settings};
use padkit_core::Component;
use padkit_io::{read_gds, GdsWriter};
use padkit_render::component_svg;
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::error::ViewerError;
use crate::html;
use crate::AppState;

const SVG_WIDTH: f64 = 800.0;
const SVG_HEIGHT: f64 = 400.0;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/gds_list", get(gds_list))
        .route("/gds_current", get(gds_current))
        .route("/pdk", get(pdk))
        .route("/view/{cell_name}", get(view))
        .route("/update/{cell_name}", post(update))
        .route("/search", post(search))
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

async fn index() -> Html<String> {
    Html(html::index_page())
}

/// `*.gds` file names in `dir`, sorted. A missing directory lists nothing.
async fn list_gds_files(dir: &FsPath) -> Result<Vec<String>, ViewerError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".gds") {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

async fn gds_list(State(state): State<AppState>) -> Result<Html<String>, ViewerError> {
    let files = list_gds_files(&state.config.gds_dir).await?;
    Ok(Html(html::gds_list_page(
        &state.config.gds_dir.to_string_lossy(),
        &files,
    )))
}

async fn gds_current(State(state): State<AppState>) -> Response {
    let last = state
        .last_saved
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    match last.as_deref().and_then(FsPath::file_name) {
        Some(file) => found(&format!("/view/{}", file.to_string_lossy())),
        None => found("/"),
    }
}

async fn pdk(State(state): State<AppState>) -> Html<String> {
    Html(html::pdk_page(
        &state.pdk.name,
        &state.pdk.cell_names(),
        state.pdk.layers.all_layers(),
    ))
}

#[derive(Deserialize)]
struct ViewQuery {
    variant: Option<String>,
}

/// Stored variant, then an exported `.gds` file, then the PDK registry.
async fn resolve_component(
    state: &AppState,
    cell_name: &str,
    variant: Option<&str>,
) -> Result<Arc<Component>, ViewerError> {
    if let Some(component) = variant.and_then(|v| state.variants.get(v)) {
        return Ok(component);
    }

    if cell_name.ends_with(".gds") {
        let files = list_gds_files(&state.config.gds_dir).await?;
        if files.iter().any(|f| f == cell_name) {
            let bytes = tokio::fs::read(state.config.gds_dir.join(cell_name)).await?;
            let component = read_gds(Cursor::new(bytes))?;
            log::info!("Imported '{}' from {}", component.name, cell_name);
            return Ok(Arc::new(component));
        }
    }

    Ok(Arc::new(state.pdk.get_component(cell_name, &Settings::new())?))
}

async fn view(
    State(state): State<AppState>,
    Path(cell_name): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, ViewerError> {
    let variant = query.variant.as_deref();
    let component = resolve_component(&state, &cell_name, variant).await?;
    let svg = component_svg(&component, &state.pdk.layers, SVG_WIDTH, SVG_HEIGHT);
    Ok(Html(html::viewer_page(&cell_name, variant, &component, &svg)))
}

/// Interpret one form value: JSON for objects and lists, scalars for
/// booleans, null and numbers, otherwise the raw string.
pub fn parse_value(raw: &str) -> Result<Value, ViewerError> {
    let raw = raw.trim();
    if raw.starts_with('{') || raw.starts_with('[') {
        return serde_json::from_str(&raw.replace('\'', "\""))
            .map_err(|e| ViewerError::BadSettings(format!("{raw}: {e}")));
    }
    let value = match raw {
        "true" | "True" => Value::Bool(true),
        "false" | "False" => Value::Bool(false),
        "None" | "null" => Value::Null,
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::from(n)
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
                Value::Number(n)
            } else {
                Value::String(raw.to_string())
            }
        }
    };
    Ok(value)
}

/// Form fields to overrides; empty fields are skipped.
pub fn parse_settings(fields: &[(String, String)]) -> Result<Settings, ViewerError> {
    let mut settings = Settings::new();
    for (key, raw) in fields {
        if raw.trim().is_empty() {
            continue;
        }
        settings.insert(key.clone(), parse_value(raw)?);
    }
    Ok(settings)
}

async fn update(
    State(state): State<AppState>,
    Path(cell_name): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, ViewerError> {
    let settings = parse_settings(&fields)?;
    if settings.is_empty() {
        return Ok(found(&format!("/view/{cell_name}")));
    }

    let component = state.pdk.get_component(&cell_name, &settings)?;
    let name = component.name.clone();

    let mut buf = Vec::new();
    GdsWriter::new(&mut buf)
        .with_db_unit(state.db_unit_in_um)
        .with_library(&name)
        .write(&component)?;
    tokio::fs::create_dir_all(&state.config.gds_dir).await?;
    let path = state.config.gds_dir.join(format!("{name}.gds"));
    tokio::fs::write(&path, &buf).await?;
    log::info!("Saved variant '{}' to {}", name, path.display());

    *state
        .last_saved
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(path);
    state.variants.insert(&name, Arc::new(component));

    Ok(found(&format!("/view/{cell_name}?variant={name}")))
}

#[derive(Deserialize)]
struct SearchForm {
    name: String,
}

async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Response, ViewerError> {
    let name = form.name.trim();
    match state.pdk.get_component(name, &Settings::new()) {
        Ok(_) => {
            log::info!("Search '{name}': found");
            Ok(found(&format!("/view/{name}")))
        }
        Err(CellError::UnknownCell(_)) => {
            log::info!("Search '{name}': not found");
            Ok((StatusCode::NOT_FOUND, [(header::LOCATION, "/")]).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
