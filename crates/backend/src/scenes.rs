// =============================================================================
// Atelier Backend - Scenes API
// =============================================================================
// Save/load/list/delete for editor scenes. A save without an id creates; a
// save with an id upserts (create-on-miss). The returned sceneId is always
// authoritative and the client adopts it for the next autosave.
// =============================================================================

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::db::{Scene, SceneDraft, SceneSummary};
use crate::error::AppError;
use crate::AppState;

/// Display mode applied when a save omits one.
const DEFAULT_VIEW_MODE: &str = "solid";

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for CameraPosition {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 5.0,
            z: 10.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSceneRequest {
    pub scene_id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub scene_objects: Vec<serde_json::Value>,
    pub camera_position: Option<CameraPosition>,
    pub view_mode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSceneResponse {
    pub success: bool,
    pub scene_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub id: String,
    pub name: String,
    pub scene_objects: Vec<serde_json::Value>,
    pub camera_position: CameraPosition,
    pub view_mode: String,
    pub last_modified: DateTime<Utc>,
}

impl TryFrom<Scene> for SceneSnapshot {
    type Error = AppError;

    fn try_from(scene: Scene) -> Result<Self, AppError> {
        let scene_objects =
            serde_json::from_str(&scene.scene_objects).map_err(|_| AppError::Internal)?;

        Ok(Self {
            id: scene.id,
            name: scene.name,
            scene_objects,
            camera_position: CameraPosition {
                x: scene.camera_x,
                y: scene.camera_y,
                z: scene.camera_z,
            },
            view_mode: scene.view_mode,
            last_modified: scene.last_modified,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSceneResponse {
    pub success: bool,
    pub scene: SceneSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneListEntry {
    pub id: String,
    pub name: String,
    pub last_modified: DateTime<Utc>,
}

impl From<SceneSummary> for SceneListEntry {
    fn from(s: SceneSummary) -> Self {
        Self {
            id: s.id,
            name: s.name,
            last_modified: s.last_modified,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListScenesResponse {
    pub success: bool,
    pub scenes: Vec<SceneListEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSceneResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Save the caller's scene. Creates when no id is supplied, upserts otherwise.
pub async fn save_scene(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SaveSceneRequest>,
) -> Result<Json<SaveSceneResponse>, AppError> {
    let camera = req.camera_position.unwrap_or_default();
    let draft = SceneDraft {
        name: req.name,
        scene_objects: serde_json::to_string(&req.scene_objects)
            .map_err(|_| AppError::Internal)?,
        camera_x: camera.x,
        camera_y: camera.y,
        camera_z: camera.z,
        view_mode: req
            .view_mode
            .unwrap_or_else(|| DEFAULT_VIEW_MODE.to_string()),
    };

    let scene = match req.scene_id.as_deref() {
        Some(id) => state.db.upsert_scene(id, &user.user_id, draft).await?,
        None => state.db.create_scene(&user.user_id, draft).await?,
    };

    tracing::debug!(scene_id = %scene.id, owner = %user.user_id, "Scene saved");

    Ok(Json(SaveSceneResponse {
        success: true,
        scene_id: scene.id,
        message: "Scene saved".to_string(),
    }))
}

/// Load a single scene owned by the caller.
pub async fn load_scene(
    State(state): State<AppState>,
    user: AuthUser,
    Path(scene_id): Path<String>,
) -> Result<Json<LoadSceneResponse>, AppError> {
    let scene = state
        .db
        .find_scene_by_id(&scene_id, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(LoadSceneResponse {
        success: true,
        scene: scene.try_into()?,
    }))
}

/// List the caller's scenes, most recently modified first.
pub async fn list_scenes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ListScenesResponse>, AppError> {
    let scenes = state.db.list_scenes_by_owner(&user.user_id).await?;

    Ok(Json(ListScenesResponse {
        success: true,
        scenes: scenes.into_iter().map(Into::into).collect(),
    }))
}

/// Delete a scene. Idempotent: unknown and foreign ids report success.
pub async fn delete_scene(
    State(state): State<AppState>,
    user: AuthUser,
    Path(scene_id): Path<String>,
) -> Result<Json<DeleteSceneResponse>, AppError> {
    state.db.delete_scene(&scene_id, &user.user_id).await?;

    Ok(Json(DeleteSceneResponse {
        success: true,
        message: "Scene deleted".to_string(),
    }))
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
