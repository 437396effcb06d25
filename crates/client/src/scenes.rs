// =============================================================================
// Atelier Client - Scenes API
// =============================================================================
// Table of Contents:
// 1. Types
// 2. Scenes API Functions
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::SyncClient;

// -----------------------------------------------------------------------------
// 1. Types
// -----------------------------------------------------------------------------

/// Camera position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

/// Object placement in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

/// Surface appearance of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: String,
    pub roughness: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: "#cccccc".to_string(),
            roughness: 0.5,
        }
    }
}

/// A single editable object in the scene.
///
/// This schema is owned by the editor; the backend stores the object list as
/// an opaque payload and round-trips it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub geometry: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub material: Material,
}

/// The editor's in-memory scene state, as synced to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalScene {
    pub name: Option<String>,
    pub objects: Vec<SceneObject>,
    pub camera_position: CameraPosition,
    pub view_mode: Option<String>,
}

/// Save request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSceneRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub scene_objects: Vec<SceneObject>,
    pub camera_position: CameraPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<String>,
}

/// Save response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSceneResponse {
    pub success: bool,
    pub scene_id: String,
    pub message: String,
}

/// A stored scene as returned by load.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub id: String,
    pub name: String,
    pub scene_objects: Vec<SceneObject>,
    pub camera_position: CameraPosition,
    pub view_mode: String,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSceneResponse {
    pub success: bool,
    pub scene: SceneSnapshot,
}

/// Scene listing entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSummary {
    pub id: String,
    pub name: String,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListScenesResponse {
    pub success: bool,
    pub scenes: Vec<SceneSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSceneResponse {
    pub success: bool,
    pub message: String,
}

// -----------------------------------------------------------------------------
// 2. Scenes API Functions
// -----------------------------------------------------------------------------

/// Save a scene. A request without `scene_id` creates a new record.
pub async fn save_scene(
    client: &SyncClient,
    request: &SaveSceneRequest,
) -> Result<SaveSceneResponse, ApiError> {
    client.post("/api/scenes/save", request).await
}

/// Load a single scene by id.
pub async fn load_scene(client: &SyncClient, scene_id: &str) -> Result<SceneSnapshot, ApiError> {
    let response: LoadSceneResponse = client
        .get(&format!("/api/scenes/load/{}", scene_id))
        .await?;
    Ok(response.scene)
}

/// List the caller's scenes, most recently modified first.
pub async fn list_scenes(client: &SyncClient) -> Result<Vec<SceneSummary>, ApiError> {
    let response: ListScenesResponse = client.get("/api/scenes/list").await?;
    Ok(response.scenes)
}

/// Delete a scene by id. Succeeds even if the scene is already gone.
pub async fn delete_scene(client: &SyncClient, scene_id: &str) -> Result<(), ApiError> {
    let _: DeleteSceneResponse = client
        .delete(&format!("/api/scenes/delete/{}", scene_id))
        .await?;
    Ok(())
}
