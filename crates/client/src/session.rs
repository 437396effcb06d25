// =============================================================================
// Atelier Client - Scene Session
// =============================================================================
// The identity of the active scene is explicit state threaded through the
// editor, not an ambient global. A session starts Unsaved (no id), adopts the
// id returned by the first save, and reuses it for every autosave after.
// =============================================================================

use crate::error::ApiError;
use crate::http::SyncClient;
use crate::scenes::{self, LocalScene, SaveSceneRequest, SceneSnapshot};

/// Persistence state of the scene currently open in the editor.
#[derive(Debug, Clone, Default)]
pub struct SceneSession {
    scene_id: Option<String>,
}

impl SceneSession {
    /// A session for a scene that has never been saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session resuming edits against an already-stored scene.
    pub fn attached(scene_id: impl Into<String>) -> Self {
        Self {
            scene_id: Some(scene_id.into()),
        }
    }

    /// The stored identifier of this scene, if it has one yet.
    pub fn scene_id(&self) -> Option<&str> {
        self.scene_id.as_deref()
    }

    /// Save the editor state, adopting the identifier the server returns.
    ///
    /// The server's answer is always authoritative: if the cached id went
    /// stale (scene deleted elsewhere), the save lands in a fresh record and
    /// the session switches to its id. A failed save leaves the session
    /// unchanged.
    pub async fn save(
        &mut self,
        client: &SyncClient,
        scene: &LocalScene,
    ) -> Result<&str, ApiError> {
        let request = SaveSceneRequest {
            scene_id: self.scene_id.clone(),
            name: scene.name.clone(),
            scene_objects: scene.objects.clone(),
            camera_position: scene.camera_position,
            view_mode: scene.view_mode.clone(),
        };

        let response = scenes::save_scene(client, &request).await?;
        Ok(self.scene_id.insert(response.scene_id).as_str())
    }

    /// Load a stored scene and return a session attached to it.
    pub async fn load(
        client: &SyncClient,
        scene_id: &str,
    ) -> Result<(Self, SceneSnapshot), ApiError> {
        let snapshot = scenes::load_scene(client, scene_id).await?;
        Ok((Self::attached(snapshot.id.clone()), snapshot))
    }

    /// Delete the stored scene, returning the session to Unsaved.
    ///
    /// A session with no id is a successful no-op, matching the server's
    /// idempotent delete.
    pub async fn remove(&mut self, client: &SyncClient) -> Result<(), ApiError> {
        if let Some(id) = self.scene_id.take() {
            scenes::delete_scene(client, &id).await?;
        }
        Ok(())
    }

    /// Drop the cached id without touching the server (e.g. "save as copy").
    pub fn forget(&mut self) {
        self.scene_id = None;
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::{CameraPosition, SceneObject};
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// sceneIds observed in incoming save bodies (None = create).
    type Seen = Arc<Mutex<Vec<Option<String>>>>;

    async fn mock_save(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
        let incoming = body
            .get("sceneId")
            .and_then(|v| v.as_str())
            .map(String::from);
        seen.lock().unwrap().push(incoming.clone());

        let id = incoming.unwrap_or_else(|| "scene-1".to_string());
        Json(json!({"success": true, "sceneId": id, "message": "Scene saved"}))
    }

    async fn mock_delete(Path(_id): Path<String>) -> Json<Value> {
        Json(json!({"success": true, "message": "Scene deleted"}))
    }

    async fn mock_load(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
        if id != "scene-1" {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(Json(json!({
            "success": true,
            "scene": {
                "id": "scene-1",
                "name": "Demo",
                "sceneObjects": [{"geometry": "box"}],
                "cameraPosition": {"x": 1.0, "y": 2.0, "z": 3.0},
                "viewMode": "wireframe",
                "lastModified": "2026-08-07T10:00:00Z",
            },
        })))
    }

    async fn mock_list() -> Json<Value> {
        Json(json!({
            "success": true,
            "scenes": [
                {"id": "scene-2", "name": "Newer", "lastModified": "2026-08-07T11:00:00Z"},
                {"id": "scene-1", "name": "Older", "lastModified": "2026-08-07T10:00:00Z"},
            ],
        }))
    }

    async fn spawn_mock() -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/api/scenes/save", post(mock_save))
            .route("/api/scenes/load/:id", get(mock_load))
            .route("/api/scenes/list", get(mock_list))
            .route("/api/scenes/delete/:id", delete(mock_delete))
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }

    fn scene() -> LocalScene {
        LocalScene {
            name: Some("Test".to_string()),
            objects: vec![SceneObject {
                geometry: "box".to_string(),
                transform: Default::default(),
                material: Default::default(),
            }],
            camera_position: Default::default(),
            view_mode: Some("solid".to_string()),
        }
    }

    #[tokio::test]
    async fn save_adopts_and_reuses_returned_id() {
        let (base_url, seen) = spawn_mock().await;
        let client = SyncClient::new(base_url, "token");
        let mut session = SceneSession::new();
        assert!(session.scene_id().is_none());

        let id = session.save(&client, &scene()).await.unwrap().to_string();
        assert_eq!(id, "scene-1");
        assert_eq!(session.scene_id(), Some("scene-1"));

        session.save(&client, &scene()).await.unwrap();

        let calls = seen.lock().unwrap().clone();
        assert_eq!(calls, vec![None, Some("scene-1".to_string())]);
    }

    #[tokio::test]
    async fn remove_returns_session_to_unsaved() {
        let (base_url, seen) = spawn_mock().await;
        let client = SyncClient::new(base_url, "token");
        let mut session = SceneSession::attached("scene-9");

        session.remove(&client).await.unwrap();
        assert!(session.scene_id().is_none());

        // Removing again is a no-op, and the next save is a create
        session.remove(&client).await.unwrap();
        session.save(&client, &scene()).await.unwrap();
        assert_eq!(seen.lock().unwrap().last().unwrap(), &None);
    }

    #[tokio::test]
    async fn failed_save_leaves_session_unchanged() {
        let app = Router::new().route(
            "/api/scenes/save",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = SyncClient::new(format!("http://{}", addr), "token");
        let mut session = SceneSession::new();

        let err = session.save(&client, &scene()).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
        assert!(session.scene_id().is_none());
    }

    #[tokio::test]
    async fn load_attaches_session() {
        let (base_url, _seen) = spawn_mock().await;
        let client = SyncClient::new(base_url, "token");

        let (session, snapshot) = SceneSession::load(&client, "scene-1").await.unwrap();
        assert_eq!(session.scene_id(), Some("scene-1"));
        assert_eq!(snapshot.name, "Demo");
        assert_eq!(snapshot.view_mode, "wireframe");
        assert_eq!(snapshot.scene_objects[0].geometry, "box");
        assert_eq!(snapshot.camera_position, CameraPosition { x: 1.0, y: 2.0, z: 3.0 });

        let err = SceneSession::load(&client, "missing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn list_preserves_server_order() {
        let (base_url, _seen) = spawn_mock().await;
        let client = SyncClient::new(base_url, "token");

        let scenes = scenes::list_scenes(&client).await.unwrap();
        let ids: Vec<&str> = scenes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["scene-2", "scene-1"]);
    }

    #[test]
    fn forget_drops_the_cached_id() {
        let mut session = SceneSession::attached("scene-3");
        session.forget();
        assert!(session.scene_id().is_none());
    }
}
