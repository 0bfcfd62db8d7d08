use chrono::{DateTime, Utc};
use pixel_grid::{Config, Grid};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ProjectId;

/// A saved pixel-art project.
///
/// Projects are owned by the caller: the server builds one from a session
/// on request and never stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[schema(value_type = String)]
    pub id: ProjectId,
    pub name: String,
    #[schema(value_type = Object)]
    pub grid: Grid,
    /// Source image as a data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
    #[schema(value_type = Object)]
    pub config: Config,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 1x PNG export as a data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>, grid: Grid, config: Config) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::generate(),
            name: name.into(),
            grid,
            source_image: None,
            config,
            created_at: now,
            updated_at: now,
            thumbnail: None,
        }
    }

    pub fn with_source_image(mut self, data_url: impl Into<String>) -> Self {
        self.source_image = Some(data_url.into());
        self
    }

    pub fn with_thumbnail(mut self, data_url: impl Into<String>) -> Self {
        self.thumbnail = Some(data_url.into());
        self
    }

    /// Replace the grid and bump `updated_at`.
    pub fn update_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_grid::{Color, GridBuilder, Palette};

    fn grid(index: usize) -> Grid {
        let palette = Palette::new(&[Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]).unwrap();
        GridBuilder::new(2, 2, palette).filled(index).unwrap()
    }

    #[test]
    fn test_new_project_timestamps() {
        let project = Project::new("cat", grid(0), Config::default());
        assert_eq!(project.created_at, project.updated_at);
        assert!(project.thumbnail.is_none());
        assert!(project.id.as_str().starts_with("prj_"));
    }

    #[test]
    fn test_update_grid_bumps_updated_at() {
        let mut project = Project::new("cat", grid(0), Config::default());
        let created = project.created_at;
        project.update_grid(grid(1));
        assert!(project.updated_at >= created);
        assert_eq!(project.grid, grid(1));
    }

    #[test]
    fn test_project_json_shape() {
        let project = Project::new("cat", grid(0), Config::new(2, 2, 2))
            .with_thumbnail("data:image/png;base64,AAAA");
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["name"], "cat");
        assert_eq!(json["config"]["colorCount"], 2);
        assert_eq!(json["grid"]["width"], 2);
        assert!(json["createdAt"].is_string());
        assert!(json.get("sourceImage").is_none());
        assert_eq!(json["thumbnail"], "data:image/png;base64,AAAA");

        let back: Project = serde_json::from_value(json).unwrap();
        assert_eq!(back, project);
    }
}
