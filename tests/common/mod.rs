#![allow(dead_code)]

pub mod temp_files {
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Scratch directory removed on drop
    pub fn scratch_dir() -> TempDir {
        tempfile::Builder::new()
            .prefix("restprovider_test_")
            .tempdir()
            .unwrap()
    }

    /// Write `content` to `dir/name` and return the path
    pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Every file below `root`, relative and sorted
    pub fn list_files(root: &Path) -> Vec<PathBuf> {
        fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
            for entry in std::fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(root, &path, out);
                } else {
                    out.push(path.strip_prefix(root).unwrap().to_path_buf());
                }
            }
        }
        let mut out = Vec::new();
        if root.exists() {
            walk(root, root, &mut out);
        }
        out.sort();
        out
    }
}

pub mod fixtures {
    use std::path::PathBuf;

    pub fn petstore_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/petstore")
    }

    pub fn petstore_api() -> PathBuf {
        petstore_dir().join("openapi.yaml")
    }

    pub fn petstore_provider() -> PathBuf {
        petstore_dir().join("provider.yaml")
    }

    /// Files every petstore run produces, sorted
    pub fn petstore_files() -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = [
            "Makefile",
            "main.go",
            "go.mod",
            "internal/provider/shared.go",
            "internal/provider/openapi.yaml",
            "internal/provider/provider.go",
            "internal/provider/resource_pet.go",
            "internal/provider/data_source_pet.go",
            "internal/provider/resource_order.go",
            "internal/provider/data_source_order.go",
            "internal/provider/resource_user.go",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        files.sort();
        files
    }

    /// Minimal single-entity API used by the widget scenarios
    pub const WIDGET_API_JSON: &str = r##"{
  "openapi": "3.1.0",
  "info": { "title": "Widget Service", "version": "1.0.0" },
  "paths": {
    "/widget": {
      "post": {
        "requestBody": {
          "content": {
            "application/json": {
              "schema": { "$ref": "#/components/schemas/Widget" }
            }
          }
        },
        "responses": {
          "201": {
            "description": "created",
            "content": {
              "application/json": {
                "schema": { "$ref": "#/components/schemas/Widget" }
              }
            }
          }
        }
      }
    },
    "/widget/{id}": {
      "get": {
        "responses": {
          "200": {
            "description": "ok",
            "content": {
              "application/json": {
                "schema": { "$ref": "#/components/schemas/Widget" }
              }
            }
          }
        }
      },
      "delete": { "responses": { "204": { "description": "deleted" } } }
    }
  },
  "components": {
    "schemas": {
      "Widget": {
        "type": "object",
        "required": ["label"],
        "properties": {
          "id": { "type": "string", "readOnly": true },
          "label": { "type": "string" },
          "weight": { "type": "number", "nullable": true },
          "enabled": { "type": "boolean" }
        }
      }
    }
  }
}
"##;

    pub const WIDGET_PROVIDER: &str = r#"global:
  uri: https://widgets.example.com
  create_method: POST
  read_method: GET
  destroy_method: DELETE
  id_attribute: id
resources:
  widget:
    path: /widget
    force_recreate: true
"#;
}
