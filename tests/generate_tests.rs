mod common;

use common::fixtures::{
    petstore_api, petstore_files, petstore_provider, WIDGET_API_JSON, WIDGET_PROVIDER,
};
use common::temp_files::{list_files, scratch_dir, write_file};
use restprovider::generator::{generate_provider, sha256_hex, GenerateOptions, GeneratorInputs};
use restprovider::GenError;
use std::fs;
use std::path::{Path, PathBuf};

fn options(open_api: PathBuf, provider_spec: PathBuf, out: &Path) -> GenerateOptions {
    GenerateOptions {
        open_api,
        provider_spec,
        output_directory: out.to_path_buf(),
        ..GenerateOptions::default()
    }
}

#[test]
fn test_generate_petstore_tree() {
    let dir = scratch_dir();
    let out = dir.path().join("terraform-provider-petstore");
    let report = generate_provider(&options(petstore_api(), petstore_provider(), &out)).unwrap();

    assert_eq!(list_files(&out), petstore_files());
    assert_eq!(report.artifacts.len(), 11);
    for artifact in &report.artifacts {
        let contents = fs::read(out.join(&artifact.path)).unwrap();
        assert_eq!(artifact.sha256, sha256_hex(&contents));
    }
    assert_eq!(
        fs::read_to_string(out.join("internal/provider/openapi.yaml")).unwrap(),
        fs::read_to_string(petstore_api()).unwrap()
    );
}

#[test]
fn test_regeneration_is_byte_identical_and_overwrites() {
    let dir = scratch_dir();
    let out = dir.path().join("out");
    let opts = options(petstore_api(), petstore_provider(), &out);

    generate_provider(&opts).unwrap();
    let first: Vec<Vec<u8>> = petstore_files()
        .iter()
        .map(|p| fs::read(out.join(p)).unwrap())
        .collect();

    fs::write(out.join("main.go"), "stale").unwrap();
    generate_provider(&opts).unwrap();
    let second: Vec<Vec<u8>> = petstore_files()
        .iter()
        .map(|p| fs::read(out.join(p)).unwrap())
        .collect();

    assert_eq!(first, second);
    assert_eq!(list_files(&out), petstore_files());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = scratch_dir();
    let out = dir.path().join("out");
    let report = generate_provider(&GenerateOptions {
        dry_run: true,
        ..options(petstore_api(), petstore_provider(), &out)
    })
    .unwrap();

    assert_eq!(report.artifacts.len(), 11);
    assert!(report.total_bytes() > 0);
    assert!(!out.exists());
}

#[test]
fn test_template_dir_overrides_one_template() {
    let dir = scratch_dir();
    let templates = dir.path().join("templates");
    write_file(
        &templates,
        "go.mod.txt",
        "module {{ ctx.provider.module_path }}\n\ngo 1.23\n",
    );
    let out = dir.path().join("out");
    generate_provider(&GenerateOptions {
        template_dir: Some(templates),
        ..options(petstore_api(), petstore_provider(), &out)
    })
    .unwrap();

    assert_eq!(
        fs::read_to_string(out.join("go.mod")).unwrap(),
        "module github.com/example/terraform-provider-petstore\n\ngo 1.23\n"
    );
    assert!(fs::read_to_string(out.join("main.go"))
        .unwrap()
        .contains("registry.terraform.io/example/petstore"));
}

#[test]
fn test_missing_template_dir_is_an_error() {
    let dir = scratch_dir();
    let out = dir.path().join("out");
    let err = generate_provider(&GenerateOptions {
        template_dir: Some(dir.path().join("nope")),
        ..options(petstore_api(), petstore_provider(), &out)
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("does not exist"));
    assert!(!out.exists());
}

#[test]
fn test_invalid_configuration_fails_before_writing() {
    let dir = scratch_dir();
    let provider = write_file(
        dir.path(),
        "provider.yaml",
        "global:\n  uri: not a uri\n  create_method: POST\n  read_method: GET\n  update_method: PUT\n  destroy_method: DELETE\n  id_attribute: id\nresources:\n  pet:\n    path: pet\n",
    );
    let out = dir.path().join("out");
    let err = generate_provider(&options(petstore_api(), provider, &out)).unwrap_err();

    match err.downcast_ref::<GenError>() {
        Some(GenError::ConfigValidation { issues }) => {
            assert_eq!(issues.len(), 2, "{issues:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(list_files(&out).is_empty());
}

#[test]
fn test_widget_json_description() {
    let dir = scratch_dir();
    let api = write_file(dir.path(), "widget.json", WIDGET_API_JSON);
    let provider = write_file(dir.path(), "provider.yaml", WIDGET_PROVIDER);
    let out = dir.path().join("out");
    generate_provider(&options(api, provider, &out)).unwrap();

    let files = list_files(&out);
    assert!(files.contains(&PathBuf::from("internal/provider/openapi.json")));
    assert_eq!(files.len(), 8);

    let resource = fs::read_to_string(out.join("internal/provider/resource_widget.go")).unwrap();
    assert!(resource.contains("expandPath(\"/widget/{id}\""));
    assert!(resource.contains("Update not supported"));
    assert!(resource.contains("Weight types.Float64 `tfsdk:\"weight\"`"));
    assert!(resource.contains("Enabled types.Bool `tfsdk:\"enabled\"`"));
}

#[test]
fn test_widget_check_resolves_each_entity_artifact() {
    let dir = scratch_dir();
    let api = write_file(dir.path(), "widget.json", WIDGET_API_JSON);
    let provider = write_file(dir.path(), "provider.yaml", WIDGET_PROVIDER);
    let inputs = GeneratorInputs::load(&api, &provider).unwrap();

    let counts = inputs.check().unwrap();
    assert_eq!(
        counts,
        vec![
            (PathBuf::from("internal/provider/resource_widget.go"), 4),
            (PathBuf::from("internal/provider/data_source_widget.go"), 4),
        ]
    );
}

#[test]
fn test_lookup_failure_keeps_fixed_artifacts() {
    let dir = scratch_dir();
    let api = write_file(dir.path(), "widget.json", WIDGET_API_JSON);
    let provider = write_file(
        dir.path(),
        "provider.yaml",
        &format!("{WIDGET_PROVIDER}  gadget:\n    path: /gadget\n    force_recreate: true\n"),
    );
    let out = dir.path().join("out");
    let err = generate_provider(&options(api, provider, &out)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<GenError>(),
        Some(GenError::SchemaLookup { entity, .. }) if entity == "gadget"
    ));
    let files = list_files(&out);
    assert!(files.contains(&PathBuf::from("internal/provider/resource_widget.go")));
    assert!(!files
        .iter()
        .any(|p| p.to_string_lossy().contains("gadget")));
}

#[test]
fn test_data_source_only_entity_without_create_method_writes_nothing() {
    let dir = scratch_dir();
    let api = write_file(dir.path(), "widget.json", WIDGET_API_JSON);
    let provider = write_file(
        dir.path(),
        "provider.yaml",
        "global:\n  read_method: GET\n  id_attribute: id\nresources:\n  widget:\n    path: /widget\n    generate_resource: false\n    force_recreate: true\n",
    );
    let out = dir.path().join("out");
    let err = generate_provider(&options(api, provider, &out)).unwrap_err();

    match err.downcast_ref::<GenError>() {
        Some(GenError::ConfigValidation { issues }) => {
            assert_eq!(issues.len(), 1, "{issues:?}");
            assert!(issues[0].contains("no HTTP method for create"), "{issues:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out.exists());
}

#[test]
fn test_data_source_only_entity_generates_data_source() {
    let dir = scratch_dir();
    let api = write_file(dir.path(), "widget.json", WIDGET_API_JSON);
    let provider = write_file(
        dir.path(),
        "provider.yaml",
        "global:\n  create_method: POST\n  read_method: GET\n  id_attribute: id\nresources:\n  widget:\n    path: /widget\n    generate_resource: false\n    force_recreate: true\n",
    );
    let out = dir.path().join("out");
    generate_provider(&options(api, provider, &out)).unwrap();

    let files = list_files(&out);
    assert_eq!(files.len(), 7);
    assert!(files.contains(&PathBuf::from("internal/provider/data_source_widget.go")));
    assert!(!files.contains(&PathBuf::from("internal/provider/resource_widget.go")));
}
