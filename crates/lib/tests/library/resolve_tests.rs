use recipe_lib::descriptor::Descriptor;
use recipe_lib::options::{OptionAssignment, OptionValue};
use recipe_lib::resolve::{BuildContext, Catalog, ResolveError, resolve};

use super::common::{ENGINE_RECIPE, RecipeFile, linux_settings, native};

fn write_catalog(file: &RecipeFile) -> std::path::PathBuf {
  let dir = file.dir().join("catalog");
  std::fs::create_dir_all(&dir).unwrap();
  let manifests = [
    (
      "assimp.json",
      r#"{
        "name": "assimp", "version": "5.4.2",
        "options": {
          "with_obj": { "values": [true, false], "default": true },
          "with_fbx": { "values": [true, false], "default": true },
          "double_precision": { "values": [true, false], "default": false },
          "with_draco": { "values": [true, false], "default": false }
        },
        "requires": ["zlib/1.3.1"],
        "conditional_requires": { "with_draco": ["draco/1.5.6"] }
      }"#,
    ),
    ("fmt.json", r#"{ "name": "fmt", "version": "11.0.0" }"#),
    ("zlib.json", r#"{ "name": "zlib", "version": "1.3.1" }"#),
    ("draco.json", r#"{ "name": "draco", "version": "1.5.6" }"#),
    ("cmake.json", r#"{ "name": "cmake", "version": "3.25.0" }"#),
  ];
  for (name, content) in manifests {
    std::fs::write(dir.join(name), content).unwrap();
  }
  dir
}

#[test]
fn configured_descriptor_resolves_against_catalog() {
  let file = RecipeFile::new(ENGINE_RECIPE);
  let catalog = Catalog::load(&write_catalog(&file)).unwrap();
  let settings = linux_settings();

  let mut descriptor = Descriptor::new(file.load(), settings.clone());
  descriptor.configure(&native(&settings)).unwrap();

  let plan = resolve(&catalog, descriptor.requirements(), descriptor.options()).unwrap();
  assert_eq!(plan.len(), 4);
  assert!(plan.position("zlib", BuildContext::Host).unwrap() < plan.position("assimp", BuildContext::Host).unwrap());
  assert!(plan.get("cmake", BuildContext::Build).is_some());

  let assimp = plan.get("assimp", BuildContext::Host).unwrap();
  assert_eq!(assimp.options["with_fbx"], OptionValue::Bool(false));
  assert_eq!(assimp.options["with_obj"], OptionValue::Bool(true));
}

#[test]
fn consumer_override_enables_conditional_dependency() {
  let file = RecipeFile::new(ENGINE_RECIPE);
  let catalog = Catalog::load(&write_catalog(&file)).unwrap();
  let settings = linux_settings();

  let overrides = vec![OptionAssignment::parse("assimp:with_draco=true").unwrap()];
  let mut descriptor = Descriptor::new(file.load(), settings.clone()).with_option_overrides(overrides);
  descriptor.configure(&native(&settings)).unwrap();

  let plan = resolve(&catalog, descriptor.requirements(), descriptor.options()).unwrap();
  assert!(plan.get("draco", BuildContext::Host).is_some());
}

#[test]
fn override_of_unknown_flag_fails_resolution() {
  let file = RecipeFile::new(ENGINE_RECIPE);
  let catalog = Catalog::load(&write_catalog(&file)).unwrap();
  let settings = linux_settings();

  let overrides = vec![OptionAssignment::parse("fmt:header_only=true").unwrap()];
  let mut descriptor = Descriptor::new(file.load(), settings.clone()).with_option_overrides(overrides);
  descriptor.configure(&native(&settings)).unwrap();

  let err = resolve(&catalog, descriptor.requirements(), descriptor.options()).unwrap_err();
  assert!(matches!(err, ResolveError::UnknownFlag { ref dependency, .. } if dependency == "fmt"));
}
