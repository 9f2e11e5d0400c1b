//! Implementation of the `recipe inspect` command.

use std::path::Path;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use recipe_lib::descriptor::Recipe;
use recipe_lib::probe::HostEnvironment;

use crate::cmd::{ProfileArgs, load_descriptor};
use crate::output::{OutputFormat, print_heading, print_item, print_json, print_stat, print_success};

/// Run the configure phase and show what the recipe declared.
pub fn cmd_inspect(recipe: &Path, profile: &ProfileArgs, format: OutputFormat) -> Result<()> {
  let mut descriptor = load_descriptor(recipe, profile)?;
  let environment = HostEnvironment::new(descriptor.settings());
  descriptor.configure(&environment)?;

  let info = descriptor.recipe().info();

  if format.is_json() {
    let json_output = serde_json::json!({
      "project": info,
      "phase": descriptor.phase(),
      "settings": descriptor.settings(),
      "shared": descriptor.shared(),
      "environment": descriptor.environment(),
      "cross_building": descriptor.environment().is_some_and(|env| env.is_cross_building()),
      "requirements": descriptor.requirements(),
      "options": descriptor.options(),
      "advisories": descriptor.diagnostics().advisories(),
    });
    return print_json(&json_output);
  }

  print_success(&format!("Configured {}/{}", info.name, info.version));
  if let Some(author) = &info.author {
    print_stat("Author", author);
  }
  if let Some(env) = descriptor.environment() {
    print_stat("Host", &env.host.to_string());
    print_stat("Target", &env.target.to_string());
  }
  print_stat("Build type", descriptor.settings().build_type.as_str());
  print_stat("Shared", &descriptor.shared().to_string());

  let requirements = descriptor.requirements();
  print_heading(&format!("Requirements ({})", requirements.len()));
  for requirement in requirements.iter() {
    print_item(&format!(
      "{} {}",
      requirement.reference(),
      format!("[{}]", requirement.kind).if_supports_color(Stream::Stdout, |s| s.dimmed())
    ));
  }

  let options = descriptor.options();
  print_heading(&format!("Options ({})", options.len()));
  for (dependency, flags) in options.by_dependency() {
    for (flag, value) in flags {
      print_item(&format!("{}:{}={}", dependency, flag, value));
    }
  }

  Ok(())
}
