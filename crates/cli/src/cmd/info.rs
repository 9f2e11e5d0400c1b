use anyhow::Result;

use recipe_lib::platform::Platform;
use recipe_lib::settings::Compiler;

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let platform = Platform::current();
  let compiler = platform.map(|p| Compiler::detect(p.os));

  if format.is_json() {
    let json_output = serde_json::json!({
      "version": env!("CARGO_PKG_VERSION"),
      "platform": platform.map(|p| p.triple()),
      "os": platform.map(|p| p.os),
      "arch": platform.map(|p| p.arch),
      "compiler": compiler,
    });
    return print_json(&json_output);
  }

  println!("recipe v{}", env!("CARGO_PKG_VERSION"));
  match (platform, compiler) {
    (Some(platform), Some(compiler)) => {
      print_stat("Platform", &platform.triple());
      print_stat("OS", platform.os.as_str());
      print_stat("Arch", platform.arch.as_str());
      print_stat("Compiler", &compiler.to_string());
    }
    _ => print_stat("Platform", "unsupported"),
  }

  Ok(())
}
