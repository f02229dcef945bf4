use anyhow::{Result, bail};
use serde_json::json;

use flexpack_lib::platform::Platform;
use flexpack_lib::platform::tags::platform_tags;

use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let Some(platform) = Platform::current() else {
    bail!(
      "unsupported host platform {}/{}",
      std::env::consts::OS,
      std::env::consts::ARCH
    );
  };

  let wheel_tag = platform.wheel_tag().to_string();
  if output.is_json() {
    return print_json(&json!({
      "platform": platform,
      "triple": platform.triple(),
      "wheel_tag": wheel_tag,
      "platform_tags": platform_tags(platform),
    }));
  }

  print_info("System:");
  print_stat("Platform", &platform.triple());
  print_stat("Wheel tag", &wheel_tag);
  print_stat("flexpack", env!("CARGO_PKG_VERSION"));
  Ok(())
}
