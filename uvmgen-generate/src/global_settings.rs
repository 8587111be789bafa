//! The `global_config.sv` package.
//!
//! Not templated: each global setting becomes one `parameter` line in
//! document order, with text quoted and numbers bare.

use uvmgen_core::{GlobalSettings, GlobalValue};

/// File name of the global-settings artifact.
pub const GLOBAL_SETTINGS_FILE: &str = "global_config.sv";

/// Name of the enclosing package.
pub const PACKAGE_NAME: &str = "global_config";

/// Render the whole package.
pub fn render(settings: &GlobalSettings) -> String {
    let mut out = format!("package {PACKAGE_NAME};\n");
    for setting in settings.iter() {
        out.push_str(&format!(
            "  parameter {} {} = {};\n",
            type_name(&setting.value),
            setting.name,
            literal(&setting.value)
        ));
    }
    out.push_str(&format!("endpackage : {PACKAGE_NAME}\n"));
    out
}

fn type_name(value: &GlobalValue) -> &'static str {
    match value {
        GlobalValue::Integer(i) if i32::try_from(*i).is_ok() => "int",
        GlobalValue::Integer(_) => "longint",
        GlobalValue::Unsigned(_) => "longint unsigned",
        GlobalValue::Real(_) => "real",
        GlobalValue::Text(_) => "string",
    }
}

fn literal(value: &GlobalValue) -> String {
    match value {
        GlobalValue::Text(s) => {
            let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        }
        numeric => numeric.to_string(),
    }
}
