use serde_json::Value;

use super::state::RobotState;

/// Render the state page served at `/`.
pub fn render(state: &RobotState) -> String {
    let s = &state.sensors;
    let rows = [
        ("Left distance", &s.left_distance),
        ("Right distance", &s.right_distance),
        ("Depth", &s.depth),
        ("Pitch", &s.pitch),
        ("Roll", &s.roll),
    ];

    let table: String = rows
        .into_iter()
        .map(|(label, value)| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                label,
                escape(&display_value(value))
            )
        })
        .collect();

    let (power_class, power_label) = if state.power {
        ("on", "ON")
    } else {
        ("off", "OFF")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Robot state</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
.on {{ color: #1a7f37; }}
.off {{ color: #cf222e; }}
th {{ text-align: left; padding-right: 1rem; }}
</style>
</head>
<body>
<h1>Robot state</h1>
<p>Power: <strong class="{power_class}">{power_label}</strong></p>
<table>{table}</table>
</body>
</html>
"#
    )
}

/// Strings are shown without quotes, anything else as compact JSON.
fn display_value(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => "n/a".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        })
        .collect()
}
