//! HTML Views

use crate::presentation::ResultsView;

pub const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>I-V Measurements</title>
</head>
<body>
  <h1>Record a measurement</h1>
  <form method="post" action="/submit">
    <label>Voltage (V) <input name="voltage" type="text" inputmode="decimal" required></label>
    <label>Current (A) <input name="current" type="text" inputmode="decimal" required></label>
    <button type="submit">Submit</button>
  </form>
  <p><a href="/results">View results</a></p>
</body>
</html>
"#;

const RESULTS_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>I-V Fit</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body>
  <h1>Current vs. voltage</h1>
  <table>
    <tr><th>Points</th><td>{{count}}</td></tr>
    <tr><th>Slope (A/V)</th><td>{{slope}}</td></tr>
    <tr><th>Intercept (A)</th><td>{{intercept}}</td></tr>
  </table>
  <canvas id="chart" width="640" height="400"></canvas>
  <p><a href="/">Add another measurement</a></p>
  <script>
    const view = {{view}};
    const datasets = [{ label: 'Measurements', data: view.points }];
    if (view.line) {
      datasets.push({ label: 'Fit', data: view.line, type: 'line', showLine: true, pointRadius: 0 });
    }
    new Chart(document.getElementById('chart'), {
      type: 'scatter',
      data: { datasets },
      options: {
        scales: {
          x: { title: { display: true, text: 'Voltage (V)' } },
          y: { title: { display: true, text: 'Current (A)' } }
        }
      }
    });
  </script>
</body>
</html>
"#;

const NOT_YET: &str = "not yet computable";
const UNAVAILABLE: &str = "fit unavailable (voltages do not determine a line)";

fn with_error(value: Option<f64>, error: Option<f64>, absent: &str) -> String {
    match (value, error) {
        (Some(v), Some(e)) => format!("{v:.6} &plusmn; {e:.6}"),
        (Some(v), None) => format!("{v:.6}"),
        (None, _) => absent.to_string(),
    }
}

/// Results page with the view embedded as JSON for the chart
pub fn render_results(view: &ResultsView) -> Result<String, serde_json::Error> {
    let absent = match view.fit_status {
        crate::presentation::FitStatus::Unavailable => UNAVAILABLE,
        _ => NOT_YET,
    };
    let data = serde_json::to_string(view)?.replace("</", "<\\/");

    Ok(RESULTS_TEMPLATE
        .replace("{{count}}", &view.points.len().to_string())
        .replace(
            "{{slope}}",
            &with_error(view.fit.slope, view.fit.slope_error, absent),
        )
        .replace(
            "{{intercept}}",
            &with_error(view.fit.intercept, view.fit.intercept_error, absent),
        )
        .replace("{{view}}", &data))
}
