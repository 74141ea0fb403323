//! `check-model` report
//!
//! Renders a [`ModelInspection`] as plain text: whether the file exists, its
//! size, then one block per load strategy with the capabilities of the model
//! it produced.

use sentiserve_classifiers::ModelInspection;

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn render_report(inspection: &ModelInspection) -> String {
    let size = inspection
        .size_bytes
        .map(|bytes| bytes.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let mut lines = vec![
        format!("Model: {}", inspection.path.display()),
        format!("Exists: {}", yes_no(inspection.exists())),
        format!("Size (bytes): {size}"),
    ];

    for outcome in &inspection.outcomes {
        match &outcome.result {
            Ok(predictor) => {
                lines.push(format!("[{}] loaded '{}'", outcome.strategy, predictor.name()));
                lines.push("  predict: yes".to_string());
                lines.push(format!(
                    "  predict_proba: {}",
                    yes_no(outcome.has_probabilities())
                ));
            }
            Err(e) => lines.push(format!("[{}] failed: {}", outcome.strategy, e)),
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiserve_classifiers::ModelLoader;
    use tempfile::TempDir;

    #[test]
    fn test_report_for_loadable_model() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentiment_model.json");
        let model =
            r#"{"kind": "linear", "labels": ["neg", "pos"], "bias": [0.0, 0.0], "weights": {}}"#;
        std::fs::write(&path, model).unwrap();

        let report = render_report(&ModelLoader::default().inspect(&path));

        assert!(report.contains("Exists: yes"));
        assert!(report.contains(&format!("Size (bytes): {}", model.len())));
        assert!(report
            .contains("[json] loaded 'sentiment-linear'\n  predict: yes\n  predict_proba: yes"));
    }

    #[test]
    fn test_report_for_missing_model() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        let report = render_report(&ModelLoader::default().inspect(&path));

        assert!(report.contains("Exists: no"));
        assert!(report.contains("Size (bytes): N/A"));
        assert!(report.contains("[json] failed: Model file not found at"));
        #[cfg(feature = "yaml")]
        assert!(report.contains("[yaml] failed: Model file not found at"));
    }
}
