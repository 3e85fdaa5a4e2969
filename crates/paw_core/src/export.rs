use crate::prediction::Prediction;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::Path;

/// Writes the probability list to CSV with headers:
/// class,probability,predicted
///
/// Rows follow the on-screen order (most likely first).
pub fn export_csv(prediction: &Prediction, path: impl AsRef<Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["class", "probability", "predicted"])?;
    for row in prediction.ranked() {
        wtr.write_record([
            row.class.as_str(),
            format!("{}", row.probability).as_str(),
            if row.predicted { "true" } else { "false" },
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Suggested file name for an export made at `at`.
pub fn default_file_name(prediction: &Prediction, at: DateTime<Local>) -> String {
    format!(
        "pawph_{}_{}.csv",
        prediction.ph_class,
        at.format("%Y%m%d-%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn prediction() -> Prediction {
        Prediction {
            ph_value: 7.0,
            confidence: 0.6,
            ph_class: "pH_7".into(),
            all_probabilities: BTreeMap::from([
                ("pH_6".to_string(), 0.3),
                ("pH_7".to_string(), 0.6),
                ("pH_8".to_string(), 0.1),
            ]),
            health_advice: String::new(),
            top2_weighted_ph: None,
        }
    }

    #[test]
    fn export_csv_writes_ranked_rows() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        export_csv(&prediction(), &path)?;

        let mut rdr = csv::Reader::from_path(&path)?;
        assert_eq!(
            rdr.headers()?.iter().collect::<Vec<_>>(),
            vec!["class", "probability", "predicted"]
        );
        let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>()?;
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "pH_7");
        assert_eq!(&rows[0][1], "0.6");
        assert_eq!(&rows[0][2], "true");
        assert_eq!(&rows[1][0], "pH_6");
        assert_eq!(&rows[2][0], "pH_8");
        assert_eq!(&rows[2][2], "false");
        Ok(())
    }

    #[test]
    fn file_name_has_class_and_timestamp() {
        let at = Local.with_ymd_and_hms(2025, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(
            default_file_name(&prediction(), at),
            "pawph_pH_7_20250309-140500.csv"
        );
    }
}
