use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Classifier reply for one uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub ph_value: f64,
    /// Probability of `ph_class`, in [0,1].
    pub confidence: f64,
    pub ph_class: String,
    pub all_probabilities: BTreeMap<String, f64>,
    pub health_advice: String,
    /// Probability-weighted mean pH of the two most likely classes.
    #[serde(default)]
    pub top2_weighted_ph: Option<f64>,
}

/// One row of the probability list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedClass {
    pub class: String,
    pub probability: f64,
    pub predicted: bool,
}

impl RankedClass {
    pub fn percent_text(&self) -> String {
        percent_text(self.probability)
    }

    /// Bar fill in [0,1].
    pub fn bar_fraction(&self) -> f32 {
        bar_fraction(self.probability)
    }
}

impl Prediction {
    /// Classes sorted by descending probability. Equal probabilities keep
    /// class-name order.
    pub fn ranked(&self) -> Vec<RankedClass> {
        let mut rows: Vec<RankedClass> = self
            .all_probabilities
            .iter()
            .map(|(class, &probability)| RankedClass {
                class: class.clone(),
                probability,
                predicted: *class == self.ph_class,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });
        rows
    }

    pub fn ph_text(&self) -> String {
        format!("{:.1}", self.ph_value)
    }

    pub fn confidence_text(&self) -> String {
        percent_text(self.confidence)
    }

    pub fn confidence_fraction(&self) -> f32 {
        bar_fraction(self.confidence)
    }

    pub fn weighted_ph_text(&self) -> Option<String> {
        self.top2_weighted_ph.map(|v| format!("{v:.2}"))
    }
}

/// `0.873` -> `"87.3%"`.
pub fn percent_text(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

fn bar_fraction(p: f64) -> f32 {
    if p.is_nan() {
        return 0.0;
    }
    p.clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn sample() -> Prediction {
        serde_json::from_str(
            r#"{
                "ph_class": "pH_7",
                "ph_value": 7.0,
                "confidence": 0.873,
                "all_probabilities": {"pH_6": 0.1, "pH_7": 0.873, "pH_8": 0.027},
                "top2_weighted_ph": 6.897,
                "health_advice": "**정상**"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn confidence_renders_one_decimal_percent() {
        let p = sample();
        assert_eq!(p.confidence_text(), "87.3%");
        assert_relative_eq!(p.confidence_fraction(), 0.873_f32);
        assert_eq!(p.ph_text(), "7.0");
        assert_eq!(p.weighted_ph_text().as_deref(), Some("6.90"));
    }

    #[test]
    fn ranked_sorts_descending_and_flags_prediction() {
        let p = sample();
        let rows = p.ranked();
        let order: Vec<_> = rows.iter().map(|r| r.class.as_str()).collect();
        assert_eq!(order, ["pH_7", "pH_6", "pH_8"]);
        assert!(rows[0].predicted);
        assert!(!rows[1].predicted);
        assert_eq!(rows[2].percent_text(), "2.7%");
    }

    #[test]
    fn ranked_ties_keep_name_order() {
        let p = Prediction {
            ph_value: 5.0,
            confidence: 0.4,
            ph_class: "b".into(),
            all_probabilities: [("c", 0.2), ("b", 0.4), ("a", 0.4)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            health_advice: String::new(),
            top2_weighted_ph: None,
        };
        let order: Vec<_> = p.ranked().into_iter().map(|r| r.class).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn weighted_ph_is_optional_on_the_wire() {
        let p: Prediction = serde_json::from_str(
            r#"{"ph_class":"A","ph_value":4.0,"confidence":1.0,"all_probabilities":{"A":1.0},"health_advice":""}"#,
        )
        .unwrap();
        assert_eq!(p.top2_weighted_ph, None);
    }

    #[rstest]
    #[case(1.5, 1.0)]
    #[case(-0.2, 0.0)]
    #[case(f64::NAN, 0.0)]
    fn bar_fraction_is_clamped(#[case] p: f64, #[case] expected: f32) {
        assert_eq!(bar_fraction(p), expected);
    }
}
