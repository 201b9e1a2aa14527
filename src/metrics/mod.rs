//! Binary classification metrics
//!
//! Provides the confusion matrix and the accuracy/precision/recall/F1
//! family used to evaluate and compare the trained models.

/// Confusion matrix for binary classification
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    /// True positives
    pub tp: usize,
    /// True negatives
    pub tn: usize,
    /// False positives
    pub fp: usize,
    /// False negatives
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Build from encoded labels and predictions (>= 0.5 is positive)
    pub fn from_predictions(y_true: &[f64], y_pred: &[f64]) -> Self {
        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;

        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t >= 0.5, p >= 0.5) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
            }
        }

        Self { tp, tn, fp, fn_ }
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Formatted matrix for console reports
    pub fn display(&self) -> String {
        format!(
            "Confusion Matrix:\n\
             \n\
             Predicted:   FAKE    REAL\n\
             Actual FAKE: {:>5}   {:>5}  (TN/FP)\n\
             Actual REAL: {:>5}   {:>5}  (FN/TP)\n",
            self.tn, self.fp, self.fn_, self.tp
        )
    }
}

/// Metrics computed from a confusion matrix
#[derive(Debug, Clone)]
pub struct ClassificationMetrics {
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    /// Precision for the positive (REAL) class
    pub precision: f64,
    /// Recall for the positive (REAL) class
    pub recall: f64,
    /// F1 for the positive (REAL) class
    pub f1: f64,
    /// Unweighted mean of per-class F1 scores
    pub macro_f1: f64,
}

impl ClassificationMetrics {
    pub fn calculate(y_true: &[f64], y_pred: &[f64]) -> Self {
        let cm = ConfusionMatrix::from_predictions(y_true, y_pred);

        let total = cm.total() as f64;
        let accuracy = if total > 0.0 {
            (cm.tp + cm.tn) as f64 / total
        } else {
            0.0
        };

        let precision = ratio(cm.tp, cm.tp + cm.fp);
        let recall = ratio(cm.tp, cm.tp + cm.fn_);
        let f1 = harmonic(precision, recall);

        // Negative-class F1: the same formulas with the classes swapped
        let neg_precision = ratio(cm.tn, cm.tn + cm.fn_);
        let neg_recall = ratio(cm.tn, cm.tn + cm.fp);
        let neg_f1 = harmonic(neg_precision, neg_recall);

        let macro_f1 = (f1 + neg_f1) / 2.0;

        Self {
            confusion_matrix: cm,
            accuracy,
            precision,
            recall,
            f1,
            macro_f1,
        }
    }

    /// Console-friendly summary
    pub fn report(&self) -> String {
        let mut s = String::new();
        s.push_str(&self.confusion_matrix.display());
        s.push_str("\nMetrics:\n");
        s.push_str(&format!("  Accuracy:  {:.4}\n", self.accuracy));
        s.push_str(&format!("  Precision: {:.4}\n", self.precision));
        s.push_str(&format!("  Recall:    {:.4}\n", self.recall));
        s.push_str(&format!("  F1 Score:  {:.4}\n", self.f1));
        s.push_str(&format!("  Macro F1:  {:.4}\n", self.macro_f1));
        s
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn harmonic(precision: f64, recall: f64) -> f64 {
    let denom = precision + recall;
    if denom < 1e-15 {
        0.0
    } else {
        2.0 * precision * recall / denom
    }
}
