//! Request handlers for the prediction service

use super::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Body of `POST /predict`
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: Option<String>,
}

/// Per-model verdicts plus the final call
///
/// Key names are part of the wire contract consumed by existing clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(rename = "Naive Bayes")]
    pub naive_bayes: String,
    #[serde(rename = "Decision Tree")]
    pub decision_tree: String,
    #[serde(rename = "Random Forest")]
    pub random_forest: String,
    #[serde(rename = "Gradient Boosting")]
    pub gradient_boosting: String,
    #[serde(rename = "Stacking Model")]
    pub stacking_model: String,
    #[serde(rename = "Final Verdict")]
    pub final_verdict: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub vocabulary_terms: usize,
}

/// Classify one article with every model
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(text) = request.text else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No 'text' provided".to_string(),
            }),
        ));
    };

    match state.artifacts.verdicts(&text) {
        Ok(verdicts) => {
            info!(
                chars = text.len(),
                verdict = verdicts.stacking,
                "prediction served"
            );
            Ok(Json(PredictResponse {
                naive_bayes: verdicts.naive_bayes.to_string(),
                decision_tree: verdicts.decision_tree.to_string(),
                random_forest: verdicts.random_forest.to_string(),
                gradient_boosting: verdicts.gradient_boosting.to_string(),
                stacking_model: verdicts.stacking.to_string(),
                final_verdict: verdicts.stacking.to_string(),
            }))
        }
        Err(err) => {
            error!(error = %err, "prediction failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            ))
        }
    }
}

/// Liveness check with the loaded vocabulary size
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        vocabulary_terms: state.artifacts.vectorizer.n_terms(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ClassWeights;
    use crate::models::{
        DecisionTree, ForestConfig, GbConfig, GradientBoosting, MultinomialNb, NbConfig,
        RandomForest, StackingConfig, StackingEnsemble, TreeConfig,
    };
    use crate::nlp::{clean_text, TfidfConfig, TfidfVectorizer};
    use crate::pipeline::ArtifactSet;

    fn test_state() -> AppState {
        let fake_docs = [
            "aliens secretly control the senate floor tonight",
            "miracle pill cures every known disease overnight",
            "celebrity clone spotted in a hidden desert bunker",
            "moon base broadcasts mind control signals daily",
        ];
        let real_docs = [
            "senate committee approves the budget resolution today",
            "central bank holds interest rates steady this quarter",
            "voters head to the polls in the state election",
            "appeals court upholds a ruling on trade tariffs",
        ];

        let mut documents = Vec::new();
        let mut labels = Vec::new();
        for round in 0..4 {
            for doc in &fake_docs {
                documents.push(clean_text(&format!("{doc} round {round}")));
                labels.push(0.0);
            }
            for doc in &real_docs {
                documents.push(clean_text(&format!("{doc} round {round}")));
                labels.push(1.0);
            }
        }

        let mut vectorizer = TfidfVectorizer::new(TfidfConfig {
            max_features: 200,
            min_df: 1,
            ngram_max: 1,
        });
        let features = vectorizer.fit_transform(&documents);

        let weights = ClassWeights::balanced(&labels);
        let tree_config = TreeConfig {
            max_depth: 5,
            class_weights: weights,
            ..Default::default()
        };
        let forest_config = ForestConfig {
            n_trees: 5,
            max_depth: 5,
            class_weights: weights,
            ..Default::default()
        };
        let gb_config = GbConfig {
            n_estimators: 5,
            ..Default::default()
        };

        let mut nb = MultinomialNb::new(NbConfig::default());
        nb.fit(&features, &labels).unwrap();
        let mut tree = DecisionTree::new(tree_config.clone());
        tree.fit(&features, &labels).unwrap();
        let mut forest = RandomForest::new(forest_config.clone());
        forest.fit(&features, &labels).unwrap();
        let mut boosting = GradientBoosting::new(gb_config);
        boosting.fit(&features, &labels).unwrap();

        let mut stacking = StackingEnsemble::new(StackingConfig {
            n_folds: 2,
            nb: NbConfig::default(),
            forest: forest_config,
            boosting: gb_config,
            tree: tree_config,
            ..Default::default()
        });
        stacking.fit(&features, &labels).unwrap();

        AppState::new(ArtifactSet {
            vectorizer,
            nb,
            tree,
            forest,
            boosting,
            stacking,
        })
    }

    #[tokio::test]
    async fn test_predict_without_text_is_400() {
        let state = test_state();
        let result = predict(State(state), Json(PredictRequest { text: None })).await;

        let (status, Json(body)) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "No 'text' provided");
    }

    #[tokio::test]
    async fn test_predict_returns_all_verdict_keys() {
        let state = test_state();
        let request = PredictRequest {
            text: Some("Senate committee approves the budget resolution".to_string()),
        };

        let Json(response) = predict(State(state), Json(request)).await.ok().unwrap();
        let value = serde_json::to_value(&response).unwrap();

        for key in [
            "Naive Bayes",
            "Decision Tree",
            "Random Forest",
            "Gradient Boosting",
            "Stacking Model",
            "Final Verdict",
        ] {
            let verdict = value.get(key).unwrap().as_str().unwrap();
            assert!(verdict == "REAL" || verdict == "FAKE", "bad verdict for {key}");
        }
        assert_eq!(response.final_verdict, response.stacking_model);
    }

    #[tokio::test]
    async fn test_predict_is_deterministic() {
        let state = test_state();
        let text = "Aliens secretly control the senate floor".to_string();

        let Json(first) = predict(
            State(state.clone()),
            Json(PredictRequest {
                text: Some(text.clone()),
            }),
        )
        .await
        .ok()
        .unwrap();
        let Json(second) = predict(State(state), Json(PredictRequest { text: Some(text) }))
            .await
            .ok()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_health_reports_vocabulary() {
        let state = test_state();
        let Json(response) = health(State(state)).await;

        assert_eq!(response.status, "ok");
        assert!(response.vocabulary_terms > 0);
    }
}
