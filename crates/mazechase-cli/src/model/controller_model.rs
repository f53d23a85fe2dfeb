use anyhow::Context;
use chrono::{DateTime, Utc};
use mazechase_evaluator::{
    action::ACTION_COUNT,
    controller::{Controller, NeuralController},
};
use serde::{Deserialize, Serialize};

/// Saved feed-forward controller.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerModel {
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Phase the controller was produced for, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub layer_sizes: Vec<usize>,
    pub weights: Vec<f32>,
}

impl ControllerModel {
    pub fn from_controller(controller: &NeuralController, phase: Option<String>) -> Self {
        Self {
            name: controller.id().to_owned(),
            created_at: Utc::now(),
            phase,
            layer_sizes: controller.layer_sizes().to_vec(),
            weights: controller.weights().to_vec(),
        }
    }

    pub fn to_controller(&self) -> anyhow::Result<NeuralController> {
        NeuralController::new(
            self.name.clone(),
            self.layer_sizes.clone(),
            self.weights.clone(),
        )
        .with_context(|| format!("Invalid network in controller model `{}`", self.name))
    }

    /// Builds the controller and checks it fits an encoder of `input_len` values.
    pub fn to_controller_for(&self, input_len: usize) -> anyhow::Result<NeuralController> {
        let controller = self.to_controller()?;
        anyhow::ensure!(
            controller.input_len() == input_len,
            "Controller model `{}` takes {} inputs but the phase encoder produces {input_len}",
            self.name,
            controller.input_len(),
        );
        anyhow::ensure!(
            controller.output_len() == ACTION_COUNT,
            "Controller model `{}` has {} outputs, expected {ACTION_COUNT}",
            self.name,
            controller.output_len(),
        );
        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(layer_sizes: Vec<usize>) -> ControllerModel {
        let weights = vec![0.25; NeuralController::weight_count(&layer_sizes)];
        let controller = NeuralController::new("tiny", layer_sizes, weights).unwrap();
        ControllerModel::from_controller(&controller, Some("only_ghosts".to_owned()))
    }

    #[test]
    fn test_model_json() {
        let model = model(vec![14, 3, 4]);
        let json = serde_json::to_string(&model).unwrap();
        let loaded: ControllerModel = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.name, "tiny");
        assert_eq!(loaded.phase.as_deref(), Some("only_ghosts"));
        assert_eq!(loaded.to_controller().unwrap().weights(), model.weights.as_slice());
    }

    #[test]
    fn test_shape_checks() {
        assert!(model(vec![14, 4]).to_controller_for(14).is_ok());
        assert!(model(vec![14, 4]).to_controller_for(120).is_err());
        assert!(model(vec![14, 2]).to_controller_for(14).is_err());

        let mut broken = model(vec![14, 4]);
        broken.weights.pop();
        assert!(broken.to_controller().is_err());
    }
}
