use crate::generator::profile::build_detected_objects;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::{debug, info};
use simsensorcore::{serialize_to_json, SerializableValue};

pub struct WorkflowResult {
    /// One JSON array of detected objects per frame.
    pub frames: Vec<String>,
    pub object_count: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let mut frames = Vec::with_capacity(self.config.frames);
        let mut object_count = 0;

        for frame in 0..self.config.frames {
            let objects = build_detected_objects(&self.config.generator, frame)
                .with_context(|| format!("generating objects for frame {}", frame))?;
            object_count += objects.len();

            let text = serialize_to_json(&SerializableValue::from(objects))
                .with_context(|| format!("serializing frame {}", frame))?;
            debug!("frame {} -> {} bytes", frame, text.len());
            frames.push(text);
        }

        info!(
            "rendered {} frames with {} detected objects",
            frames.len(),
            object_count
        );
        Ok(WorkflowResult {
            frames,
            object_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn runner_executes_workflow() {
        let cfg = WorkflowConfig::from_args(3, 2, 7);
        let runner = Runner::new(cfg.clone());
        let result = runner.execute().unwrap();
        assert_eq!(result.frames.len(), 2);
        assert_eq!(result.object_count, 6);

        let frame: Value = serde_json::from_str(&result.frames[1]).unwrap();
        let objects = frame.as_array().unwrap();
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0]["objectId"], 1);
        assert_eq!(objects[0]["type"], "CAR");
        assert_eq!(objects[0]["timestamp"], 50);
        assert_eq!(objects[0]["positionCovariance"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn runner_with_zero_objects_emits_empty_arrays() {
        let cfg = WorkflowConfig::from_args(0, 2, 0);
        let result = Runner::new(cfg).execute().unwrap();
        assert_eq!(result.frames, vec!["[]".to_string(), "[]".to_string()]);
        assert_eq!(result.object_count, 0);
    }
}
