use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use vidopt_processing::{ToolError, ToolOutput, ToolRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Transcode,
    Thumbnail,
    Convert,
    Probe,
}

fn classify(program: &str, args: &[String]) -> Step {
    if program == "ffprobe" {
        Step::Probe
    } else if args.iter().any(|a| a == "-c:v") {
        Step::Transcode
    } else if args.iter().any(|a| a == "-vframes") {
        Step::Thumbnail
    } else {
        Step::Convert
    }
}

/// Writes the output ffmpeg would produce (real PNGs for image steps) and answers
/// ffprobe with a fixed size. One step can be made to fail.
#[derive(Default)]
pub struct ScriptedRunner {
    fail_on: Option<Step>,
    calls: Mutex<Vec<Step>>,
}

impl ScriptedRunner {
    pub fn failing(step: Step) -> Self {
        Self {
            fail_on: Some(step),
            ..Default::default()
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, ToolError> {
        let step = classify(program, args);
        self.calls.lock().unwrap().push(step);
        let output = PathBuf::from(args.last().cloned().unwrap_or_default());

        if self.fail_on == Some(step) {
            return Err(ToolError::Failed {
                command: program.to_string(),
                args: args.to_vec(),
                status: "exit status: 1".to_string(),
                output: "moov atom not found".to_string(),
            });
        }

        match step {
            Step::Probe => Ok(ToolOutput {
                stdout: "1280x720\n".to_string(),
                stderr: String::new(),
            }),
            Step::Transcode => {
                std::fs::write(&output, vec![1u8; 4096]).unwrap();
                Ok(ToolOutput::default())
            }
            Step::Thumbnail | Step::Convert => {
                image::RgbImage::new(160, 90).save(&output).unwrap();
                Ok(ToolOutput::default())
            }
        }
    }
}
