//! Built-in tasks. Each one must also be registered in
//! [`super::serve_worker`] to run under the process engine.

use serde::{Deserialize, Serialize};

use super::Task;
use crate::evaluator::{assess_password, AssessmentContext};
use crate::model::PasswordAssessment;

/// Scores passwords against one subject's context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessTask {
    context: AssessmentContext,
}

impl AssessTask {
    pub fn new(context: AssessmentContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AssessmentContext {
        &self.context
    }
}

impl Task for AssessTask {
    const KIND: &'static str = "assess";
    type Input = String;
    type Output = PasswordAssessment;

    fn run(&self, input: &String) -> PasswordAssessment {
        assess_password(input, &self.context)
    }
}

/// Doubles its input; used by the self-check to exercise every engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe;

impl Task for Probe {
    const KIND: &'static str = "probe";
    type Input = i64;
    type Output = i64;

    fn run(&self, input: &i64) -> i64 {
        input * 2
    }
}
