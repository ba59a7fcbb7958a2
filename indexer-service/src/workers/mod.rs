mod executor;
mod pipeline;

pub use executor::{
    CommandExecutor, CommandOutput, CommandRunner, MockCommandRunner, RunnerError,
};
pub use pipeline::{
    IndexPipeline, IndexReport, PipelineError, Step, COMPLETION_MESSAGE, REPORTED_WAIT_SECS,
};
