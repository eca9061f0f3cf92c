use std::process::ExitCode;

use super::commands::CommandResult;

/// Exit status of a transchara invocation.
///
/// - `Success` (0): Command completed, every tag was translated
/// - `Failure` (1): Command completed but some tags could not be translated
/// - `Error` (2): Command failed due to internal error (config, I/O, credentials)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    pub fn from_result(result: &CommandResult) -> Self {
        if result.failure_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
