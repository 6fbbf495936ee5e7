use crate::organizer::OrganizeError;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit status.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Fatal errors that end the process.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Target directory not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("No target directory given and no home directory could be determined")]
    NoTargetDirectory,

    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::Failure
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::PathNotFound { path } => format!(
                "The specified directory does not exist:\n  {}\n\n\
                 Please verify the path and try again.",
                path.display()
            ),

            AppError::NotADirectory { path } => format!(
                "The specified path is not a directory:\n  {}\n\n\
                 Please provide a valid directory path.",
                path.display()
            ),

            AppError::NoTargetDirectory => {
                "No directory was given and the home directory is unknown.\n\
                 Pass the directory to organize as an argument."
                    .to_string()
            }

            AppError::Organize(OrganizeError::Log(e)) => format!(
                "The undo log could not be used:\n  {}\n\n\
                 No files were moved back. Inspect or remove the log file by hand.",
                e
            ),

            AppError::Organize(OrganizeError::RestoreFailed { from, to, source }) => format!(
                "Failed to move a file back:\n\
                 From:  {}\n\
                 To:    {}\n\
                 Error: {}\n\n\
                 Files restored so far stay restored. The remaining records were\n\
                 kept in the undo log; fix the problem and run --undo again.",
                from.display(),
                to.display(),
                source
            ),

            AppError::Organize(e) => e.to_string(),
        }
    }
}
