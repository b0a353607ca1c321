use thiserror::Error;

use crate::model::{
    GradeParseError, NewUserError, ParseIdError, PreferencesError, StatusParseError, UploadError,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Grade(#[from] GradeParseError),
    #[error(transparent)]
    Status(#[from] StatusParseError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    NewUser(#[from] NewUserError),
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grade, QuestionStatus};

    #[test]
    fn parse_failures_convert_into_crate_error() {
        fn parse_both(grade: &str, status: &str) -> Result<(Grade, QuestionStatus), Error> {
            Ok((Grade::parse(grade)?, status.parse()?))
        }
        assert!(matches!(parse_both("   ", "pending"), Err(Error::Grade(_))));
        assert!(matches!(parse_both("sec1", "done"), Err(Error::Status(_))));
        assert!(parse_both("sec1", "pending").is_ok());
    }
}
