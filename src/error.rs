use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(
        "Problem trying to connect to bitbucket ({url}): {source}. \
         Hint: the bitbucket repository name is case-sensitive."
    )]
    Connectivity {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid GitHub repository '{0}', expected <owner>/<repo>")]
    InvalidTargetRepo(String),

    #[error("No {0} available and no terminal to prompt for it")]
    MissingCredential(&'static str),
}
