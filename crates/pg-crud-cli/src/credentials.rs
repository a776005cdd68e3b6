//! Interactive credential prompts.

use dialoguer::{Input, Password};
use pg_crud::{ConnectionConfig, CrudError};

fn prompt_error(e: dialoguer::Error) -> CrudError {
    CrudError::Io(std::io::Error::other(e.to_string()))
}

/// Fill in whatever the flags left out. The password is always prompted.
pub fn complete(
    config: &mut ConnectionConfig,
    user: Option<String>,
    database: Option<String>,
) -> Result<(), CrudError> {
    config.user = match user {
        Some(user) => user,
        None => Input::new()
            .with_prompt("User")
            .interact_text()
            .map_err(prompt_error)?,
    };

    config.password = Password::new()
        .with_prompt(format!("Password for {}", config.user))
        .allow_empty_password(true)
        .interact()
        .map_err(prompt_error)?;

    config.database = match database {
        Some(database) => database,
        None => Input::new()
            .with_prompt("Database")
            .interact_text()
            .map_err(prompt_error)?,
    };

    Ok(())
}
