//! Users command - Bootstrap accounts from the console.

use crate::cli::args::{CreateUserArgs, UsersAction, UsersArgs};
use crate::config::Config;
use crate::domain::{Actor, CreateUser};
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the users command
pub async fn execute(args: UsersArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config);
    let users = services.users();
    let actor = Actor::console();

    match args.action {
        UsersAction::Create(CreateUserArgs {
            name,
            email,
            password,
            verified,
        }) => {
            let mut user = users
                .create(
                    &actor,
                    CreateUser {
                        name,
                        email,
                        password,
                    },
                )
                .await?;
            if verified {
                user = users.mark_email_verified(&actor, &user.email).await?;
            }
            println!("Created {} <{}> ({})", user.name, user.email, user.uuid);
        }
        UsersAction::Verify { email } => {
            let user = users.mark_email_verified(&actor, &email).await?;
            println!("Verified {}", user.email);
        }
    }

    Ok(())
}
